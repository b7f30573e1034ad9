//! Worker module
//!
//! The request forwarder and the runtime pieces it is called with: the
//! environment holding bindings, the per-request execution context, and the
//! fetcher trait bindings implement.

pub mod context;
pub mod env;
pub mod error;
pub mod fetcher;
pub mod handler;

pub use context::Context;
pub use env::{Env, ASSETS_BINDING};
pub use error::{Error, Result};
pub use fetcher::{Fetcher, Request, RequestBody, Response};
pub use handler::fetch;
