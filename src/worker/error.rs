//! Worker error type
//!
//! Errors surfaced by bindings and the environment. The forwarder never
//! creates or translates these, it only passes them on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No binding with this name was registered in the environment
    #[error("binding not found: {0}")]
    BindingNotFound(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build http message: {0}")]
    Http(#[from] hyper::http::Error),

    /// Binding-specific failure that has no better variant
    #[error("fetch failed: {0}")]
    Fetch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
