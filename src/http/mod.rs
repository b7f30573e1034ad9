//! HTTP protocol helpers
//!
//! Conditional requests, content types, byte ranges and response builders
//! used by the asset binding and the host.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use range::{parse_range_header, ByteRange, RangeOutcome};
