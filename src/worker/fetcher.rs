//! Fetcher binding trait
//!
//! A fetcher accepts a request and resolves it to a response. The `ASSETS`
//! binding is one; test doubles are another.

use async_trait::async_trait;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::Full;
use hyper::body::Bytes;

use super::Result;

/// Type-erased request body so the host's `Incoming` and in-memory test
/// bodies flow through the same signature
pub type RequestBody = UnsyncBoxBody<Bytes, hyper::Error>;

pub type Request = hyper::Request<RequestBody>;
pub type Response = hyper::Response<Full<Bytes>>;

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, req: Request) -> Result<Response>;
}
