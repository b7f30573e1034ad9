#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};

use asset_worker::worker::{Error, Fetcher, Request, RequestBody, Response, Result};

// ---------------------------------------------------------------------------
// Request / response helpers
// ---------------------------------------------------------------------------

pub fn body(bytes: &'static [u8]) -> RequestBody {
    Full::new(Bytes::from_static(bytes))
        .map_err(|never: Infallible| -> hyper::Error { match never {} })
        .boxed_unsync()
}

pub fn get(uri: &str) -> Request {
    request(Method::GET, uri, &[], b"")
}

pub fn request(
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    payload: &'static [u8],
) -> Request {
    let mut builder = hyper::Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(body(payload)).unwrap()
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

// ---------------------------------------------------------------------------
// Recording fetcher
// ---------------------------------------------------------------------------

/// What a fetcher saw of one request
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
}

type Reply = Box<dyn Fn() -> Result<Response> + Send + Sync>;

/// Records every request and answers with `reply`
pub struct Recorder {
    seen: Mutex<Vec<Seen>>,
    reply: Reply,
}

impl Recorder {
    pub fn new(reply: impl Fn() -> Result<Response> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        })
    }

    /// Always answers `status` with a marker header and `payload`
    pub fn responding(status: u16, payload: &'static str) -> Arc<Self> {
        Self::new(move || {
            Ok(hyper::Response::builder()
                .status(status)
                .header("x-from-binding", "yes")
                .body(Full::new(Bytes::from_static(payload.as_bytes())))
                .unwrap())
        })
    }

    /// Always fails
    pub fn failing(message: &'static str) -> Arc<Self> {
        Self::new(move || Err(Error::Fetch(message.to_string())))
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for Recorder {
    async fn fetch(&self, req: Request) -> Result<Response> {
        let (parts, body) = req.into_parts();
        let body = body.collect().await.map_err(|e| Error::Fetch(e.to_string()))?.to_bytes();
        self.seen.lock().unwrap().push(Seen {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
        });
        (self.reply)()
    }
}
