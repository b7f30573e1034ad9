//! Per-request dispatch
//!
//! Builds the execution context, runs the worker and plays the host's part
//! when the worker fails: the error is logged and answered with a 500.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};

use super::AppState;
use crate::http::response;
use crate::logger::{self, AccessLogEntry};
use crate::worker::{self, Context, Response};

pub async fn dispatch<B>(
    req: hyper::Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response, Infallible>
where
    B: Body<Data = Bytes, Error = hyper::Error> + Send + 'static,
{
    let started = Instant::now();
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(peer_addr, &req));

    let ctx = Context::new();
    let req = req.map(|body| body.boxed_unsync());
    let response = match worker::fetch(req, &state.env, &ctx).await {
        Ok(response) => response,
        Err(e) => {
            logger::log_error(&format!("Worker failed: {e}"));
            response::build_500_response()
        }
    };

    if ctx.pending() > 0 {
        state.spawn(async move { ctx.drain().await });
    }

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}
