//! Directory-backed static asset binding
//!
//! Serves a built site directory through the `Fetcher` interface, with
//! index files, `.html` fallback, conditional and range requests, and a
//! configurable answer for paths that match nothing.

mod resolve;

pub use resolve::AssetPath;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{header, Method, StatusCode};
use tokio::fs;

use crate::config::{AssetsConfig, NotFoundHandling};
use crate::http::cache;
use crate::http::mime;
use crate::http::response::{self, AssetHeaders};
use crate::http::{parse_range_header, RangeOutcome};
use crate::logger;
use crate::worker::{Fetcher, Request, Response, Result};

#[derive(Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
    config: AssetsConfig,
}

/// Request headers the binding looks at
struct Conditions {
    is_head: bool,
    if_none_match: Option<String>,
    range: Option<String>,
}

impl Conditions {
    fn from_request(req: &Request, is_head: bool) -> Self {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            is_head,
            if_none_match: header_value(header::IF_NONE_MATCH),
            range: header_value(header::RANGE),
        }
    }
}

impl DirectoryAssets {
    /// Open the configured directory; it must exist
    pub fn new(config: AssetsConfig) -> Result<Self> {
        let root = std::fs::canonicalize(&config.directory)?;
        if !root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("asset directory is not a directory: {}", root.display()),
            )
            .into());
        }
        Ok(Self { root, config })
    }

    async fn not_found(&self, path: &AssetPath, cond: &Conditions) -> Response {
        let page = match self.config.not_found_handling {
            NotFoundHandling::None => None,
            NotFoundHandling::NotFoundPage => resolve::find_not_found_page(&self.root, path)
                .await
                .map(|file| (file, StatusCode::NOT_FOUND)),
            NotFoundHandling::SinglePageApplication => {
                resolve::find_root_index(&self.root, &self.config.index_files)
                    .await
                    .map(|file| (file, StatusCode::OK))
            }
        };

        match page {
            Some((file, status)) => self.serve(&file, status, cond).await,
            None => response::build_404_response(),
        }
    }

    async fn serve(&self, file: &Path, status: StatusCode, cond: &Conditions) -> Response {
        let data = match fs::read(file).await {
            Ok(data) => Bytes::from(data),
            Err(e) => {
                logger::log_error(&format!("Failed to read asset '{}': {e}", file.display()));
                return response::build_500_response();
            }
        };

        let etag = cache::generate_etag(&data);
        let headers = AssetHeaders {
            content_type: mime::content_type_for(file),
            etag: &etag,
            cache_control: &self.config.cache_control,
        };

        // Fallback pages are never partial or revalidated
        if status != StatusCode::OK {
            return response::build_asset_response(status, data, &headers, cond.is_head);
        }

        if cache::if_none_match(cond.if_none_match.as_deref(), &etag) {
            return response::build_304_response(&etag, &self.config.cache_control);
        }

        let total = data.len() as u64;
        match parse_range_header(cond.range.as_deref(), total) {
            RangeOutcome::Satisfiable(range) => {
                let (Ok(start), Ok(end)) =
                    (usize::try_from(range.start), usize::try_from(range.end))
                else {
                    return response::build_416_response(total);
                };
                response::build_partial_response(
                    data.slice(start..=end),
                    range,
                    total,
                    &headers,
                    cond.is_head,
                )
            }
            RangeOutcome::Unsatisfiable => response::build_416_response(total),
            RangeOutcome::Ignored => {
                response::build_asset_response(StatusCode::OK, data, &headers, cond.is_head)
            }
        }
    }
}

#[async_trait]
impl Fetcher for DirectoryAssets {
    async fn fetch(&self, req: Request) -> Result<Response> {
        let is_head = match *req.method() {
            Method::GET => false,
            Method::HEAD => true,
            _ => return Ok(response::build_405_response()),
        };

        let cond = Conditions::from_request(&req, is_head);
        let url_path = req.uri().path().to_string();
        drop(req);

        // Rejected paths never reach the not-found fallbacks
        let Some(path) = AssetPath::parse(&url_path) else {
            logger::log_warning(&format!("Rejected asset path: {url_path}"));
            return Ok(response::build_404_response());
        };

        let resolved = resolve::resolve(
            &self.root,
            &path,
            &self.config.index_files,
            self.config.html_handling,
        )
        .await;

        Ok(match resolved {
            Some(file) => {
                logger::log_debug(&format!("{url_path} -> {}", file.display()));
                self.serve(&file, StatusCode::OK, &cond).await
            }
            None => self.not_found(&path, &cond).await,
        })
    }
}
