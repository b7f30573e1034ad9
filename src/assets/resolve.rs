//! Request path to file resolution
//!
//! Maps a URL path onto a file under the asset root. Paths are
//! percent-decoded, `..` segments are refused, and the final file must stay
//! inside the root after symlinks are resolved.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::HtmlHandling;
use crate::logger;

/// A request path split into safe segments
#[derive(Debug, PartialEq, Eq)]
pub struct AssetPath {
    pub segments: Vec<String>,
    /// Path ended in `/` (or was the root)
    pub directory: bool,
}

impl AssetPath {
    /// Decode and split a URL path; `None` for traversal or invalid encoding
    pub fn parse(url_path: &str) -> Option<Self> {
        let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
        let mut segments = Vec::new();

        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                s if s.contains('\\') || s.contains('\0') => return None,
                s => segments.push(s.to_string()),
            }
        }

        Some(Self {
            directory: segments.is_empty() || decoded.ends_with('/'),
            segments,
        })
    }

    fn join_onto(&self, root: &Path) -> PathBuf {
        self.segments.iter().fold(root.to_path_buf(), |p, s| p.join(s))
    }

    /// Directory the request points into, relative to the root
    pub fn parent_segments(&self) -> &[String] {
        if self.directory || self.segments.is_empty() {
            &self.segments
        } else {
            &self.segments[..self.segments.len() - 1]
        }
    }
}

/// Find the file serving `path` under `root` (which must be canonical)
pub async fn resolve(
    root: &Path,
    path: &AssetPath,
    index_files: &[String],
    html_handling: HtmlHandling,
) -> Option<PathBuf> {
    let candidate = path.join_onto(root);

    let found = if path.directory {
        find_index(&candidate, index_files).await
    } else if is_file(&candidate).await {
        Some(candidate)
    } else if is_dir(&candidate).await {
        find_index(&candidate, index_files).await
    } else if html_handling == HtmlHandling::AutoTrailingSlash {
        html_sibling(&candidate).await
    } else {
        None
    };

    contained(root, &found?).await
}

/// Nearest `404.html` from the request's directory up to the root
pub async fn find_not_found_page(root: &Path, path: &AssetPath) -> Option<PathBuf> {
    let parents = path.parent_segments();
    for depth in (0..=parents.len()).rev() {
        let dir = parents[..depth].iter().fold(root.to_path_buf(), |p, s| p.join(s));
        let page = dir.join("404.html");
        if is_file(&page).await {
            return contained(root, &page).await;
        }
    }
    None
}

/// Root index file, used as the single-page-application fallback
pub async fn find_root_index(root: &Path, index_files: &[String]) -> Option<PathBuf> {
    let index = find_index(root, index_files).await?;
    contained(root, &index).await
}

async fn find_index(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for name in index_files {
        let candidate = dir.join(name);
        if is_file(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

/// `/about` -> `about.html` when the last segment has no extension
async fn html_sibling(candidate: &Path) -> Option<PathBuf> {
    if candidate.extension().is_some() {
        return None;
    }
    let name = candidate.file_name()?.to_str()?;
    let sibling = candidate.with_file_name(format!("{name}.html"));
    if is_file(&sibling).await {
        Some(sibling)
    } else {
        None
    }
}

/// Canonicalize `file` and require it to live under `root`
async fn contained(root: &Path, file: &Path) -> Option<PathBuf> {
    let canonical = fs::canonicalize(file).await.ok()?;
    if canonical.starts_with(root) {
        Some(canonical)
    } else {
        logger::log_warning(&format!(
            "Refusing asset outside of {}: {}",
            root.display(),
            canonical.display()
        ));
        None
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}
