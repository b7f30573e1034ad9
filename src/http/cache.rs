//! HTTP cache validation module
//!
//! `ETag` generation and `If-None-Match` evaluation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Strong `ETag` derived from the content bytes, e.g. `"1f-9a3c..."`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// Whether `If-None-Match` matches `etag`, meaning a 304 is due
///
/// Accepts a comma-separated list or `*`. Comparison is weak (RFC 9110
/// 13.1.2): a `W/` prefix on either side is ignored.
pub fn if_none_match(header: Option<&str>, etag: &str) -> bool {
    let ours = opaque_tag(etag);
    header.is_some_and(|value| {
        value
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == "*" || opaque_tag(candidate) == ours)
    })
}

fn opaque_tag(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}
