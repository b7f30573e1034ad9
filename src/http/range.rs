//! HTTP Range request parsing module
//!
//! Single `bytes=` ranges only (RFC 9110 14.1.2). Anything fancier is
//! ignored and the full content is served.

/// Inclusive byte range within a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub const fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a representation of `total` bytes
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    Satisfiable(ByteRange),
    /// Should be answered with 416
    Unsatisfiable,
    /// No header, another unit, multiple ranges or garbage
    Ignored,
}

/// Parse a `Range` header against a representation of `total` bytes
///
/// # Examples
/// ```
/// use asset_worker::http::range::{parse_range_header, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     parse_range_header(Some("bytes=0-99"), 1000),
///     RangeOutcome::Satisfiable(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range_header(None, 1000), RangeOutcome::Ignored);
/// ```
pub fn parse_range_header(header: Option<&str>, total: u64) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Ignored;
    };
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // Suffix form: "-500" is the last 500 bytes
        let Ok(suffix) = last.parse::<u64>() else {
            return RangeOutcome::Ignored;
        };
        if suffix == 0 || total == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Satisfiable(ByteRange {
            start: total.saturating_sub(suffix),
            end: total - 1,
        });
    }

    let Ok(start) = first.parse::<u64>() else {
        return RangeOutcome::Ignored;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return RangeOutcome::Ignored,
        }
    };

    if let Some(end) = end {
        if end < start {
            return RangeOutcome::Ignored;
        }
    }
    if start >= total {
        return RangeOutcome::Unsatisfiable;
    }

    let end = end.map_or(total - 1, |e| e.min(total - 1));
    RangeOutcome::Satisfiable(ByteRange { start, end })
}
