//! Window resolution against the measured file size

use axum::http::StatusCode;

use super::parser::{parse_range, RangeError, RangeRequest};

/// Outcome driving the HTTP response for one stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeResponse {
    /// No range requested; the whole resource follows.
    Full { total_size: u64 },
    /// A satisfiable inclusive window.
    Partial { start: u64, end: u64, total_size: u64 },
    /// Nothing can be served; the client must retry against `total_size`.
    Unsatisfiable { total_size: u64 },
}

impl RangeResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            RangeResponse::Full { .. } => StatusCode::OK,
            RangeResponse::Partial { .. } => StatusCode::PARTIAL_CONTENT,
            RangeResponse::Unsatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
        }
    }

    pub fn total_size(&self) -> u64 {
        match *self {
            RangeResponse::Full { total_size }
            | RangeResponse::Partial { total_size, .. }
            | RangeResponse::Unsatisfiable { total_size } => total_size,
        }
    }

    /// Bytes the body will carry
    pub fn content_length(&self) -> u64 {
        match *self {
            RangeResponse::Full { total_size } => total_size,
            RangeResponse::Partial { start, end, .. } => end - start + 1,
            RangeResponse::Unsatisfiable { .. } => 0,
        }
    }

    /// `(offset, length)` of the file region to emit, if any.
    pub fn window(&self) -> Option<(u64, u64)> {
        match *self {
            RangeResponse::Full { total_size } => Some((0, total_size)),
            RangeResponse::Partial { start, .. } => Some((start, self.content_length())),
            RangeResponse::Unsatisfiable { .. } => None,
        }
    }

    /// `Content-Range` value, absent for full content
    pub fn content_range(&self) -> Option<String> {
        match *self {
            RangeResponse::Full { .. } => None,
            RangeResponse::Partial {
                start,
                end,
                total_size,
            } => Some(format!("bytes {}-{}/{}", start, end, total_size)),
            RangeResponse::Unsatisfiable { total_size } => Some(format!("bytes */{}", total_size)),
        }
    }
}

/// Clamp a parsed request against the size just read from disk.
///
/// The size measured for this request is authoritative: an end offset past
/// the file is pulled back to the last byte as long as the start is still
/// inside it.
pub fn resolve_window(request: Result<RangeRequest, RangeError>, total_size: u64) -> RangeResponse {
    match request {
        Ok(RangeRequest::Whole) => RangeResponse::Full { total_size },
        Ok(RangeRequest::Window { start, end }) => {
            if start >= total_size {
                return RangeResponse::Unsatisfiable { total_size };
            }
            let last = total_size - 1;
            let end = end.map_or(last, |end| end.min(last));
            if start > end {
                return RangeResponse::Unsatisfiable { total_size };
            }
            RangeResponse::Partial {
                start,
                end,
                total_size,
            }
        }
        Err(_) => RangeResponse::Unsatisfiable { total_size },
    }
}

/// Parse and resolve a `Range` header in one step.
pub fn plan(header: Option<&str>, total_size: u64) -> RangeResponse {
    resolve_window(parse_range(header, total_size), total_size)
}
