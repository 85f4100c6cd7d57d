//! `Range` header parsing
//!
//! Accepts the three single-range forms browsers send for media playback:
//! `bytes=<start>-<end>`, `bytes=<start>-` and `bytes=-<suffix-length>`.
//! Multi-range requests are rejected.

use thiserror::Error;

/// A client's requested byte window, before clamping to the file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No `Range` header: serve the whole resource.
    Whole,
    /// Inclusive window. `end == None` runs to end-of-file.
    Window { start: u64, end: Option<u64> },
}

/// Why a `Range` header cannot be serviced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("malformed range header: {0}")]
    Malformed(String),

    #[error("range not satisfiable for resource of {total_size} bytes")]
    Unsatisfiable { total_size: u64 },
}

/// Parse an optional `Range` header value against the resource size.
///
/// Suffix ranges are resolved here since they depend on `total_size`.
/// An explicit end beyond the resource is left for the window resolver to
/// clamp.
pub fn parse_range(header: Option<&str>, total_size: u64) -> Result<RangeRequest, RangeError> {
    let Some(raw) = header else {
        return Ok(RangeRequest::Whole);
    };

    let value = raw.trim();
    let spec = value
        .split_once('=')
        .filter(|(unit, _)| unit.trim().eq_ignore_ascii_case("bytes"))
        .map(|(_, spec)| spec.trim())
        .ok_or_else(|| RangeError::Malformed(raw.to_string()))?;

    if spec.contains(',') {
        return Err(RangeError::Malformed(raw.to_string()));
    }

    let (start_str, end_str) = spec
        .split_once('-')
        .map(|(s, e)| (s.trim(), e.trim()))
        .ok_or_else(|| RangeError::Malformed(raw.to_string()))?;

    let unsatisfiable = RangeError::Unsatisfiable { total_size };

    if start_str.is_empty() {
        // bytes=-N: the last N bytes
        let suffix = parse_offset(end_str).ok_or_else(|| RangeError::Malformed(raw.to_string()))?;
        if suffix == 0 || total_size == 0 {
            return Err(unsatisfiable);
        }
        return Ok(RangeRequest::Window {
            start: total_size.saturating_sub(suffix),
            end: Some(total_size - 1),
        });
    }

    let start = parse_offset(start_str).ok_or_else(|| RangeError::Malformed(raw.to_string()))?;
    let end = if end_str.is_empty() {
        None
    } else {
        Some(parse_offset(end_str).ok_or_else(|| RangeError::Malformed(raw.to_string()))?)
    };

    if start >= total_size {
        return Err(unsatisfiable);
    }
    if matches!(end, Some(end) if start > end) {
        return Err(unsatisfiable);
    }

    Ok(RangeRequest::Window { start, end })
}

/// Digits only; `u64::from_str` would also accept a leading `+`.
fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
