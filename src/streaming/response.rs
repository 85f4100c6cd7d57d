//! Response assembly
//!
//! Status and framing headers for a resolved range outcome. Browser media
//! elements rely on these exact header values to seek.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::range::RangeResponse;

/// Build the response for `outcome` around `body`.
///
/// `Accept-Ranges: bytes` is always present. Content type is only set when a
/// body follows.
pub fn assemble(outcome: &RangeResponse, content_type: &str, body: Body) -> Response {
    let mut builder = Response::builder()
        .status(outcome.status())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, outcome.content_length());

    if let Some(content_range) = outcome.content_range() {
        builder = builder.header(header::CONTENT_RANGE, content_range);
    }
    if outcome.window().is_some() {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder.body(body).unwrap_or_else(|e| {
        tracing::error!("Response building error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// `416 Range Not Satisfiable` with `Content-Range: bytes */<total_size>`
pub fn unsatisfiable(total_size: u64) -> Response {
    assemble(
        &RangeResponse::Unsatisfiable { total_size },
        "",
        Body::empty(),
    )
}
