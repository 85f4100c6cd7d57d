//! Range streaming module
//!
//! Serves a resolved video for one request:
//! - Range planning against the size measured for this request
//! - Chunked emission of the file window
//! - Response status and framing headers
//!
//! Each request moves once through parse, resolve, then either stream or
//! reject. Nothing is shared between concurrent streams except counters.

pub mod emitter;
pub mod response;

use axum::body::Body;
use axum::response::Response;
use std::sync::Arc;

use crate::error::Result;
use crate::metrics::Metrics;
use crate::range::{self, RangeResponse};
use crate::storage::VideoHandle;

pub use emitter::FileWindow;
pub use response::{assemble, unsatisfiable};

/// Per-request streaming options
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    /// Upper bound on a single read, in bytes
    pub chunk_size: usize,
    /// Send headers only (HEAD)
    pub headers_only: bool,
}

/// Serve `handle` for the given `Range` header value.
///
/// The file is only opened for a satisfiable outcome with a body to send.
pub async fn serve(
    handle: &VideoHandle,
    range_header: Option<&str>,
    options: StreamOptions,
    metrics: Arc<Metrics>,
) -> Result<(RangeResponse, Response)> {
    let outcome = range::plan(range_header, handle.size);

    let Some((offset, len)) = outcome.window() else {
        tracing::debug!(
            video = %handle.id,
            range = range_header.unwrap_or_default(),
            total_size = handle.size,
            "range not satisfiable"
        );
        metrics.record_unsatisfiable();
        return Ok((outcome, unsatisfiable(outcome.total_size())));
    };

    if options.headers_only {
        return Ok((outcome, assemble(&outcome, handle.content_type, Body::empty())));
    }

    let window = FileWindow::open(handle, offset, len, options.chunk_size)
        .await?
        .with_metrics(metrics);
    tracing::debug!(
        video = %handle.id,
        status = %outcome.status(),
        offset,
        len = window.remaining(),
        "streaming window"
    );
    let body = Body::from_stream(window.into_stream());

    Ok((outcome, assemble(&outcome, handle.content_type, body)))
}
