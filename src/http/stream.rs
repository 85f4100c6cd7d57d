//! Video streaming handler
//!
//! GET/HEAD /api/stream/{video_id}

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method},
    response::Response,
};
use std::sync::Arc;

use super::handlers::{authorize, AccessQuery};
use crate::error::{Result, StreamError};
use crate::state::AppState;
use crate::storage::VideoId;
use crate::streaming::{self, StreamOptions};

/// Stream a stored video, honoring `Range` requests
pub async fn stream_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    query: AccessQuery,
    method: Method,
    headers: HeaderMap,
) -> Result<Response> {
    state.metrics.record_request("stream");

    let result = serve_stream(&state, &video_id, &query, &method, &headers).await;
    if let Err(e) = &result {
        state.metrics.record_error(e.kind());
        match e {
            StreamError::Io(_) => {
                tracing::error!(video = %video_id, "stream failed: {}", e);
            }
            _ => {
                tracing::debug!(video = %video_id, "stream rejected: {}", e);
            }
        }
    }
    result
}

async fn serve_stream(
    state: &AppState,
    raw_id: &str,
    query: &AccessQuery,
    method: &Method,
    headers: &HeaderMap,
) -> Result<Response> {
    let id = VideoId::parse(raw_id)?;
    authorize(state, headers, query, &id).await?;

    let handle = state.lookup.resolve(&id).await?;

    // A Range value that is not visible ASCII can only be malformed
    let range_header = headers
        .get(header::RANGE)
        .map(|v| v.to_str().unwrap_or_default());

    let options = StreamOptions {
        chunk_size: state.chunk_size(),
        headers_only: method == Method::HEAD,
    };
    let (outcome, response) =
        streaming::serve(&handle, range_header, options, state.metrics.clone()).await?;

    if outcome.window().is_some() && !options.headers_only {
        state.record_view(&id);
    }

    Ok(response)
}
