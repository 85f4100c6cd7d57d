//! HTTP request handlers
//!
//! Service endpoints and video metadata.

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;

use crate::auth::Caller;
use crate::error::{Result, StreamError};
use crate::state::AppState;
use crate::storage::VideoId;

/// Query parameters accepted on video routes
///
/// Never rejects a request: an unreadable query carries no token and the
/// request falls through to the authorization outcome.
#[derive(Debug, Default)]
pub struct AccessQuery {
    /// Bearer token, for clients that cannot set headers (`<video src>`).
    /// The first `token` parameter wins.
    pub token: Option<String>,
}

impl<S> FromRequestParts<S> for AccessQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(pairs)| {
                pairs
                    .into_iter()
                    .find(|(key, _)| key == "token")
                    .map(|(_, value)| value)
            });
        Ok(Self { token })
    }
}

/// Video metadata response
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub size: u64,
    pub content_type: String,
    pub views: u64,
}

/// Ask the Authorization Gate whether this request may read `id`.
pub async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    query: &AccessQuery,
    id: &VideoId,
) -> Result<()> {
    let caller = Caller::from_request(headers, query.token.as_deref());
    if state.auth.permit(caller.as_ref(), id).await {
        return Ok(());
    }
    Err(match caller {
        None => StreamError::Unauthorized(id.to_string()),
        Some(_) => StreamError::Forbidden(id.to_string()),
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("video-range-server v", env!("CARGO_PKG_VERSION"))
}

/// Video metadata endpoint
/// GET /api/video/{video_id}
pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    query: AccessQuery,
    headers: HeaderMap,
) -> Result<Json<VideoInfo>> {
    state.metrics.record_request("video_info");

    let id = VideoId::parse(&video_id)?;
    authorize(&state, &headers, &query, &id).await?;
    let handle = state.lookup.resolve(&id).await?;

    Ok(Json(VideoInfo {
        id: handle.id.to_string(),
        size: handle.size,
        content_type: handle.content_type.to_string(),
        views: state.view_count(&id),
    }))
}
