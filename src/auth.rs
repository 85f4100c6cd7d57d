//! Authorization gate
//!
//! Decides whether a caller may read a video before any file is opened.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use std::collections::{HashMap, HashSet};

use crate::config::{AuthConfig, AuthMode};
use crate::storage::VideoId;

/// Credential presented with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    token: String,
}

impl Caller {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Extract the caller from `Authorization: Bearer <token>`, falling back
    /// to a `token` query parameter.
    pub fn from_request(headers: &HeaderMap, query_token: Option<&str>) -> Option<Self> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| {
                let (scheme, token) = v.trim().split_once(' ')?;
                scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
            });

        bearer
            .or(query_token)
            .filter(|t| !t.is_empty())
            .map(Caller::new)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Authorization Gate capability
#[async_trait]
pub trait AuthCheck: Send + Sync {
    /// Whether `caller` may read `id`
    async fn permit(&self, caller: Option<&Caller>, id: &VideoId) -> bool;
}

/// Everyone may read everything
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAccess;

#[async_trait]
impl AuthCheck for OpenAccess {
    async fn permit(&self, _caller: Option<&Caller>, _id: &VideoId) -> bool {
        true
    }
}

/// Static bearer tokens, optionally limited to specific videos
#[derive(Debug, Default, Clone)]
pub struct TokenAccess {
    /// token -> allowed ids (`None` = all)
    grants: HashMap<String, Option<HashSet<String>>>,
}

impl TokenAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `token` to read every video
    pub fn grant_all(mut self, token: impl Into<String>) -> Self {
        self.grants.insert(token.into(), None);
        self
    }

    /// Allow `token` to read only `videos`
    pub fn grant<I, S>(mut self, token: impl Into<String>, videos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants
            .insert(token.into(), Some(videos.into_iter().map(Into::into).collect()));
        self
    }
}

#[async_trait]
impl AuthCheck for TokenAccess {
    async fn permit(&self, caller: Option<&Caller>, id: &VideoId) -> bool {
        let Some(caller) = caller else {
            return false;
        };
        match self.grants.get(caller.token()) {
            Some(None) => true,
            Some(Some(videos)) => videos.contains(id.as_str()),
            None => false,
        }
    }
}

/// Build the gate described by the configuration
pub fn from_config(config: &AuthConfig) -> Box<dyn AuthCheck> {
    match config.mode {
        AuthMode::Open => Box::new(OpenAccess),
        AuthMode::Token => {
            let access = config
                .tokens
                .iter()
                .fold(TokenAccess::new(), |access, grant| match &grant.videos {
                    Some(videos) => access.grant(grant.token.clone(), videos.iter().cloned()),
                    None => access.grant_all(grant.token.clone()),
                });
            Box::new(access)
        }
    }
}
