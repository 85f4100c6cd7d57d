//! Storage module
//!
//! Maps video identifiers to files on disk:
//! - `VideoId` validation
//! - `VideoHandle` metadata, measured fresh for each request
//! - `VideoLookup` capability and its directory-backed implementation

pub mod directory;

use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Result, StreamError};

pub use directory::DirectoryLookup;

/// Extensions accepted for upload, and therefore for streaming, with their MIME types
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("flv", "video/x-flv"),
];

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,254}$").expect("video id pattern is valid")
    })
}

/// Opaque identifier of a stored video
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Validate a raw identifier. Ids never name a path outside the store.
    pub fn parse(raw: &str) -> Result<Self> {
        if !id_pattern().is_match(raw) || raw.contains("..") {
            return Err(StreamError::NotFound(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored media file, resolved for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHandle {
    pub id: VideoId,
    /// Absolute path of the file
    pub path: PathBuf,
    /// Size in bytes at resolution time
    pub size: u64,
    pub content_type: &'static str,
}

/// Storage Resolver capability
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// Resolve `id` to a file and its current size, or `StreamError::NotFound`.
    async fn resolve(&self, id: &VideoId) -> Result<VideoHandle>;
}

/// MIME type for a video file, by extension
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    VIDEO_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|&(_, mime)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_accepts_stored_names() {
        assert!(VideoId::parse("3f2b8c1e-9d4a-4f7e-8a21-0c6d5e4b3a29.mp4").is_ok());
        assert!(VideoId::parse("1_1700000000.webm").is_ok());
    }

    #[test]
    fn test_video_id_rejects_paths() {
        for raw in ["", "../etc/passwd", "a/b.mp4", "a\\b.mp4", ".hidden.mp4", "a..mp4", "clip%2F.mp4"] {
            assert!(
                matches!(VideoId::parse(raw), Err(StreamError::NotFound(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.mp4")), Some("video/mp4"));
        assert_eq!(content_type_for(Path::new("a.MKV")), Some("video/x-matroska"));
        assert_eq!(content_type_for(Path::new("a.webm")), Some("video/webm"));
        assert_eq!(content_type_for(Path::new("a.txt")), None);
        assert_eq!(content_type_for(Path::new("noext")), None);
    }

    #[test]
    fn test_every_accepted_extension_has_a_type() {
        for (ext, mime) in VIDEO_TYPES {
            let name = format!("clip.{ext}");
            assert_eq!(content_type_for(Path::new(&name)), Some(*mime), "{ext}");
        }
        assert_eq!(content_type_for(Path::new("clip.MOV")), Some("video/quicktime"));
    }
}
