//! Directory-backed video store

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{content_type_for, VideoHandle, VideoId, VideoLookup};
use crate::error::{Result, StreamError};

/// Resolves ids to files directly inside the media directory.
#[derive(Debug, Clone)]
pub struct DirectoryLookup {
    root: PathBuf,
}

impl DirectoryLookup {
    /// Open a store rooted at `media_dir`, creating the directory if needed.
    pub async fn open<P: AsRef<Path>>(media_dir: P) -> Result<Self> {
        let media_dir = media_dir.as_ref();
        tokio::fs::create_dir_all(media_dir).await?;
        let root = tokio::fs::canonicalize(media_dir).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl VideoLookup for DirectoryLookup {
    async fn resolve(&self, id: &VideoId) -> Result<VideoHandle> {
        let path = self.root.join(id.as_str());
        let content_type =
            content_type_for(&path).ok_or_else(|| StreamError::NotFound(id.to_string()))?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StreamError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(StreamError::NotFound(id.to_string()));
        }

        Ok(VideoHandle {
            id: id.clone(),
            path,
            size: metadata.len(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), vec![7u8; 1000]).unwrap();

        let lookup = DirectoryLookup::open(dir.path()).await.unwrap();
        let handle = lookup
            .resolve(&VideoId::parse("clip.mp4").unwrap())
            .await
            .unwrap();

        assert_eq!(handle.size, 1000);
        assert_eq!(handle.content_type, "video/mp4");
        assert!(handle.path.is_absolute());
    }

    #[tokio::test]
    async fn test_size_is_measured_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("grow.webm");
        std::fs::write(&file, vec![0u8; 10]).unwrap();

        let lookup = DirectoryLookup::open(dir.path()).await.unwrap();
        let id = VideoId::parse("grow.webm").unwrap();
        assert_eq!(lookup.resolve(&id).await.unwrap().size, 10);

        std::fs::write(&file, vec![0u8; 25]).unwrap();
        assert_eq!(lookup.resolve(&id).await.unwrap().size, 25);
    }

    #[tokio::test]
    async fn test_missing_and_unsupported_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let lookup = DirectoryLookup::open(dir.path()).await.unwrap();
        for raw in ["absent.mp4", "notes.txt", "folder.mp4"] {
            let result = lookup.resolve(&VideoId::parse(raw).unwrap()).await;
            assert!(matches!(result, Err(StreamError::NotFound(_))), "{raw}");
        }
    }

    #[tokio::test]
    async fn test_open_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");
        let lookup = DirectoryLookup::open(&nested).await.unwrap();
        assert!(lookup.root().is_dir());
    }
}
