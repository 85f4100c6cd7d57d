//! Test fixtures for integration tests
//!
//! Runs the real router on a loopback socket over a temporary media directory.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::auth::{AuthCheck, OpenAccess};
use crate::config::ServerConfig;
use crate::http::create_router;
use crate::state::AppState;
use crate::storage::DirectoryLookup;

/// Deterministic, non-repeating-per-KB content so misplaced bytes show up
pub fn video_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| ((i ^ (i >> 8) ^ (i >> 16)) % 256) as u8)
        .collect()
}

/// A server bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    _media_dir: tempfile::TempDir,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over `files` with open access
    pub async fn start(files: &[(&str, &[u8])], chunk_size_kb: usize) -> Self {
        Self::start_with_auth(files, chunk_size_kb, Arc::new(OpenAccess)).await
    }

    pub async fn start_with_auth(
        files: &[(&str, &[u8])],
        chunk_size_kb: usize,
        auth: Arc<dyn AuthCheck>,
    ) -> Self {
        let media_dir = tempfile::tempdir().unwrap();
        for (name, data) in files {
            std::fs::write(media_dir.path().join(name), data).unwrap();
        }

        let mut config = ServerConfig::default();
        config.host = "127.0.0.1".to_string();
        config.storage.media_dir = media_dir.path().to_path_buf();
        config.streaming.chunk_size_kb = chunk_size_kb;

        let lookup = DirectoryLookup::open(media_dir.path()).await.unwrap();
        let state = Arc::new(AppState::new(config, Arc::new(lookup), auth));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            _media_dir: media_dir,
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
