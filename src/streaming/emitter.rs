//! Chunked file emitter
//!
//! Reads a byte window of a file in bounded chunks and hands each chunk to
//! the response body as the transport asks for it. At most one chunk is in
//! memory per stream, whatever the file size.

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, Stream};
use std::io::{self, SeekFrom};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::metrics::Metrics;
use crate::storage::{VideoHandle, VideoId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitState {
    Streaming,
    Completed,
    Failed,
}

/// An open file positioned at the start of the window to emit.
///
/// Owns the file handle; dropping the window closes it. A window dropped
/// while bytes remain means the client went away, which is logged and
/// counted but is not an error.
#[derive(Debug)]
pub struct FileWindow {
    file: File,
    video_id: VideoId,
    start: u64,
    sent: u64,
    remaining: u64,
    chunk_size: usize,
    state: EmitState,
    metrics: Option<Arc<Metrics>>,
}

impl FileWindow {
    /// Open `handle` and seek to `start`, ready to emit `len` bytes.
    pub async fn open(handle: &VideoHandle, start: u64, len: u64, chunk_size: usize) -> io::Result<Self> {
        if chunk_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "chunk size must be greater than zero",
            ));
        }

        let mut file = File::open(&handle.path).await?;
        file.seek(SeekFrom::Start(start)).await?;

        Ok(Self {
            file,
            video_id: handle.id.clone(),
            start,
            sent: 0,
            remaining: len,
            chunk_size,
            state: EmitState::Streaming,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.record_stream_started();
        self.metrics = Some(metrics);
        self
    }

    /// Bytes still to be emitted
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Read the next chunk of the window, or `None` once it is exhausted.
    ///
    /// A chunk never extends past the window end.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Bytes>> {
        if self.state != EmitState::Streaming {
            return Ok(None);
        }
        if self.remaining == 0 {
            self.complete();
            return Ok(None);
        }

        let want = self.remaining.min(self.chunk_size as u64) as usize;
        let mut buf = BytesMut::zeroed(want);
        let n = match self.file.read(&mut buf).await {
            Ok(0) => {
                let err = io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("file ended {} bytes before the end of the window", self.remaining),
                );
                self.fail(&err);
                return Err(err);
            }
            Ok(n) => n,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };
        buf.truncate(n);

        self.sent += n as u64;
        self.remaining -= n as u64;
        if let Some(metrics) = &self.metrics {
            metrics.record_bytes(n as u64);
        }
        // The transport may stop polling once Content-Length bytes are out
        if self.remaining == 0 {
            self.complete();
        }

        Ok(Some(buf.freeze()))
    }

    /// Turn the window into a body stream. Each poll performs one read, so
    /// nothing is read ahead of what the transport has accepted.
    pub fn into_stream(self) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
        stream::try_unfold(self, |mut window| async move {
            Ok(window.next_chunk().await?.map(|chunk| (chunk, window)))
        })
    }

    fn complete(&mut self) {
        self.state = EmitState::Completed;
        tracing::debug!(
            video = %self.video_id,
            start = self.start,
            bytes = self.sent,
            "stream completed"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_stream_completed();
        }
    }

    fn fail(&mut self, err: &io::Error) {
        self.state = EmitState::Failed;
        tracing::error!(
            video = %self.video_id,
            offset = self.start + self.sent,
            remaining = self.remaining,
            "read failed mid-stream, aborting response: {}",
            err
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_error("io");
        }
    }
}

impl Drop for FileWindow {
    fn drop(&mut self) {
        if self.state == EmitState::Streaming && self.remaining > 0 {
            tracing::debug!(
                video = %self.video_id,
                sent = self.sent,
                remaining = self.remaining,
                "client disconnected before end of window"
            );
            if let Some(metrics) = &self.metrics {
                metrics.record_client_disconnect();
            }
        }
    }
}
