//! Prometheus-compatible metrics endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::state::AppState;

/// Metrics collector
#[derive(Debug)]
pub struct Metrics {
    /// Server start time
    start_time: Instant,
    /// Requests by route
    requests_by_route: RwLock<HashMap<String, u64>>,
    /// Total body bytes handed to the transport
    bytes_sent: AtomicU64,
    /// Streams whose body began
    streams_started: AtomicU64,
    /// Streams that delivered their whole window
    streams_completed: AtomicU64,
    /// Streams ended early by the client
    client_disconnects: AtomicU64,
    /// 416 responses
    unsatisfiable_ranges: AtomicU64,
    /// Errors by kind
    errors_by_kind: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            requests_by_route: RwLock::new(HashMap::new()),
            bytes_sent: AtomicU64::new(0),
            streams_started: AtomicU64::new(0),
            streams_completed: AtomicU64::new(0),
            client_disconnects: AtomicU64::new(0),
            unsatisfiable_ranges: AtomicU64::new(0),
            errors_by_kind: RwLock::new(HashMap::new()),
        }
    }

    pub fn record_request(&self, route: &str) {
        *self
            .requests_by_route
            .write()
            .entry(route.to_string())
            .or_insert(0) += 1;
    }

    pub fn record_bytes(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_stream_started(&self) {
        self.streams_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stream_completed(&self) {
        self.streams_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_client_disconnect(&self) {
        self.client_disconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unsatisfiable(&self) {
        self.unsatisfiable_ranges.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self, kind: &str) {
        *self
            .errors_by_kind
            .write()
            .entry(kind.to_string())
            .or_insert(0) += 1;
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    pub fn streams_started(&self) -> u64 {
        self.streams_started.load(Ordering::Relaxed)
    }

    pub fn streams_completed(&self) -> u64 {
        self.streams_completed.load(Ordering::Relaxed)
    }

    pub fn client_disconnects(&self) -> u64 {
        self.client_disconnects.load(Ordering::Relaxed)
    }

    pub fn unsatisfiable_ranges(&self) -> u64 {
        self.unsatisfiable_ranges.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub fn error_count(&self, kind: &str) -> u64 {
        self.errors_by_kind.read().get(kind).copied().unwrap_or(0)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP video_server_uptime_seconds Server uptime in seconds\n");
        output.push_str("# TYPE video_server_uptime_seconds counter\n");
        output.push_str(&format!("video_server_uptime_seconds {}\n", self.uptime_secs()));

        output.push_str("\n# HELP video_requests_total Requests by route\n");
        output.push_str("# TYPE video_requests_total counter\n");
        for (route, count) in self.requests_by_route.read().iter() {
            output.push_str(&format!(
                "video_requests_total{{route=\"{}\"}} {}\n",
                route, count
            ));
        }

        let counters = [
            ("video_bytes_sent_total", "Body bytes sent", self.bytes_sent()),
            ("video_streams_started_total", "Streams started", self.streams_started()),
            ("video_streams_completed_total", "Streams fully delivered", self.streams_completed()),
            ("video_client_disconnects_total", "Streams ended early by the client", self.client_disconnects()),
            ("video_unsatisfiable_ranges_total", "Range Not Satisfiable responses", self.unsatisfiable_ranges()),
        ];
        for (name, help, value) in counters {
            output.push_str(&format!("\n# HELP {} {}\n", name, help));
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!("{} {}\n", name, value));
        }

        output.push_str("\n# HELP video_errors_total Errors by kind\n");
        output.push_str("# TYPE video_errors_total counter\n");
        for (kind, count) in self.errors_by_kind.read().iter() {
            output.push_str(&format!("video_errors_total{{kind=\"{}\"}} {}\n", kind, count));
        }

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics endpoint handler
/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        state.metrics.export_prometheus(),
    )
        .into_response()
}
