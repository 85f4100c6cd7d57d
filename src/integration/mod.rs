//! Integration testing module
//!
//! End-to-end tests for the streaming server:
//! - Full and partial content over a real connection
//! - Bounded-chunk streaming of large files
//! - Client disconnects mid-stream
//! - Concurrent independent streams

mod e2e;
pub mod fixtures;
