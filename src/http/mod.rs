//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the streaming and metadata endpoints
//! - Range-aware video streaming handler
//! - Authorization of callers before any file is opened
//! - CORS middleware exposing the range headers

pub mod handlers;
pub mod routes;
pub mod stream;

pub use routes::create_router;
