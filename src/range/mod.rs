//! Range handling module
//!
//! Turns an HTTP `Range` header into the byte window to serve:
//! - Header parsing (single `bytes=` ranges, suffix ranges)
//! - Clamping against the file size measured for the request
//! - Status and framing values for the response

pub mod parser;
pub mod window;

pub use window::{plan, RangeResponse};
