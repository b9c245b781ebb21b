//! Observability infrastructure for the shopfront clients.
//!
//! This crate provides:
//! - `init_logging` - `tracing` subscriber setup (JSON or human output)
//! - `TraceContext` - W3C trace context for outbound request propagation

mod logging;
mod span;

pub use logging::*;
pub use span::*;
