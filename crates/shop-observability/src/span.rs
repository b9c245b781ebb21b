//! Trace context propagation.

use uuid::Uuid;

/// Header carrying the W3C trace context on outbound requests.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Trace context for distributed tracing.
///
/// Compatible with W3C Trace Context format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// The trace ID (128-bit, hex encoded).
    pub trace_id: String,
    /// The span ID (64-bit, hex encoded).
    pub span_id: String,
    /// Parent span ID if this is a child span.
    pub parent_span_id: Option<String>,
    /// Trace flags (e.g., sampled).
    pub flags: TraceFlags,
}

/// Trace flags indicating sampling decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceFlags {
    /// Whether this trace is sampled.
    pub sampled: bool,
}

impl TraceContext {
    /// Create a new root trace context.
    pub fn new() -> Self {
        Self {
            trace_id: generate_trace_id(),
            span_id: generate_span_id(),
            parent_span_id: None,
            flags: TraceFlags { sampled: true },
        }
    }

    /// Create a child span from this context.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: generate_span_id(),
            parent_span_id: Some(self.span_id.clone()),
            flags: self.flags,
        }
    }

    /// Parse from W3C traceparent header.
    ///
    /// Format: `{version}-{trace_id}-{span_id}-{flags}`
    /// Example: `00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01`
    pub fn from_traceparent(header: &str) -> Option<Self> {
        let parts: Vec<&str> = header.trim().split('-').collect();
        let [version, trace_id, span_id, flags] = parts.as_slice() else {
            return None;
        };

        if *version != "00" {
            return None; // Only support version 00
        }
        if !is_hex(trace_id, 32) || !is_hex(span_id, 16) {
            return None;
        }

        let flags = u8::from_str_radix(flags, 16).ok()?;

        Some(Self {
            trace_id: trace_id.to_string(),
            span_id: span_id.to_string(),
            parent_span_id: None,
            flags: TraceFlags {
                sampled: flags & 0x01 != 0,
            },
        })
    }

    /// Format as W3C traceparent header.
    pub fn to_traceparent(&self) -> String {
        let flags = if self.flags.sampled { "01" } else { "00" };
        format!("00-{}-{}-{}", self.trace_id, self.span_id, flags)
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hex(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn generate_trace_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn generate_span_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..16].to_string()
}
