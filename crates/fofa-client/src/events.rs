//! Structured client events.
//!
//! The client reports what it does through an [`EventSink`] instead of
//! calling a logger directly. [`TracingSink`] is the default and forwards
//! to `tracing`; tests and embedders can install their own sink.
//! Credentials are never part of an event.

use fofa_core::FofaError;
use tracing::{debug, warn};

/// Something the client did or observed
#[derive(Debug)]
pub enum ClientEvent<'a> {
    /// A request is about to be sent
    Request {
        /// Endpoint path relative to the API base
        path: &'a str,
    },

    /// A search page was decoded
    PageFetched {
        /// Endpoint path relative to the API base
        path: &'a str,
        /// Rows in this page
        rows: usize,
        /// Total match estimate reported by the server
        total: u64,
        /// True if the server signalled the end of the result set
        exhausted: bool,
    },

    /// A request failed
    Error {
        /// Endpoint path relative to the API base
        path: &'a str,
        /// The error returned to the caller
        error: &'a FofaError,
    },
}

/// Receiver for [`ClientEvent`]s
pub trait EventSink: Send + Sync {
    /// Handle one event
    fn event(&self, event: &ClientEvent<'_>);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn event(&self, event: &ClientEvent<'_>) {
        match event {
            ClientEvent::Request { path } => debug!(path, "GET request"),
            ClientEvent::PageFetched {
                path,
                rows,
                total,
                exhausted,
            } => debug!(path, rows, total, exhausted, "page fetched"),
            ClientEvent::Error { path, error } => {
                warn!(path, error = %error, retryable = error.is_retryable(), "request failed");
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn event(&self, _event: &ClientEvent<'_>) {}
}
