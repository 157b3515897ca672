//! Error types for the docraptor client.
//!
//! A single error type, [`DocRaptorError`], covers every way a call can fail
//! *before* or *during* the HTTP exchange. A completed exchange that carries a
//! non-2xx status is **not** an error: it comes back as an ordinary
//! [`crate::response::DocumentResponse`] with `success() == false`, so callers
//! can read the service's error body instead of losing it to an `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docraptor library.
#[derive(Debug, Error)]
pub enum DocRaptorError {
    // ── Caller errors ─────────────────────────────────────────────────────
    /// A request argument is missing or invalid. Raised before any I/O.
    #[error("Invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// Client configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Transport errors ──────────────────────────────────────────────────
    /// The HTTP exchange could not complete (DNS, connection, TLS, body read).
    #[error("Request to '{endpoint}' failed: {reason}\nCheck your internet connection.")]
    Transport { endpoint: String, reason: String },

    /// The transport timeout elapsed. `secs` is `None` when the timeout was
    /// set on an injected `reqwest::Client` and is not known here.
    #[error("Request to '{endpoint}' timed out{}\nIncrease the client timeout.", after_secs(.secs))]
    Timeout { endpoint: String, secs: Option<u64> },

    // ── Response contract errors ──────────────────────────────────────────
    /// `X-DocRaptor-Num-Pages` was present but not an unsigned integer.
    #[error("Malformed X-DocRaptor-Num-Pages header: {value:?}")]
    MalformedPageCount { value: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocRaptorError {
    pub(crate) fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        DocRaptorError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// `true` for errors raised before a request was sent.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, DocRaptorError::InvalidArgument { .. })
    }

    /// `true` when the network exchange itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DocRaptorError::Transport { .. } | DocRaptorError::Timeout { .. }
        )
    }
}

fn after_secs(secs: &Option<u64>) -> String {
    secs.map(|s| format!(" after {s}s")).unwrap_or_default()
}
