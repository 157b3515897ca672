//! The outcome of one completed DocRaptor exchange.
//!
//! A [`DocumentResponse`] is produced for *every* exchange that completes,
//! whatever the status code. Check [`DocumentResponse::success`] before
//! treating [`DocumentResponse::bytes`] as a document: on failure the body is
//! the service's error message instead.

use crate::error::DocRaptorError;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Response header carrying the page count of a generated PDF.
pub const NUM_PAGES_HEADER: &str = "x-docraptor-num-pages";

/// Read-only view over a completed HTTP exchange.
///
/// All fields are fixed at construction; there are no setters.
#[derive(Clone)]
pub struct DocumentResponse {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    number_of_pages: u32,
}

impl DocumentResponse {
    /// Wrap a status, headers and body. The reason phrase is the canonical
    /// one for `status`.
    ///
    /// # Errors
    /// [`DocRaptorError::MalformedPageCount`] when the page-count header is
    /// present but is not an unsigned integer.
    pub fn from_parts(
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Self, DocRaptorError> {
        Self::with_reason(status, None, headers, body)
    }

    /// Like [`from_parts`](Self::from_parts), keeping the reason phrase the
    /// server sent on the status line.
    pub fn with_reason(
        status: StatusCode,
        reason: Option<String>,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<Self, DocRaptorError> {
        let number_of_pages = parse_page_count(&headers)?;
        Ok(Self {
            status,
            reason,
            headers,
            body,
            number_of_pages,
        })
    }

    /// `true` iff the status code is in 200..=299.
    pub fn success(&self) -> bool {
        self.status.is_success()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason text from the status line, e.g. `"Unprocessable Entity"`.
    ///
    /// Falls back to the canonical reason when the server's phrase was not
    /// kept, and to `""` for codes without one.
    pub fn reason_phrase(&self) -> &str {
        self.reason
            .as_deref()
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("")
    }

    /// Pages in the generated PDF, or 0 when the service did not report it.
    pub fn number_of_pages(&self) -> u32 {
        self.number_of_pages
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The payload: the document on success, the error body otherwise.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// The payload as text, replacing invalid UTF-8. Meant for error bodies.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Write the payload to `path`, creating or truncating the file.
    ///
    /// The file handle is closed before this returns, whether the write
    /// succeeded or not. Nothing checks [`success`](Self::success) here: saving
    /// an error body is allowed.
    pub async fn save_as(&self, path: impl AsRef<Path>) -> Result<(), DocRaptorError> {
        let path = path.as_ref();
        let write_failed = |source: std::io::Error| DocRaptorError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let mut file = tokio::fs::File::create(path).await.map_err(write_failed)?;
        file.write_all(&self.body).await.map_err(write_failed)?;
        file.flush().await.map_err(write_failed)?;
        drop(file);

        debug!("Saved {} bytes to {}", self.body.len(), path.display());
        Ok(())
    }
}

impl fmt::Debug for DocumentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentResponse")
            .field("status", &self.status)
            .field("reason", &self.reason_phrase())
            .field("number_of_pages", &self.number_of_pages)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Parse `X-DocRaptor-Num-Pages`; absent means 0.
fn parse_page_count(headers: &HeaderMap) -> Result<u32, DocRaptorError> {
    let Some(raw) = headers.get(NUM_PAGES_HEADER) else {
        return Ok(0);
    };
    let malformed = || DocRaptorError::MalformedPageCount {
        value: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
    };
    raw.to_str()
        .map_err(|_| malformed())?
        .trim()
        .parse::<u32>()
        .map_err(|_| malformed())
}
