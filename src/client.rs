//! The DocRaptor client: one POST per document.
//!
//! ## Call flow
//!
//! ```text
//! GenerationRequest ──▶ validate ──▶ build_form ──▶ POST ──▶ DocumentResponse
//!                      (no I/O)     (BTreeMap)    (reqwest)  (status, pages, bytes)
//! ```
//!
//! Failures before the POST are [`DocRaptorError::InvalidArgument`]. A POST
//! that cannot complete is [`DocRaptorError::Transport`] or
//! [`DocRaptorError::Timeout`]. A POST that completes with 4xx/5xx is *not* an
//! error: it returns a [`DocumentResponse`] whose `success()` is false.
//!
//! There are no retries. Whether to retry a failed or rejected document is the
//! caller's decision.

use crate::config::ClientConfig;
use crate::error::DocRaptorError;
use crate::form::{self, CREDENTIALS_PARAM};
use crate::request::{parse_url, GenerationRequest};
use crate::response::DocumentResponse;
use std::fmt;
use tracing::{debug, info, warn};

/// Async client for the DocRaptor document service.
///
/// Cheap to clone: clones share one pooled HTTP transport. Holds no per-call
/// state, so one instance can serve any number of concurrent calls.
///
/// # Example
/// ```rust,no_run
/// use docraptor::{ClientConfig, DocRaptorClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::builder("YOUR_API_KEY").test_mode(true).build()?;
/// let client = DocRaptorClient::new(config)?;
///
/// let response = client
///     .generate_pdf_from_content("<html><body><h1>Hello</h1></body></html>")
///     .await?;
/// if response.success() {
///     response.save_as("hello.pdf").await?;
///     println!("{} pages", response.number_of_pages());
/// } else {
///     eprintln!("{}: {}", response.reason_phrase(), response.text());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DocRaptorClient {
    config: ClientConfig,
    http: reqwest::Client,
    /// Timeout applied to `http`, if this client built it.
    timeout_secs: Option<u64>,
}

impl fmt::Debug for DocRaptorClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocRaptorClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocRaptorClient {
    /// Create a client with its own pooled transport.
    pub fn new(config: ClientConfig) -> Result<Self, DocRaptorError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DocRaptorError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            timeout_secs: config.timeout_secs,
            config,
            http,
        })
    }

    /// Create a client that reuses an existing transport.
    ///
    /// `config.timeout_secs` and `config.user_agent` are not applied; set them
    /// on `http` instead.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            http,
            timeout_secs: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Generate a document.
    ///
    /// # Returns
    /// `Ok(DocumentResponse)` for every completed exchange, including 4xx/5xx
    /// (check `response.success()`).
    ///
    /// # Errors
    /// - `InvalidArgument`: blank name; nothing is sent
    /// - `Transport` / `Timeout`: the exchange did not complete
    /// - `MalformedPageCount`: the page-count header was not an integer
    pub async fn generate_document(
        &self,
        request: &GenerationRequest,
    ) -> Result<DocumentResponse, DocRaptorError> {
        request.validate()?;

        let endpoint = self.config.endpoint();
        let fields = form::build_form(request, &self.config);
        info!(
            "Generating {} '{}' from {}",
            request.document_type,
            request.name,
            request.source.kind()
        );
        debug!("POST {} with {} form fields", endpoint, fields.len());

        let response = self
            .http
            .post(&endpoint)
            .query(&[(CREDENTIALS_PARAM, self.config.api_key.as_str())])
            .form(&fields)
            .send()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        let status = response.status();
        // hyper only records the phrase when it differs from the canonical one.
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .map(|r| String::from_utf8_lossy(r.as_bytes()).into_owned());
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        let document = DocumentResponse::with_reason(status, reason, headers, body.to_vec())?;

        if document.success() {
            info!(
                "Generated '{}': {} bytes, {} pages",
                request.name,
                document.bytes().len(),
                document.number_of_pages()
            );
        } else {
            warn!(
                "DocRaptor rejected '{}': HTTP {} {}",
                request.name,
                document.status().as_u16(),
                document.reason_phrase()
            );
        }

        Ok(document)
    }

    /// Generate a PDF from a publicly reachable URL, with default options.
    pub async fn generate_pdf_from_url(
        &self,
        url: &str,
    ) -> Result<DocumentResponse, DocRaptorError> {
        let url = parse_url(url)?;
        self.generate_document(&GenerationRequest::from_url(url))
            .await
    }

    /// Generate a PDF from inline HTML, with default options.
    pub async fn generate_pdf_from_content(
        &self,
        content: impl Into<String>,
    ) -> Result<DocumentResponse, DocRaptorError> {
        self.generate_document(&GenerationRequest::from_content(content))
            .await
    }

    /// Synchronous wrapper around [`generate_document`](Self::generate_document).
    ///
    /// Creates a temporary tokio runtime internally, so it must not be called
    /// from inside an async context.
    pub fn generate_document_sync(
        &self,
        request: &GenerationRequest,
    ) -> Result<DocumentResponse, DocRaptorError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| DocRaptorError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.generate_document(request))
    }

    /// Map a reqwest failure, keeping the credential out of the message.
    fn transport_error(&self, endpoint: &str, e: reqwest::Error) -> DocRaptorError {
        if e.is_timeout() {
            return DocRaptorError::Timeout {
                endpoint: endpoint.to_string(),
                secs: self.timeout_secs,
            };
        }
        DocRaptorError::Transport {
            endpoint: endpoint.to_string(),
            reason: error_chain(&e.without_url()),
        }
    }
}

/// Render an error and its sources as `outer: inner: root`.
fn error_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}
