//! Per-call generation options.
//!
//! A [`GenerationRequest`] describes one document to generate. Every optional
//! knob has a documented default, so the common case is a one-liner:
//!
//! ```rust
//! use docraptor::{DocumentType, GenerationRequest};
//!
//! let req = GenerationRequest::from_content("<html><body>Hi</body></html>");
//! assert_eq!(req.name, "Untitled");
//! assert_eq!(req.document_type, DocumentType::Pdf);
//!
//! let sheet = GenerationRequest::builder()
//!     .url("https://example.com/report.html")
//!     .document_type(DocumentType::Xlsx)
//!     .name("Q3 report")
//!     .build()
//!     .unwrap();
//! assert!(sheet.source.is_url());
//! ```

use crate::error::DocRaptorError;
use reqwest::Url;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Name used when the caller does not supply one.
pub const DEFAULT_NAME: &str = "Untitled";

/// Pipeline used when the caller does not select one.
pub const DEFAULT_PIPELINE: u32 = 5;

/// Output format produced by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Pdf,
    Xls,
    Xlsx,
}

impl DocumentType {
    /// Wire name, also usable as a file extension.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Xls => "xls",
            DocumentType::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the service reads the document markup from.
///
/// Exactly one source exists per request; there is no "both" or "neither".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// The service fetches the markup from this URL.
    Url(Url),
    /// The markup is sent inline in the request body.
    Content(String),
}

impl DocumentSource {
    pub fn is_url(&self) -> bool {
        matches!(self, DocumentSource::Url(_))
    }

    /// Short label for logs. Never includes the content itself.
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentSource::Url(_) => "url",
            DocumentSource::Content(_) => "content",
        }
    }
}

/// Options for one document generation call.
///
/// Build with [`GenerationRequest::builder()`], or the shortcuts
/// [`GenerationRequest::from_url`] / [`GenerationRequest::from_content`].
/// Fields are public so callers can tweak a request after construction;
/// the client re-validates the name before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Document markup source.
    pub source: DocumentSource,

    /// Document name shown in the DocRaptor dashboard. Default: "Untitled".
    pub name: String,

    /// Dashboard tag. None falls back to the client's default tag, then "".
    pub tag: Option<String>,

    /// Output format. Default: PDF.
    pub document_type: DocumentType,

    /// Reject invalid HTML (`"html"`) instead of rendering it anyway (`"none"`).
    /// Default: false.
    pub strict: bool,

    /// Execute JavaScript before rendering. PDF only. Default: false.
    pub javascript: bool,

    /// Test document flag. None inherits the client's test mode.
    pub test: Option<bool>,

    /// Flag the document for DocRaptor support. Default: false.
    pub help: bool,

    /// Rendering pipeline on the service side. Default: 5.
    pub pipeline: u32,

    /// Prince engine version (`doc[prince_options][version]`). PDF only.
    pub prince_version: Option<String>,

    /// Extra form fields, merged last. A key that collides with a built-in
    /// field replaces it.
    pub extra: BTreeMap<String, String>,
}

impl GenerationRequest {
    /// Create a new builder for `GenerationRequest`.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// A request with default options for an already-parsed URL.
    pub fn from_url(url: Url) -> Self {
        Self::with_source(DocumentSource::Url(url))
    }

    /// A request with default options for inline markup.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self::with_source(DocumentSource::Content(content.into()))
    }

    fn with_source(source: DocumentSource) -> Self {
        Self {
            source,
            name: DEFAULT_NAME.to_string(),
            tag: None,
            document_type: DocumentType::default(),
            strict: false,
            javascript: false,
            test: None,
            help: false,
            pipeline: DEFAULT_PIPELINE,
            prince_version: None,
            extra: BTreeMap::new(),
        }
    }

    /// Check the invariants that a struct literal or field edit could break.
    pub fn validate(&self) -> Result<(), DocRaptorError> {
        validate_name(&self.name)
    }
}

/// Builder for [`GenerationRequest`].
///
/// If both [`url`](Self::url) and [`content`](Self::content) are set, the URL
/// wins and the content is discarded.
#[derive(Debug, Default)]
pub struct GenerationRequestBuilder {
    url: Option<String>,
    content: Option<String>,
    name: Option<String>,
    tag: Option<String>,
    document_type: DocumentType,
    strict: bool,
    javascript: bool,
    test: Option<bool>,
    help: bool,
    pipeline: Option<u32>,
    prince_version: Option<String>,
    extra: BTreeMap<String, String>,
}

impl GenerationRequestBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn document_type(mut self, t: DocumentType) -> Self {
        self.document_type = t;
        self
    }

    pub fn strict(mut self, v: bool) -> Self {
        self.strict = v;
        self
    }

    pub fn javascript(mut self, v: bool) -> Self {
        self.javascript = v;
        self
    }

    pub fn test(mut self, v: bool) -> Self {
        self.test = Some(v);
        self
    }

    pub fn help(mut self, v: bool) -> Self {
        self.help = v;
        self
    }

    pub fn pipeline(mut self, stage: u32) -> Self {
        self.pipeline = Some(stage);
        self
    }

    pub fn prince_version(mut self, version: impl Into<String>) -> Self {
        self.prince_version = Some(version.into());
        self
    }

    /// Add one passthrough form field, e.g. `("doc[prince_options][media]", "screen")`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build the request, validating constraints.
    pub fn build(self) -> Result<GenerationRequest, DocRaptorError> {
        let source = match (self.url, self.content) {
            (Some(url), _) => DocumentSource::Url(parse_url(&url)?),
            (None, Some(content)) => DocumentSource::Content(content),
            (None, None) => {
                return Err(DocRaptorError::invalid_argument(
                    "source",
                    "either a document URL or inline content is required",
                ))
            }
        };

        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        validate_name(&name)?;

        Ok(GenerationRequest {
            source,
            name,
            tag: self.tag,
            document_type: self.document_type,
            strict: self.strict,
            javascript: self.javascript,
            test: self.test,
            help: self.help,
            pipeline: self.pipeline.unwrap_or(DEFAULT_PIPELINE),
            prince_version: self.prince_version,
            extra: self.extra,
        })
    }
}

/// Parse a document URL, accepting only http and https.
pub(crate) fn parse_url(raw: &str) -> Result<Url, DocRaptorError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DocRaptorError::invalid_argument("url", format!("'{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DocRaptorError::invalid_argument(
            "url",
            format!("'{raw}': scheme must be http or https"),
        ));
    }
    Ok(url)
}

fn validate_name(name: &str) -> Result<(), DocRaptorError> {
    if name.trim().is_empty() {
        return Err(DocRaptorError::invalid_argument(
            "name",
            "must not be empty or blank",
        ));
    }
    Ok(())
}
