//! Client-wide configuration.
//!
//! [`ClientConfig`] holds the settings that stay fixed for the lifetime of a
//! [`crate::client::DocRaptorClient`]: the API credential, which endpoint to
//! talk to, and the defaults every request inherits (tag, test mode).
//! Per-call options live in [`crate::request::GenerationRequest`] instead.
//!
//! # Design choice: builder over constructor
//! Only the API key is required. The builder lets callers set the handful of
//! optional knobs they care about and rely on documented defaults for the rest.

use crate::error::DocRaptorError;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Host and path of the DocRaptor document endpoint. Only the scheme varies.
pub const DOCRAPTOR_HOST_PATH: &str = "docraptor.com/docs";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("docraptor-rs/", env!("CARGO_PKG_VERSION"));

/// Configuration for a [`crate::client::DocRaptorClient`].
///
/// # Example
/// ```rust
/// use docraptor::ClientConfig;
///
/// let config = ClientConfig::builder("YOUR_API_KEY")
///     .test_mode(true)
///     .default_tag("invoices")
///     .build()
///     .unwrap();
/// assert_eq!(config.endpoint(), "https://docraptor.com/docs");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// API credential, sent as the `user_credentials` query parameter.
    pub api_key: String,

    /// Use `https` for the default endpoint. Default: true.
    pub use_ssl: bool,

    /// Tag attached to every request that does not set its own.
    pub default_tag: Option<String>,

    /// Mark every request as a test document unless the request overrides it.
    /// Default: false.
    ///
    /// Test documents are watermarked and not billed by the service.
    pub test_mode: bool,

    /// Full endpoint override. When set, `use_ssl` is ignored.
    pub endpoint_override: Option<Url>,

    /// Overall transport timeout in seconds. Default: None (no deadline).
    pub timeout_secs: Option<u64>,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("use_ssl", &self.use_ssl)
            .field("default_tag", &self.default_tag)
            .field("test_mode", &self.test_mode)
            .field("endpoint_override", &self.endpoint_override)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig {
                api_key: api_key.into(),
                use_ssl: true,
                default_tag: None,
                test_mode: false,
                endpoint_override: None,
                timeout_secs: None,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
        }
    }

    /// The URL requests are posted to, without the credential query.
    pub fn endpoint(&self) -> String {
        if let Some(ref url) = self.endpoint_override {
            return url.to_string();
        }
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{DOCRAPTOR_HOST_PATH}")
    }

    /// Transport timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn use_ssl(mut self, v: bool) -> Self {
        self.config.use_ssl = v;
        self
    }

    pub fn default_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.default_tag = Some(tag.into());
        self
    }

    pub fn test_mode(mut self, v: bool) -> Self {
        self.config.test_mode = v;
        self
    }

    /// Post to `url` instead of the DocRaptor endpoint (staging, proxies, mocks).
    pub fn endpoint(mut self, url: Url) -> Self {
        self.config.endpoint_override = Some(url);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, DocRaptorError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(DocRaptorError::InvalidConfig(
                "API key must not be empty".into(),
            ));
        }
        if c.timeout_secs == Some(0) {
            return Err(DocRaptorError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref url) = c.endpoint_override {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(DocRaptorError::InvalidConfig(format!(
                    "Endpoint must be http or https, got '{}'",
                    url.scheme()
                )));
            }
        }
        Ok(self.config)
    }
}
