//! # docraptor
//!
//! Async client for the [DocRaptor](https://docraptor.com) HTML-to-PDF / XLS
//! web service.
//!
//! The crate is deliberately thin: it turns a [`GenerationRequest`] into one
//! form-encoded POST and hands back the response as a [`DocumentResponse`].
//! Rendering happens on DocRaptor's side; pooling and TLS are `reqwest`'s job.
//!
//! ## Request Flow
//!
//! ```text
//! GenerationRequest
//!  │
//!  ├─ 1. Validate  exactly one source (URL or inline HTML), non-blank name
//!  ├─ 2. Form      doc[...] fields, inherited tag / test mode, extras last
//!  ├─ 3. POST      {endpoint}?user_credentials=KEY, x-www-form-urlencoded
//!  └─ 4. Wrap      status, reason, X-DocRaptor-Num-Pages, body bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docraptor::{ClientConfig, DocRaptorClient, DocumentType, GenerationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder(std::env::var("DOCRAPTOR_API_KEY")?)
//!         .test_mode(true)
//!         .build()?;
//!     let client = DocRaptorClient::new(config)?;
//!
//!     let request = GenerationRequest::builder()
//!         .url("https://example.com/invoice/42")
//!         .name("invoice-42")
//!         .document_type(DocumentType::Pdf)
//!         .javascript(true)
//!         .build()?;
//!
//!     let response = client.generate_document(&request).await?;
//!     if response.success() {
//!         response.save_as("invoice-42.pdf").await?;
//!     } else {
//!         eprintln!("{}: {}", response.reason_phrase(), response.text());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors vs. rejections
//!
//! `Err(DocRaptorError)` means the call could not be made or completed:
//! bad arguments, network failure, or a malformed page-count header.
//! A 4xx/5xx from DocRaptor is returned as `Ok(response)` with
//! `response.success() == false`, so the service's error body stays readable.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docraptor` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docraptor = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod request;
pub mod response;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::DocRaptorClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::DocRaptorError;
pub use request::{DocumentSource, DocumentType, GenerationRequest, GenerationRequestBuilder};
pub use response::DocumentResponse;
