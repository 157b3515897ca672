//! Form-field assembly: turn a [`GenerationRequest`] into the
//! `application/x-www-form-urlencoded` fields DocRaptor expects.
//!
//! ## Inclusion rules
//!
//! | Field | When |
//! |-------|------|
//! | type, name, test, tag, strict, pipeline, ignore_console_messages | always |
//! | `document_url` *or* `document_content` | exactly one, per the source |
//! | `help` | only when set, and only ever `"true"` |
//! | `javascript`, `prince_options[version]` | PDF only (version only when set) |
//! | caller extras | last, overriding any key above |
//!
//! Fields are collected in a `BTreeMap`, so keys are unique and the encoded
//! body is deterministic.

use crate::config::ClientConfig;
use crate::request::{DocumentSource, DocumentType, GenerationRequest};
use std::collections::BTreeMap;

pub const DOCUMENT_TYPE: &str = "doc[document_type]";
pub const NAME: &str = "doc[name]";
pub const TEST: &str = "doc[test]";
pub const TAG: &str = "doc[tag]";
pub const STRICT: &str = "doc[strict]";
pub const PIPELINE: &str = "doc[pipeline]";
pub const IGNORE_CONSOLE_MESSAGES: &str = "doc[ignore_console_messages]";
pub const DOCUMENT_URL: &str = "doc[document_url]";
pub const DOCUMENT_CONTENT: &str = "doc[document_content]";
pub const HELP: &str = "doc[help]";
pub const JAVASCRIPT: &str = "doc[javascript]";
pub const PRINCE_VERSION: &str = "doc[prince_options][version]";

/// Query parameter carrying the API key.
pub const CREDENTIALS_PARAM: &str = "user_credentials";

/// Strict-mode vocabulary understood by the service.
pub fn strict_mode(strict: bool) -> &'static str {
    if strict {
        "html"
    } else {
        "none"
    }
}

fn flag(v: bool) -> String {
    v.to_string()
}

/// Assemble the form fields for `request`, filling inherited values from `config`.
pub fn build_form(request: &GenerationRequest, config: &ClientConfig) -> BTreeMap<String, String> {
    let mut form = BTreeMap::new();

    let test = request.test.unwrap_or(config.test_mode);
    let tag = request
        .tag
        .as_deref()
        .or(config.default_tag.as_deref())
        .unwrap_or("");

    form.insert(DOCUMENT_TYPE.into(), request.document_type.as_str().into());
    form.insert(NAME.into(), request.name.clone());
    form.insert(TEST.into(), flag(test));
    form.insert(TAG.into(), tag.into());
    form.insert(STRICT.into(), strict_mode(request.strict).into());
    form.insert(PIPELINE.into(), request.pipeline.to_string());
    form.insert(IGNORE_CONSOLE_MESSAGES.into(), flag(true));

    match &request.source {
        DocumentSource::Url(url) => form.insert(DOCUMENT_URL.into(), url.to_string()),
        DocumentSource::Content(html) => form.insert(DOCUMENT_CONTENT.into(), html.clone()),
    };

    if request.help {
        form.insert(HELP.into(), flag(true));
    }

    if request.document_type == DocumentType::Pdf {
        form.insert(JAVASCRIPT.into(), flag(request.javascript));
        if let Some(ref version) = request.prince_version {
            form.insert(PRINCE_VERSION.into(), version.clone());
        }
    }

    for (key, value) in &request.extra {
        form.insert(key.clone(), value.clone());
    }

    form
}
