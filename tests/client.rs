//! Integration tests for the DocRaptor client against a local mock server.
//!
//! Every test spins up a `wiremock` server, points the client at it via
//! `ClientConfig::builder(..).endpoint(..)`, and inspects the request that
//! actually went over the wire.
//!
//! Run with:
//!   cargo test --test client

use docraptor::{
    ClientConfig, DocRaptorClient, DocRaptorError, DocumentType, GenerationRequest,
};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

// ── Test helpers ─────────────────────────────────────────────────────────────

fn client_for(server: &MockServer, test_mode: bool) -> DocRaptorClient {
    let endpoint = reqwest::Url::parse(&format!("{}/docs", server.uri())).unwrap();
    let config = ClientConfig::builder(API_KEY)
        .endpoint(endpoint)
        .test_mode(test_mode)
        .build()
        .unwrap();
    DocRaptorClient::new(config).unwrap()
}

async fn mount_ok(server: &MockServer, body: &[u8], pages: Option<&str>) {
    let mut template = ResponseTemplate::new(200).set_body_bytes(body.to_vec());
    if let Some(p) = pages {
        template = template.insert_header("X-DocRaptor-Num-Pages", p);
    }
    Mock::given(method("POST"))
        .and(path("/docs"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Decode the form body of the single request the server received.
async fn sent_form(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect()
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_from_content_sends_default_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/docs"))
        .and(query_param("user_credentials", API_KEY))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, true);
    let html = "<html><head><title></title></head><body><h1>Yeah</h1></body></html>";
    let response = client.generate_pdf_from_content(html).await.unwrap();
    assert!(response.success());

    let form = sent_form(&server).await;
    assert_eq!(form["doc[document_type]"], "pdf");
    assert_eq!(form["doc[document_content]"], html);
    assert_eq!(form["doc[name]"], "Untitled");
    assert_eq!(form["doc[strict]"], "none");
    assert_eq!(form["doc[javascript]"], "false");
    assert_eq!(form["doc[test]"], "true");
    assert_eq!(form["doc[tag]"], "");
    assert_eq!(form["doc[pipeline]"], "5");
    assert_eq!(form["doc[ignore_console_messages]"], "true");
    assert!(!form.contains_key("doc[help]"));
    assert!(!form.contains_key("doc[document_url]"));
}

#[tokio::test]
async fn pdf_from_url_sends_url() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", None).await;
    let client = client_for(&server, false);

    client
        .generate_pdf_from_url("https://html.spec.whatwg.org/multipage/")
        .await
        .unwrap();

    let form = sent_form(&server).await;
    assert_eq!(
        form["doc[document_url]"],
        "https://html.spec.whatwg.org/multipage/"
    );
    assert!(!form.contains_key("doc[document_content]"));
    assert_eq!(form["doc[test]"], "false");
}

#[tokio::test]
async fn url_wins_when_both_sources_given() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", None).await;
    let client = client_for(&server, false);

    let request = GenerationRequest::builder()
        .content("<p>inline</p>")
        .url("https://example.com/page.html")
        .build()
        .unwrap();
    client.generate_document(&request).await.unwrap();

    let form = sent_form(&server).await;
    assert_eq!(form["doc[document_url]"], "https://example.com/page.html");
    assert!(!form.contains_key("doc[document_content]"));
}

#[tokio::test]
async fn xlsx_request_omits_javascript_and_sends_options() {
    let server = MockServer::start().await;
    mount_ok(&server, b"PK\x03\x04", None).await;
    let client = client_for(&server, false);

    let request = GenerationRequest::builder()
        .content("<table><tr><td>1</td></tr></table>")
        .document_type(DocumentType::Xlsx)
        .name("Quarterly & annual")
        .tag("finance")
        .strict(true)
        .javascript(true)
        .help(true)
        .test(true)
        .pipeline(7)
        .param("doc[custom]", "a=b&c")
        .build()
        .unwrap();
    client.generate_document(&request).await.unwrap();

    let form = sent_form(&server).await;
    assert_eq!(form["doc[document_type]"], "xlsx");
    assert_eq!(form["doc[name]"], "Quarterly & annual");
    assert_eq!(form["doc[tag]"], "finance");
    assert_eq!(form["doc[strict]"], "html");
    assert_eq!(form["doc[help]"], "true");
    assert_eq!(form["doc[test]"], "true");
    assert_eq!(form["doc[pipeline]"], "7");
    assert_eq!(form["doc[custom]"], "a=b&c");
    assert!(!form.contains_key("doc[javascript]"));
}

#[tokio::test]
async fn extra_params_override_builtin_fields() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", None).await;
    let client = client_for(&server, false);

    let request = GenerationRequest::builder()
        .content("x")
        .param("doc[pipeline]", "9")
        .build()
        .unwrap();
    client.generate_document(&request).await.unwrap();

    assert_eq!(sent_form(&server).await["doc[pipeline]"], "9");
}

#[tokio::test]
async fn default_tag_comes_from_config() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", None).await;
    let endpoint = reqwest::Url::parse(&format!("{}/docs", server.uri())).unwrap();
    let config = ClientConfig::builder(API_KEY)
        .endpoint(endpoint)
        .default_tag("batch-7")
        .build()
        .unwrap();
    let client = DocRaptorClient::new(config).unwrap();

    client.generate_pdf_from_content("x").await.unwrap();
    assert_eq!(sent_form(&server).await["doc[tag]"], "batch-7");
}

// ── Fail-fast validation ─────────────────────────────────────────────────────

#[tokio::test]
async fn blank_name_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client_for(&server, false);

    let mut request = GenerationRequest::from_content("x");
    request.name = String::new();
    let err = client.generate_document(&request).await.unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_url_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for(&server, false);

    let err = client.generate_pdf_from_url("not a url").await.unwrap_err();
    assert!(matches!(err, DocRaptorError::InvalidArgument { field: "url", .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test]
fn missing_source_is_invalid_argument() {
    let err = GenerationRequest::builder().name("doc").build().unwrap_err();
    assert!(matches!(
        err,
        DocRaptorError::InvalidArgument { field: "source", .. }
    ));
}

// ── Response interpretation ──────────────────────────────────────────────────

#[tokio::test]
async fn page_count_header_is_parsed() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", Some("7")).await;
    let client = client_for(&server, false);

    let response = client.generate_pdf_from_content("x").await.unwrap();
    assert_eq!(response.number_of_pages(), 7);
}

#[tokio::test]
async fn missing_page_count_is_zero() {
    let server = MockServer::start().await;
    mount_ok(&server, b"PK", None).await;
    let client = client_for(&server, false);

    let response = client.generate_pdf_from_content("x").await.unwrap();
    assert_eq!(response.number_of_pages(), 0);
}

#[tokio::test]
async fn malformed_page_count_is_an_error() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", Some("many")).await;
    let client = client_for(&server, false);

    let err = client.generate_pdf_from_content("x").await.unwrap_err();
    assert!(matches!(err, DocRaptorError::MalformedPageCount { ref value } if value == "many"));
}

#[tokio::test]
async fn rejection_is_data_not_error() {
    let error_body = "<errors><error>Bad</error></errors>";
    for (code, expected) in [(200u16, true), (204, true), (400, false), (422, false), (503, false)] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(code).set_body_string(error_body))
            .mount(&server)
            .await;
        let client = client_for(&server, false);

        let response = client.generate_pdf_from_content("x").await.unwrap();
        assert_eq!(response.success(), expected, "status {code}");
        assert_eq!(response.status().as_u16(), code);
        if !expected {
            assert_eq!(response.text(), error_body);
            assert!(!response.reason_phrase().is_empty());
        }
    }
}

/// Serve one canned HTTP/1.1 response on a raw socket, so the status line
/// can carry a reason phrase of our choosing.
async fn serve_raw_once(status_line: &'static str, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the request (headers, then Content-Length bytes of form body).
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        let response = format!(
            "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/docs")
}

#[tokio::test]
async fn server_reason_phrase_is_passed_through() {
    let endpoint = serve_raw_once("HTTP/1.1 422 Document Invalid", "<error>bad</error>").await;
    let config = ClientConfig::builder(API_KEY)
        .endpoint(reqwest::Url::parse(&endpoint).unwrap())
        .build()
        .unwrap();
    let client = DocRaptorClient::new(config).unwrap();

    let response = client.generate_pdf_from_content("x").await.unwrap();
    assert!(!response.success());
    assert_eq!(response.status().as_u16(), 422);
    assert_eq!(response.reason_phrase(), "Document Invalid");
    assert_eq!(response.text(), "<error>bad</error>");
}

// ── Transport failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let endpoint = reqwest::Url::parse(&format!("http://127.0.0.1:{port}/docs")).unwrap();
    let config = ClientConfig::builder("secret-key-123")
        .endpoint(endpoint)
        .build()
        .unwrap();
    let client = DocRaptorClient::new(config).unwrap();

    let err = client.generate_pdf_from_content("x").await.unwrap_err();
    assert!(err.is_transport(), "got: {err:?}");
    assert!(
        !err.to_string().contains("secret-key-123"),
        "credential leaked: {err}"
    );
}

#[tokio::test]
async fn slow_response_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let endpoint = reqwest::Url::parse(&format!("{}/docs", server.uri())).unwrap();
    let config = ClientConfig::builder(API_KEY)
        .endpoint(endpoint)
        .timeout_secs(1)
        .build()
        .unwrap();
    let client = DocRaptorClient::new(config).unwrap();

    let err = client.generate_pdf_from_content("x").await.unwrap_err();
    assert!(
        matches!(err, DocRaptorError::Timeout { secs: Some(1), .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn injected_transport_timeout_has_unknown_duration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let endpoint = reqwest::Url::parse(&format!("{}/docs", server.uri())).unwrap();
    let config = ClientConfig::builder(API_KEY)
        .endpoint(endpoint)
        .build()
        .unwrap();
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let client = DocRaptorClient::with_http_client(config, http);

    let err = client.generate_pdf_from_content("x").await.unwrap_err();
    assert!(
        matches!(err, DocRaptorError::Timeout { secs: None, .. }),
        "got: {err:?}"
    );
    assert!(!err.to_string().contains("after"), "got: {err}");
}

// ── Concurrency & persistence ────────────────────────────────────────────────

#[tokio::test]
async fn one_client_serves_concurrent_calls() {
    let server = MockServer::start().await;
    mount_ok(&server, b"%PDF", Some("1")).await;
    let client = client_for(&server, false);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let request = GenerationRequest::builder()
                    .content(format!("<p>{i}</p>"))
                    .name(format!("doc-{i}"))
                    .build()
                    .unwrap();
                client.generate_document(&request).await
            })
        })
        .collect();

    for h in handles {
        assert!(h.await.unwrap().unwrap().success());
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 8);
}

#[tokio::test]
async fn saved_payload_matches_response_body() {
    let server = MockServer::start().await;
    let body = b"%PDF-1.7\n\x00\x01\x02binary\xff".to_vec();
    mount_ok(&server, &body, Some("2")).await;
    let client = client_for(&server, true);

    let response = client.generate_pdf_from_content("<h1>x</h1>").await.unwrap();
    assert!(response.success());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("doc.pdf");
    response.save_as(&out).await.unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), body);
}

#[test]
fn sync_wrapper_works_outside_runtime() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_ok(&server, b"%PDF", Some("3")).await;
        server
    });
    let client = client_for(&server, false);

    let response = client
        .generate_document_sync(&GenerationRequest::from_content("x"))
        .unwrap();
    assert!(response.success());
    assert_eq!(response.number_of_pages(), 3);
}
