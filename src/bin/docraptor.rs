//! CLI binary for docraptor.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ClientConfig` / `GenerationRequest` and saves the result.

use anyhow::{Context, Result};
use clap::Parser;
use docraptor::{ClientConfig, DocRaptorClient, DocumentResponse, DocumentType, GenerationRequest};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a local HTML file as a test PDF
  docraptor --test invoice.html -o invoice.pdf

  # Render a public page
  docraptor https://example.com/report.html --name report

  # Excel output with strict HTML validation
  docraptor --type xlsx --strict table.html

  # Pass an option the client does not model
  docraptor page.html --param 'doc[prince_options][media]=screen'

  # Machine-readable summary
  docraptor --json page.html

ENVIRONMENT VARIABLES:
  DOCRAPTOR_API_KEY    API key (required)
  DOCRAPTOR_TEST       Mark documents as test documents (not billed)
  DOCRAPTOR_TAG        Default tag for every document
  DOCRAPTOR_INSECURE   Use http instead of https
  DOCRAPTOR_ENDPOINT   Full endpoint override
  DOCRAPTOR_TIMEOUT    Request timeout in seconds
  RUST_LOG             Log filter (overrides -v / -q)
"#;

/// Generate PDF and Excel documents from HTML with DocRaptor.
#[derive(Parser, Debug)]
#[command(
    name = "docraptor",
    version,
    about = "Generate PDF and Excel documents from HTML with DocRaptor",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTTP/HTTPS URL of the page, or a local HTML file sent inline.
    input: String,

    /// Write the document to this file. Default: <name>.<type>.
    #[arg(short, long, env = "DOCRAPTOR_OUTPUT")]
    output: Option<PathBuf>,

    /// DocRaptor API key.
    #[arg(long, env = "DOCRAPTOR_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Document name shown in the DocRaptor dashboard.
    #[arg(long, default_value = "Untitled")]
    name: String,

    /// Output format.
    #[arg(long = "type", value_enum, default_value = "pdf")]
    document_type: TypeArg,

    /// Dashboard tag.
    #[arg(long, env = "DOCRAPTOR_TAG")]
    tag: Option<String>,

    /// Create a test document (watermarked, not billed).
    #[arg(long, env = "DOCRAPTOR_TEST")]
    test: bool,

    /// Fail on invalid HTML instead of rendering it anyway.
    #[arg(long)]
    strict: bool,

    /// Run JavaScript before rendering (PDF only).
    #[arg(long)]
    javascript: bool,

    /// Flag the document for DocRaptor support.
    #[arg(long = "request-help")]
    request_help: bool,

    /// Rendering pipeline on the service side.
    #[arg(long, default_value_t = 5)]
    pipeline: u32,

    /// Prince engine version (PDF only).
    #[arg(long)]
    prince_version: Option<String>,

    /// Extra form field as KEY=VALUE. Repeatable; overrides built-in fields.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Use http instead of https.
    #[arg(long, env = "DOCRAPTOR_INSECURE")]
    insecure: bool,

    /// Post to this endpoint instead of docraptor.com.
    #[arg(long, env = "DOCRAPTOR_ENDPOINT")]
    endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "DOCRAPTOR_TIMEOUT")]
    timeout: Option<u64>,

    /// Print a JSON summary instead of human-readable output.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TypeArg {
    Pdf,
    Xls,
    Xlsx,
}

impl From<TypeArg> for DocumentType {
    fn from(v: TypeArg) -> Self {
        match v {
            TypeArg::Pdf => DocumentType::Pdf,
            TypeArg::Xls => DocumentType::Xls,
            TypeArg::Xlsx => DocumentType::Xlsx,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters, so INFO logs are
    // only shown when it is off.
    let show_spinner = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client & request ───────────────────────────────────────────
    let client = DocRaptorClient::new(build_config(&cli)?).context("Failed to create client")?;
    let request = build_request(&cli).await?;
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&request.name, request.document_type));

    // ── Generate ─────────────────────────────────────────────────────────
    let spinner = show_spinner.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Generating");
        bar.set_message(format!("{} '{}'", request.document_type, request.name));
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let start = Instant::now();
    let result = client.generate_document(&request).await;
    if let Some(ref bar) = spinner {
        bar.finish_and_clear();
    }
    let response = result.context("Document generation failed")?;
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    // ── Report ───────────────────────────────────────────────────────────
    if response.success() {
        response
            .save_as(&output_path)
            .await
            .context("Failed to save document")?;
    }

    if cli.json {
        let summary = summarise(&response, &output_path, elapsed_ms);
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if response.success() {
        if !cli.quiet {
            let pages = match response.number_of_pages() {
                0 => String::new(),
                n => format!("  {n} pages"),
            };
            eprintln!(
                "{}  {}  {}{}  {}ms",
                green("✔"),
                bold(&output_path.display().to_string()),
                dim(&format!("{} bytes", response.bytes().len())),
                pages,
                elapsed_ms,
            );
        }
    } else {
        eprintln!(
            "{} DocRaptor returned HTTP {} {}",
            red("✘"),
            response.status().as_u16(),
            response.reason_phrase()
        );
        eprintln!("{}", response.text());
    }

    Ok(if response.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder(cli.api_key.clone())
        .use_ssl(!cli.insecure)
        .test_mode(cli.test);

    if let Some(ref tag) = cli.tag {
        builder = builder.default_tag(tag.clone());
    }
    if let Some(ref endpoint) = cli.endpoint {
        let url = reqwest::Url::parse(endpoint)
            .with_context(|| format!("Invalid endpoint URL '{endpoint}'"))?;
        builder = builder.endpoint(url);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}

/// Map CLI args to `GenerationRequest`, reading local input files.
async fn build_request(cli: &Cli) -> Result<GenerationRequest> {
    let mut builder = GenerationRequest::builder()
        .name(cli.name.clone())
        .document_type(cli.document_type.into())
        .strict(cli.strict)
        .javascript(cli.javascript)
        .help(cli.request_help)
        .pipeline(cli.pipeline);

    builder = if is_url(&cli.input) {
        builder.url(cli.input.clone())
    } else {
        let html = tokio::fs::read_to_string(&cli.input)
            .await
            .with_context(|| format!("Failed to read input file {:?}", cli.input))?;
        builder.content(html)
    };

    if let Some(ref version) = cli.prince_version {
        builder = builder.prince_version(version.clone());
    }
    for (key, value) in &cli.params {
        builder = builder.param(key.clone(), value.clone());
    }

    builder.build().context("Invalid request")
}

/// `<name>.<type>` in the working directory, or `document.<type>` when the
/// name is not a plain file name.
fn default_output_path(name: &str, document_type: DocumentType) -> PathBuf {
    let plain = !name.contains(['/', '\\', '\0'])
        && !matches!(name, "" | "." | "..")
        && Path::new(name).is_relative();
    let stem = if plain { name } else { "document" };
    PathBuf::from(format!("{stem}.{document_type}"))
}

/// Check if the input string looks like a URL.
fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Parse `--param KEY=VALUE`.
fn parse_param(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

fn summarise(response: &DocumentResponse, output: &Path, elapsed_ms: u64) -> serde_json::Value {
    let mut summary = serde_json::json!({
        "success": response.success(),
        "status": response.status().as_u16(),
        "reason": response.reason_phrase(),
        "number_of_pages": response.number_of_pages(),
        "bytes": response.bytes().len(),
        "duration_ms": elapsed_ms,
    });
    if response.success() {
        summary["output"] = serde_json::Value::String(output.display().to_string());
    } else {
        summary["error"] = serde_json::Value::String(response.text().into_owned());
    }
    summary
}
