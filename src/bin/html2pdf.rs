//! CLI binary for html2pdf.
//!
//! A thin shim over the library crate: `serve` runs the HTTP service,
//! `convert` renders one file, `prepare` prints the assembled HTML.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use html2pdf::server::{self, AppState};
use html2pdf::{
    convert_to_file, prepare_document, ChromiumRenderer, RenderConfig, ServerConfig,
};
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Run the HTTP service on $PORT (default 8080)
  html2pdf
  html2pdf serve --port 9000

  # Convert a file
  html2pdf convert informe.html -o informe.pdf

  # Convert from stdin
  cat informe.html | html2pdf convert - -o informe.pdf

  # Show the document that would be rendered
  html2pdf prepare informe.html

HTTP API:
  GET  /          {"ok": true, "service": "html2pdf", "endpoint": "/convert", ...}
  POST /convert   {"html": "<p>...</p>", "filename": "informe"} → application/pdf
  POST /html2pdf  alias of /convert

  Write [NUEVA PÁGINA] anywhere in the HTML to force a page break.

ENVIRONMENT VARIABLES:
  PORT                     Listen port for `serve`
  HTML2PDF_HOST            Listen address for `serve`
  CHROME_PATH              Chromium/Chrome executable
  HTML2PDF_CHROME_PATH     Same, takes precedence over CHROME_PATH
  PLAYWRIGHT_BROWSERS_PATH Playwright browser cache to search
  RUST_LOG                 Log filter (overrides --verbose/--quiet)

  A .env file in the working directory is read at startup.
"#;

/// Convert HTML to PDF with headless Chromium.
#[derive(Parser, Debug)]
#[command(
    name = "html2pdf",
    version,
    about = "Convert HTML to PDF with headless Chromium",
    long_about = "Convert HTML documents and fragments to PDF. Fragments are wrapped in an \
A4 print template with MathJax; [NUEVA PÁGINA] markers become page breaks. Runs as an HTTP \
service or converts single files.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "HTML2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "HTML2PDF_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default).
    Serve(ServeArgs),
    /// Convert one HTML file to PDF.
    Convert(ConvertArgs),
    /// Print the assembled HTML without rendering.
    Prepare(PrepareArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "HTML2PDF_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Largest accepted request body, in MiB.
    #[arg(long, env = "HTML2PDF_BODY_LIMIT_MB", default_value_t = 25)]
    body_limit_mb: usize,

    /// Download name used when a request has no `filename`.
    #[arg(long, env = "HTML2PDF_DEFAULT_FILENAME", default_value = "documento")]
    default_filename: String,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// HTML file to convert, or `-` for stdin.
    input: String,

    /// Output PDF path. Default: input name with `.pdf`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print conversion stats as JSON on stdout.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct PrepareArgs {
    /// HTML file to assemble, or `-` for stdin.
    input: String,

    /// Skeleton language attribute for fragments.
    #[arg(long, env = "HTML2PDF_LANG", default_value = "es")]
    lang: String,
}

/// Rendering flags shared by `serve` and `convert`.
#[derive(Args, Debug)]
struct RenderArgs {
    /// Chromium/Chrome executable. Searched for when unset.
    #[arg(long, env = "HTML2PDF_CHROME_PATH")]
    chrome: Option<PathBuf>,

    /// Keep the Chromium sandbox enabled (needs a suitable host).
    #[arg(long, env = "HTML2PDF_SANDBOX")]
    sandbox: bool,

    /// Extra Chromium switch; repeatable.
    #[arg(long = "chrome-arg", value_name = "ARG", allow_hyphen_values = true)]
    chrome_args: Vec<String>,

    /// How long to wait for MathJax, in milliseconds.
    #[arg(long, env = "HTML2PDF_MATH_TIMEOUT_MS", default_value_t = 4000)]
    math_timeout_ms: u64,

    /// Upper bound on one render, in seconds.
    #[arg(long, env = "HTML2PDF_RENDER_TIMEOUT", default_value_t = 60)]
    render_timeout: u64,

    /// Skeleton language attribute for fragments.
    #[arg(long, env = "HTML2PDF_LANG", default_value = "es")]
    lang: String,

    /// MathJax script URL referenced by wrapped fragments.
    #[arg(long, env = "HTML2PDF_MATHJAX_URL")]
    mathjax_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        None => run_serve(ServeArgs::from_env()?).await,
        Some(Command::Serve(args)) => run_serve(args).await,
        Some(Command::Convert(args)) => run_convert(args, cli.quiet).await,
        Some(Command::Prepare(args)) => run_prepare(args).await,
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = build_render_config(&args.render)?;
    let server_config = ServerConfig {
        host: args.host,
        port: args.port,
        body_limit: body_limit_bytes(args.body_limit_mb)?,
        default_filename: args.default_filename,
    };

    let renderer = ChromiumRenderer::new(config.clone());
    // Report a missing browser at startup rather than on the first request.
    match renderer.browser_path() {
        Ok(path) => tracing::info!(browser = %path.display(), "Using browser"),
        Err(e) => tracing::warn!("{}; requests will fail with 503 until one is installed", e),
    }

    let state = Arc::new(AppState::new(Arc::new(renderer), config.document, server_config));
    server::serve(state).await.context("HTTP server failed")
}

async fn run_convert(args: ConvertArgs, quiet: bool) -> Result<()> {
    let config = build_render_config(&args.render)?;
    let output = match args.output {
        Some(path) => path,
        None if args.input == "-" => PathBuf::from("documento.pdf"),
        None => PathBuf::from(&args.input).with_extension("pdf"),
    };

    let renderer = ChromiumRenderer::new(config.clone());
    let stats = convert_to_file(&args.input, &output, &renderer, &config.document)
        .await
        .with_context(|| format!("Failed to convert {}", args.input))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !quiet {
        eprintln!(
            "✔ {} → {}  ({} bytes, {} page breaks, {}ms)",
            args.input,
            output.display(),
            stats.pdf_bytes,
            stats.page_breaks,
            stats.duration_ms
        );
    }
    Ok(())
}

async fn run_prepare(args: PrepareArgs) -> Result<()> {
    let raw = html2pdf::convert::read_input(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input))?;
    let options = RenderConfig::builder()
        .lang(args.lang)
        .build()
        .context("Invalid options")?
        .document;
    let html = prepare_document(&raw, &options).context("Failed to assemble document")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(html.as_bytes())
        .context("Failed to write to stdout")?;
    handle.write_all(b"\n").ok();
    Ok(())
}

impl ServeArgs {
    /// `serve` defaults, with the environment applied, for a bare `html2pdf`.
    fn from_env() -> Result<Self> {
        let cli = ServeCli::try_parse_from(["html2pdf"]).context("Invalid environment")?;
        Ok(cli.args)
    }
}

/// Parses only [`ServeArgs`] so a bare invocation still honours `PORT` etc.
#[derive(Parser, Debug)]
struct ServeCli {
    #[command(flatten)]
    args: ServeArgs,
}

/// MiB from the command line to the byte count the router enforces.
fn body_limit_bytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024)
        .with_context(|| format!("Body limit of {mb} MiB is too large"))
}

/// Map CLI args to `RenderConfig`.
fn build_render_config(args: &RenderArgs) -> Result<RenderConfig> {
    let mut builder = RenderConfig::builder()
        .sandbox(args.sandbox)
        .math_timeout_ms(args.math_timeout_ms)
        .render_timeout_secs(args.render_timeout)
        .lang(&args.lang);

    if let Some(ref path) = args.chrome {
        builder = builder.browser_path(path);
    }
    if let Some(ref url) = args.mathjax_url {
        builder = builder.math_script_url(url);
    }
    for arg in &args.chrome_args {
        builder = builder.arg(arg);
    }

    builder.build().context("Invalid render configuration")
}
