//! PDF rendering: hand the assembled document to headless Chromium.
//!
//! The rendering engine is an external collaborator. [`PdfRenderer`] is the
//! narrow capability the rest of the crate depends on; [`ChromiumRenderer`]
//! is the production implementation and [`crate::pipeline::mock`] provides a
//! test double.
//!
//! ## Browser lifecycle
//!
//! Every render launches its own browser with a throw-away profile directory
//! and tears it down afterwards. Teardown is tied to [`BrowserSession`]:
//!
//! - normal completion and errors go through [`BrowserSession::close`];
//! - if the render is cancelled (timeout, client disconnect) the session is
//!   dropped mid-flight. Drop aborts the event-handler task; `Browser`'s own
//!   `Drop` kills the child process and `TempDir` removes the profile.
//!
//! ## Why not wait for `load`?
//!
//! A fragment pulls MathJax from a CDN and documents may reference any
//! number of remote images or fonts. Waiting for the `load` event would make
//! render time depend on the slowest of them. The content is written into
//! the page directly and printing proceeds once the math wait in
//! [`crate::pipeline::typeset`] has finished or expired.

use crate::config::{PageFormat, RenderConfig};
use crate::error::Html2PdfError;
use crate::pipeline::typeset::{typeset_math, ScriptHost, TypesetOutcome};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{PrintToPdfParams, SetDocumentContentParams};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Switches every launch gets, matching what container deployments need.
const BASE_ARGS: [&str; 3] = ["--disable-dev-shm-usage", "--disable-gpu", "--hide-scrollbars"];

/// Boxed future returned by [`PdfRenderer::render`].
pub type RenderFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>, Html2PdfError>> + Send + 'a>>;

/// Something that turns a complete HTML document into PDF bytes.
pub trait PdfRenderer: Send + Sync {
    /// Short name for logs (e.g. "chromium").
    fn name(&self) -> &str;

    /// Render `html`, which must already be a complete document.
    fn render<'a>(&'a self, html: &'a str) -> RenderFuture<'a>;
}

/// Renders through a freshly launched headless Chromium per document.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    config: RenderConfig,
}

impl ChromiumRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Resolve the browser executable without launching it.
    pub fn browser_path(&self) -> Result<PathBuf, Html2PdfError> {
        Ok(chromium_locate::locate_chromium_with(
            self.config.browser_path.as_deref(),
        )?)
    }

    async fn render_document(&self, html: &str) -> Result<Vec<u8>, Html2PdfError> {
        let start = Instant::now();
        let exe = self.browser_path()?;
        let secs = self.config.render_timeout_secs;

        let pdf = match tokio::time::timeout(
            Duration::from_secs(secs),
            self.render_in_session(&exe, html),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(secs, "Render timed out; browser session dropped");
                return Err(Html2PdfError::RenderTimeout { secs });
            }
        };

        info!(
            html_bytes = html.len(),
            pdf_bytes = pdf.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered PDF"
        );
        Ok(pdf)
    }

    async fn render_in_session(&self, exe: &Path, html: &str) -> Result<Vec<u8>, Html2PdfError> {
        let session = BrowserSession::launch(exe, &self.config).await?;
        let result = print_document(&session.browser, html, &self.config).await;
        session.close().await;
        result
    }
}

impl PdfRenderer for ChromiumRenderer {
    fn name(&self) -> &str {
        "chromium"
    }

    fn render<'a>(&'a self, html: &'a str) -> RenderFuture<'a> {
        Box::pin(self.render_document(html))
    }
}

// ── Browser session (scoped acquisition) ─────────────────────────────────

/// A running browser plus everything that must be released with it.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl BrowserSession {
    async fn launch(exe: &Path, config: &RenderConfig) -> Result<Self, Html2PdfError> {
        let profile = TempDir::new()
            .map_err(|e| Html2PdfError::Internal(format!("browser profile dir: {e}")))?;

        let browser_config = browser_config(exe, profile.path(), config)?;
        let (browser, mut handler) =
            Browser::launch(browser_config)
                .await
                .map_err(|e| Html2PdfError::BrowserLaunch {
                    path: exe.to_path_buf(),
                    detail: e.to_string(),
                })?;
        debug!(exe = %exe.display(), "Browser launched");

        // The CDP connection only makes progress while its handler is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler stopped: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    /// Orderly shutdown. Failures are logged, never returned: the render
    /// result has already been decided.
    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser wait failed: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

fn browser_config(
    exe: &Path,
    profile: &Path,
    config: &RenderConfig,
) -> Result<BrowserConfig, Html2PdfError> {
    let mut builder = BrowserConfig::builder()
        .chrome_executable(exe)
        .user_data_dir(profile)
        .request_timeout(Duration::from_secs(config.render_timeout_secs));

    if !config.sandbox {
        builder = builder.no_sandbox();
    }
    for arg in BASE_ARGS {
        builder = builder.arg(arg);
    }
    for arg in &config.extra_args {
        builder = builder.arg(arg.clone());
    }

    builder.build().map_err(Html2PdfError::InvalidConfig)
}

// ── Page work ────────────────────────────────────────────────────────────

async fn print_document(
    browser: &Browser,
    html: &str,
    config: &RenderConfig,
) -> Result<Vec<u8>, Html2PdfError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| Html2PdfError::render("new_page", e))?;

    let frame = page
        .mainframe()
        .await
        .map_err(|e| Html2PdfError::render("set_content", e))?
        .ok_or_else(|| Html2PdfError::render("set_content", "page has no main frame"))?;
    page.execute(SetDocumentContentParams::new(frame, html))
        .await
        .map_err(|e| Html2PdfError::render("set_content", e))?;

    let wait = Duration::from_millis(config.math_timeout_ms);
    if let TypesetOutcome::Typeset { waited_ms } = typeset_math(&PageHost(&page), wait).await? {
        debug!(waited_ms, "Math typeset");
    }

    page.pdf(pdf_params(config))
        .await
        .map_err(|e| Html2PdfError::render("print", e))
}

/// DevTools print parameters: the fixed A4 geometry plus configured flags.
pub fn pdf_params(config: &RenderConfig) -> PrintToPdfParams {
    let p = PageFormat::default();
    PrintToPdfParams {
        print_background: Some(config.print_background),
        paper_width: Some(PageFormat::inches(p.width_mm)),
        paper_height: Some(PageFormat::inches(p.height_mm)),
        margin_top: Some(PageFormat::inches(p.margin_top_mm)),
        margin_right: Some(PageFormat::inches(p.margin_right_mm)),
        margin_bottom: Some(PageFormat::inches(p.margin_bottom_mm)),
        margin_left: Some(PageFormat::inches(p.margin_left_mm)),
        ..Default::default()
    }
}

/// [`ScriptHost`] over a live Chromium page.
struct PageHost<'p>(&'p Page);

impl PageHost<'_> {
    async fn evaluate(&self, expr: &str) -> Result<serde_json::Value, Html2PdfError> {
        let params = EvaluateParams::builder()
            .expression(expr)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| Html2PdfError::render("evaluate", e))?;
        let result = self
            .0
            .evaluate_expression(params)
            .await
            .map_err(|e| Html2PdfError::render("evaluate", e))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }
}

impl ScriptHost for PageHost<'_> {
    fn eval_bool<'a>(
        &'a self,
        expr: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, Html2PdfError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.evaluate(expr).await?.as_bool().unwrap_or(false)) })
    }

    fn eval_await<'a>(
        &'a self,
        expr: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), Html2PdfError>> + Send + 'a>> {
        Box::pin(async move {
            self.evaluate(expr)
                .await
                .map(|_| ())
                .map_err(|e| match e {
                    Html2PdfError::Render { detail, .. } => Html2PdfError::Render {
                        stage: "typeset",
                        detail,
                    },
                    other => other,
                })
        })
    }
}
