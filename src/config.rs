//! Configuration types for HTML-to-PDF conversion.
//!
//! Rendering behaviour is controlled through [`RenderConfig`], built via its
//! [`RenderConfigBuilder`]. The HTTP service adds [`ServerConfig`] on top.
//!
//! Page geometry is not configurable. The baseline print CSS injected into
//! every document fixes A4 with 18 mm margins, and Chromium lets a CSS
//! `@page` rule override the print call's margins, so [`PageFormat::default`]
//! carries the same values and is the only geometry handed to the browser.

use crate::error::Html2PdfError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// MathJax 3 bundle referenced by wrapped fragments.
pub const DEFAULT_MATH_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

/// Download name used when a request omits `filename`.
pub const DEFAULT_FILENAME: &str = "documento";

/// Configuration for rendering one document.
///
/// Built via [`RenderConfig::builder()`] or using [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use html2pdf::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .math_timeout_ms(2000)
///     .render_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Chromium/Chrome executable. If None, located via `chromium-locate`.
    pub browser_path: Option<PathBuf>,

    /// Run Chromium with its sandbox enabled. Default: false.
    ///
    /// Containers rarely grant the namespaces the sandbox needs, so the
    /// browser is launched with `--no-sandbox` unless this is set.
    pub sandbox: bool,

    /// Extra command-line switches appended to the browser launch.
    pub extra_args: Vec<String>,

    /// How long to wait for MathJax to appear in the page. Default: 4000.
    ///
    /// Expiry is not an error: the document is printed without typesetting.
    pub math_timeout_ms: u64,

    /// Upper bound on one whole render, launch to teardown. Default: 60.
    pub render_timeout_secs: u64,

    /// Print CSS backgrounds. Default: true.
    pub print_background: bool,

    /// Skeleton settings used when wrapping HTML fragments.
    pub document: DocumentOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            browser_path: None,
            sandbox: false,
            extra_args: Vec::new(),
            math_timeout_ms: 4000,
            render_timeout_secs: 60,
            print_background: true,
            document: DocumentOptions::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn browser_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.browser_path = Some(path.into());
        self
    }

    pub fn sandbox(mut self, v: bool) -> Self {
        self.config.sandbox = v;
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    pub fn math_timeout_ms(mut self, ms: u64) -> Self {
        self.config.math_timeout_ms = ms;
        self
    }

    pub fn render_timeout_secs(mut self, secs: u64) -> Self {
        self.config.render_timeout_secs = secs;
        self
    }

    pub fn print_background(mut self, v: bool) -> Self {
        self.config.print_background = v;
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.config.document.lang = lang.into();
        self
    }

    pub fn math_script_url(mut self, url: impl Into<String>) -> Self {
        self.config.document.math_script_url = url.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, Html2PdfError> {
        let c = &self.config;
        if c.render_timeout_secs == 0 {
            return Err(Html2PdfError::InvalidConfig(
                "Render timeout must be ≥ 1 second".into(),
            ));
        }
        if c.math_timeout_ms / 1000 >= c.render_timeout_secs {
            return Err(Html2PdfError::InvalidConfig(format!(
                "Math timeout ({}ms) must be shorter than the render timeout ({}s)",
                c.math_timeout_ms, c.render_timeout_secs
            )));
        }
        if c.document.lang.trim().is_empty() {
            return Err(Html2PdfError::InvalidConfig(
                "Document language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Paper size and margins, in millimetres.
///
/// Must agree with the `@page` rule in [`crate::pipeline::assemble::BASE_CSS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_top_mm: f64,
    pub margin_right_mm: f64,
    pub margin_bottom_mm: f64,
    pub margin_left_mm: f64,
}

impl Default for PageFormat {
    /// A4 with 18 mm on every side.
    fn default() -> Self {
        Self::a4(18.0)
    }
}

impl PageFormat {
    const MM_PER_INCH: f64 = 25.4;

    /// A4 portrait with a uniform margin.
    pub fn a4(margin_mm: f64) -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_top_mm: margin_mm,
            margin_right_mm: margin_mm,
            margin_bottom_mm: margin_mm,
            margin_left_mm: margin_mm,
        }
    }

    /// Convert millimetres to the inches the DevTools print call expects.
    pub fn inches(mm: f64) -> f64 {
        mm / Self::MM_PER_INCH
    }
}

// ── Document skeleton ────────────────────────────────────────────────────

/// Values used by [`crate::pipeline::assemble`] when wrapping a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOptions {
    /// `lang` attribute of the generated `<html>` element. Default: `"es"`.
    pub lang: String,

    /// MathJax script referenced from the generated `<head>`.
    pub math_script_url: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            lang: "es".to_string(),
            math_script_url: DEFAULT_MATH_SCRIPT_URL.to_string(),
        }
    }
}

// ── HTTP service ─────────────────────────────────────────────────────────

/// Settings for the HTTP front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. Default: `0.0.0.0`.
    pub host: IpAddr,

    /// TCP port. Default: 8080 (the binary reads `PORT`).
    pub port: u16,

    /// Maximum accepted request body in bytes. Default: 25 MiB.
    pub body_limit: usize,

    /// Download name (without `.pdf`) when the request has none.
    pub default_filename: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            body_limit: 25 * 1024 * 1024,
            default_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// Socket address to listen on.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_print_css() {
        let c = RenderConfig::default();
        assert_eq!(c.math_timeout_ms, 4000);
        assert!(!c.sandbox);
        assert!(c.print_background);
        assert_eq!(c.document.lang, "es");
        assert!(c.document.math_script_url.contains("mathjax@3"));
    }

    #[test]
    fn a4_in_inches() {
        let p = PageFormat::default();
        assert_eq!(p, PageFormat::a4(18.0));
        assert!((PageFormat::inches(p.width_mm) - 8.267).abs() < 0.001);
        assert!((PageFormat::inches(p.height_mm) - 11.693).abs() < 0.001);
        assert!((PageFormat::inches(p.margin_top_mm) - 0.7087).abs() < 0.0001);
    }

    #[test]
    fn builder_sets_fields() {
        let c = RenderConfig::builder()
            .browser_path("/usr/bin/chromium")
            .sandbox(true)
            .arg("--font-render-hinting=none")
            .math_timeout_ms(1500)
            .render_timeout_secs(20)
            .lang("en")
            .build()
            .unwrap();
        assert_eq!(c.browser_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(c.sandbox);
        assert_eq!(c.extra_args, vec!["--font-render-hinting=none".to_string()]);
        assert_eq!(c.math_timeout_ms, 1500);
        assert_eq!(c.render_timeout_secs, 20);
        assert_eq!(c.document.lang, "en");
    }

    #[test]
    fn zero_render_timeout_rejected() {
        let err = RenderConfig::builder()
            .render_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Html2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn math_wait_must_fit_inside_render_timeout() {
        assert!(RenderConfig::builder()
            .math_timeout_ms(10_000)
            .render_timeout_secs(5)
            .build()
            .is_err());
        assert!(RenderConfig::builder()
            .math_timeout_ms(0)
            .render_timeout_secs(1)
            .build()
            .is_ok());
    }

    #[test]
    fn server_defaults() {
        let s = ServerConfig::default();
        assert_eq!(s.addr().to_string(), "0.0.0.0:8080");
        assert_eq!(s.default_filename, "documento");
    }
}
