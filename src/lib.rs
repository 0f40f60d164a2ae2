//! # html2pdf
//!
//! Convert HTML documents and fragments to PDF with headless Chromium.
//!
//! ## What this crate adds on top of a browser
//!
//! Printing HTML from Chromium is one DevTools call. What callers actually
//! send is rarely a print-ready page, though: often a bare fragment produced
//! by a template or a text generator, with page breaks written as the token
//! `[NUEVA PÁGINA]` and LaTeX-style math for MathJax. This crate turns that
//! into a complete, consistently styled document first, then renders it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML (fragment or document)
//!  │
//!  ├─ 1. Normalize  [NUEVA PÁGINA] → <div class="page-break"></div>
//!  ├─ 2. Assemble   wrap fragments / inject A4 print CSS into <head>
//!  ├─ 3. Render     launch Chromium, load, wait ≤4s for MathJax, print
//!  └─ 4. Output     PDF bytes (HTTP response or file)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2pdf::{convert_html, ChromiumRenderer, RenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::default();
//!     let renderer = ChromiumRenderer::new(config.clone());
//!     let pdf = convert_html("<h1>Hola</h1>", &renderer, &config.document).await?;
//!     std::fs::write("hola.pdf", pdf)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | HTTP service (`axum`) and the `html2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `server` when using only the library:
//! ```toml
//! html2pdf = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DocumentOptions, PageFormat, RenderConfig, RenderConfigBuilder, ServerConfig};
pub use convert::{
    convert_html, convert_to_file, convert_with_stats, prepare, prepare_document,
    ConversionStats, PreparedDocument,
};
pub use error::Html2PdfError;
pub use pipeline::assemble::{assemble, DocumentKind, BASE_CSS};
pub use pipeline::mock::{MockRenderer, MockResponse};
pub use pipeline::normalize::{normalize, PAGE_BREAK_HTML, PAGE_BREAK_MARKER};
pub use pipeline::render::{ChromiumRenderer, PdfRenderer};
