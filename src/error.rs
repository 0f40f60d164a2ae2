//! Error types for the html2pdf library.
//!
//! One enum, [`Html2PdfError`], covers every failure the conversion can
//! report. Variants fall into two camps that callers must keep apart:
//!
//! * **Client errors**: the submitted document itself cannot be turned
//!   into a renderable page ([`Html2PdfError::MalformedDocument`]). Retrying
//!   the same input will fail the same way.
//!
//! * **Server errors**: the rendering engine could not be found, would not
//!   start, hung, or crashed. The input may be perfectly fine.
//!
//! [`Html2PdfError::is_client_error`] encodes the split so the HTTP layer
//! can pick a 4xx or 5xx status without matching on every variant.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the html2pdf library.
#[derive(Debug, Error)]
pub enum Html2PdfError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The input claims to be a full document but cannot be completed.
    #[error("Malformed HTML document: {detail}")]
    MalformedDocument { detail: String },

    // ── Browser errors ────────────────────────────────────────────────────
    /// No Chromium/Chrome executable could be located.
    #[error("Rendering engine not available: {0}")]
    BrowserNotFound(#[from] chromium_locate::LocateError),

    /// The browser process was found but did not start or connect.
    #[error("Failed to launch browser '{path}': {detail}")]
    BrowserLaunch { path: PathBuf, detail: String },

    /// A DevTools call failed while loading or printing the document.
    #[error("Rendering failed during {stage}: {detail}")]
    Render { stage: &'static str, detail: String },

    /// The whole render exceeded `render_timeout_secs`.
    #[error("Rendering timed out after {secs}s")]
    RenderTimeout { secs: u64 },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input HTML file.
    #[error("Failed to read input '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Html2PdfError {
    /// `true` when the caller's input caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Html2PdfError::MalformedDocument { .. })
    }

    /// Shorthand for a [`Html2PdfError::Render`] at `stage`.
    pub(crate) fn render(stage: &'static str, detail: impl std::fmt::Display) -> Self {
        Html2PdfError::Render {
            stage,
            detail: detail.to_string(),
        }
    }
}
