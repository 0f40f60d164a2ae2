//! Pipeline stages for HTML-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! testable alone and the rendering backend can be swapped without touching
//! the text stages.
//!
//! ## Data Flow
//!
//! ```text
//! raw html ──▶ normalize ──▶ assemble ──▶ render ──▶ PDF bytes
//!              (markers)     (skeleton,    (Chromium,
//!                             print CSS)    typeset inside)
//! ```
//!
//! 1. [`normalize`]: `[NUEVA PÁGINA]` markers become page-break elements
//! 2. [`assemble`]: fragments are wrapped in a full document; every
//!    document gets the baseline print stylesheet
//! 3. [`render`]: launch a browser, load the document, print to PDF;
//!    the only stage with process and network I/O
//! 4. [`typeset`]: bounded wait for MathJax, run from inside `render`
//!
//! [`mock`] provides a [`render::PdfRenderer`] that needs no browser.

pub mod assemble;
pub mod mock;
pub mod normalize;
pub mod render;
pub mod typeset;
