//! Document assembly: turn normalised HTML into a complete, printable page.
//!
//! Requests carry anything from a single `<p>` to a full document. The
//! renderer needs a whole document with the baseline print CSS in its head,
//! so this stage decides which case it is looking at and fills in the rest:
//!
//! | Input | Output |
//! |-------|--------|
//! | Fragment (no `<html`) | Skeleton with charset, [`BASE_CSS`], MathJax, fragment as `<body>` |
//! | Document with `</head>` | Same document, [`BASE_CSS`] inserted before the first `</head>` |
//! | Document without `</head>` | `<head>` holding [`BASE_CSS`] inserted after the `<html …>` tag |
//!
//! Detection is a case-insensitive substring test, not a parse. Content is
//! never re-escaped or reordered.

use crate::config::DocumentOptions;
use crate::error::Html2PdfError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Print stylesheet injected into every assembled document.
///
/// A4 pages with 18 mm margins, a forced break before each page-break
/// element, and ruled tables.
pub const BASE_CSS: &str = "<style>
  @page { size: A4; margin: 18mm; }
  .page-break { break-before: page; }
  table, th, td { border: 1px solid black; border-collapse: collapse; }
  th, td { padding: 4px; }
</style>
";

/// How [`assemble`] treated its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// No `<html` tag: wrapped in a generated skeleton.
    Fragment,
    /// Full document: CSS inserted before `</head>`.
    Document,
    /// Full document lacking `</head>`: a head was synthesised.
    HeadlessDocument,
}

static RE_HTML_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html\b").unwrap());
static RE_HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html\b[^>]*>").unwrap());
static RE_HEAD_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

/// Classify `html` the way [`assemble`] will.
pub fn detect_kind(html: &str) -> DocumentKind {
    if !RE_HTML_OPEN.is_match(html) {
        DocumentKind::Fragment
    } else if RE_HEAD_CLOSE.is_match(html) {
        DocumentKind::Document
    } else {
        DocumentKind::HeadlessDocument
    }
}

/// Assemble with the default skeleton settings (`lang="es"`, MathJax 3 CDN).
pub fn assemble(html: &str) -> Result<String, Html2PdfError> {
    assemble_with(html, &DocumentOptions::default())
}

/// Produce a complete document from `html`.
///
/// # Errors
/// [`Html2PdfError::MalformedDocument`] when the input contains `<html` but
/// no `</head>`, and the `<html` tag is never closed with `>`, so there is
/// nowhere to put the stylesheet.
pub fn assemble_with(html: &str, options: &DocumentOptions) -> Result<String, Html2PdfError> {
    match detect_kind(html) {
        DocumentKind::Fragment => Ok(wrap_fragment(html, options)),
        DocumentKind::Document => Ok(inject_before_head_close(html)),
        DocumentKind::HeadlessDocument => synthesise_head(html),
    }
}

fn wrap_fragment(fragment: &str, options: &DocumentOptions) -> String {
    let mut out = String::with_capacity(fragment.len() + BASE_CSS.len() + 256);
    out.push_str("<!DOCTYPE html><html lang=\"");
    out.push_str(&escape_attr(&options.lang));
    out.push_str("\"><head><meta charset=\"UTF-8\">");
    out.push_str(BASE_CSS);
    out.push_str("<script src=\"");
    out.push_str(&escape_attr(&options.math_script_url));
    out.push_str("\"></script></head><body>");
    out.push_str(fragment);
    out.push_str("</body></html>");
    out
}

fn inject_before_head_close(html: &str) -> String {
    let Some(m) = RE_HEAD_CLOSE.find(html) else {
        return html.to_string();
    };
    let mut out = String::with_capacity(html.len() + BASE_CSS.len());
    out.push_str(&html[..m.start()]);
    out.push_str(BASE_CSS);
    out.push_str(&html[m.start()..]);
    out
}

fn synthesise_head(html: &str) -> Result<String, Html2PdfError> {
    let tag = RE_HTML_TAG
        .find(html)
        .ok_or_else(|| Html2PdfError::MalformedDocument {
            detail: "document has an unterminated <html> tag and no </head>".into(),
        })?;

    let mut out = String::with_capacity(html.len() + BASE_CSS.len() + 16);
    out.push_str(&html[..tag.end()]);
    out.push_str("<head>");
    out.push_str(BASE_CSS);
    out.push_str("</head>");
    out.push_str(&html[tag.end()..]);
    Ok(out)
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
