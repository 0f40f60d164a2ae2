//! Page-break markers: rewrite `[NUEVA PÁGINA]` into a structural element.
//!
//! Authors (and upstream text generators) separate pages with the literal
//! token `[NUEVA PÁGINA]`, usually on a line of its own. The browser knows
//! nothing about it, so before rendering every occurrence becomes
//! `<div class="page-break"></div>`, which the baseline print CSS turns into
//! a forced page break.
//!
//! ## Rule Order
//!
//! 1. Collapse whitespace (spaces, tabs, CR/LF) on both sides of each marker,
//!    leaving the bare marker in place.
//! 2. Replace every bare marker with [`PAGE_BREAK_HTML`].
//!
//! Both passes match case-insensitively. Whitespace between two markers is
//! consumed by the first one, so back-to-back markers stay two separate
//! page breaks.

use once_cell::sync::Lazy;
use regex::Regex;

/// The page-break token as it appears in raw input (matched ignoring case).
pub const PAGE_BREAK_MARKER: &str = "[NUEVA PÁGINA]";

/// Markup substituted for each marker.
pub const PAGE_BREAK_HTML: &str = r#"<div class="page-break"></div>"#;

/// Rewrite every page-break marker in `raw` into [`PAGE_BREAK_HTML`].
///
/// Total over all strings; text with no marker is returned unchanged.
pub fn normalize(raw: &str) -> String {
    let s = collapse_marker_whitespace(raw);
    replace_markers(&s)
}

/// Number of page-break markers in `raw`.
pub fn count_markers(raw: &str) -> usize {
    RE_MARKER.find_iter(raw).count()
}

// ── Rule 1: Collapse whitespace around markers ──────────────────────────────

static RE_PADDED_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\[NUEVA PÁGINA\]\s*").unwrap());

fn collapse_marker_whitespace(input: &str) -> String {
    RE_PADDED_MARKER
        .replace_all(input, regex::NoExpand(PAGE_BREAK_MARKER))
        .into_owned()
}

// ── Rule 2: Marker → page-break element ─────────────────────────────────────

static RE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[NUEVA PÁGINA\]").unwrap());

fn replace_markers(input: &str) -> String {
    RE_MARKER
        .replace_all(input, regex::NoExpand(PAGE_BREAK_HTML))
        .into_owned()
}
