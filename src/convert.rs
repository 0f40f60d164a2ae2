//! Conversion entry points: compose normalize → assemble → render.
//!
//! The text stages are pure and cheap; all cost sits in the renderer. The
//! renderer is passed in as a [`PdfRenderer`] so the HTTP service, the CLI
//! and the tests share one code path and differ only in what renders.

use crate::config::DocumentOptions;
use crate::error::Html2PdfError;
use crate::pipeline::assemble::{self, DocumentKind};
use crate::pipeline::normalize;
use crate::pipeline::render::PdfRenderer;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// A document ready for the renderer, plus what was done to it.
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    /// Complete HTML document.
    pub html: String,
    /// Whether the input was wrapped or had CSS injected.
    pub kind: DocumentKind,
    /// Page-break markers rewritten by the normalizer.
    pub page_breaks: usize,
}

/// Summary of one conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub document_bytes: usize,
    pub pdf_bytes: usize,
    pub page_breaks: usize,
    pub duration_ms: u64,
}

/// Run the text stages on `raw`.
pub fn prepare(raw: &str, options: &DocumentOptions) -> Result<PreparedDocument, Html2PdfError> {
    let page_breaks = normalize::count_markers(raw);
    let normalized = normalize::normalize(raw);
    let kind = assemble::detect_kind(&normalized);
    let html = assemble::assemble_with(&normalized, options)?;
    debug!(
        input_bytes = raw.len(),
        document_bytes = html.len(),
        page_breaks,
        ?kind,
        "Prepared document"
    );
    Ok(PreparedDocument {
        html,
        kind,
        page_breaks,
    })
}

/// The assembled HTML for `raw`, without rendering.
pub fn prepare_document(raw: &str, options: &DocumentOptions) -> Result<String, Html2PdfError> {
    prepare(raw, options).map(|doc| doc.html)
}

/// Convert raw HTML to PDF bytes with `renderer`.
///
/// # Errors
/// [`Html2PdfError::MalformedDocument`] from assembly (nothing is rendered),
/// or whatever the renderer reports.
pub async fn convert_html(
    raw: &str,
    renderer: &dyn PdfRenderer,
    options: &DocumentOptions,
) -> Result<Vec<u8>, Html2PdfError> {
    convert_with_stats(raw, renderer, options)
        .await
        .map(|(pdf, _)| pdf)
}

/// Like [`convert_html`], also returning [`ConversionStats`].
pub async fn convert_with_stats(
    raw: &str,
    renderer: &dyn PdfRenderer,
    options: &DocumentOptions,
) -> Result<(Vec<u8>, ConversionStats), Html2PdfError> {
    let start = Instant::now();
    let doc = prepare(raw, options)?;
    let pdf = renderer.render(&doc.html).await?;

    let stats = ConversionStats {
        input_bytes: raw.len(),
        document_bytes: doc.html.len(),
        pdf_bytes: pdf.len(),
        page_breaks: doc.page_breaks,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        renderer = renderer.name(),
        input_bytes = stats.input_bytes,
        pdf_bytes = stats.pdf_bytes,
        page_breaks = stats.page_breaks,
        duration_ms = stats.duration_ms,
        "Conversion complete"
    );
    Ok((pdf, stats))
}

/// Read an HTML file (or stdin when `input` is `-`), convert it and write
/// the PDF to `output_path`.
///
/// Uses atomic write (temp file + rename) so a failed render never leaves a
/// truncated PDF behind.
pub async fn convert_to_file(
    input: &str,
    output_path: impl AsRef<Path>,
    renderer: &dyn PdfRenderer,
    options: &DocumentOptions,
) -> Result<ConversionStats, Html2PdfError> {
    let raw = read_input(input).await?;
    let (pdf, stats) = convert_with_stats(&raw, renderer, options).await?;
    write_atomic(output_path.as_ref(), &pdf).await?;
    Ok(stats)
}

/// Read a UTF-8 HTML document from a path, or from stdin for `-`.
pub async fn read_input(input: &str) -> Result<String, Html2PdfError> {
    if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|e| Html2PdfError::InputReadFailed {
                path: "<stdin>".into(),
                source: e,
            })?;
        return Ok(buf);
    }

    tokio::fs::read_to_string(input)
        .await
        .map_err(|e| Html2PdfError::InputReadFailed {
            path: input.into(),
            source: e,
        })
}

/// Write `bytes` to `path` via a sibling temp file and rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Html2PdfError> {
    let write_err = |e| Html2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}
