//! End-to-end scenarios through the public API, rendered by the mock.

use html2pdf::{
    assemble, convert_html, normalize, prepare, DocumentKind, DocumentOptions, Html2PdfError,
    MockRenderer, MockResponse, BASE_CSS, PAGE_BREAK_HTML,
};

// ── Scenario A: marker between blank lines ───────────────────────────────────

#[test]
fn scenario_a_marker_becomes_page_break() {
    assert_eq!(
        normalize("Hello\n\n[NUEVA PÁGINA]\n\nWorld"),
        "Hello<div class=\"page-break\"></div>World"
    );
}

// ── Scenario B: fragment is wrapped ──────────────────────────────────────────

#[test]
fn scenario_b_fragment_is_wrapped() {
    let out = assemble("<p>x</p>").unwrap();
    assert!(out.contains("<html"));
    assert!(out.contains("<head>"));
    assert!(out.contains(BASE_CSS));
    assert!(out.contains("<script src=\"https://cdn.jsdelivr.net/npm/mathjax@3"));
    assert!(out.contains("<body><p>x</p></body>"));
}

// ── Scenario C: full document gets CSS before </head> ────────────────────────

#[test]
fn scenario_c_document_gets_css() {
    let out = assemble("<html><head></head><body>y</body></html>").unwrap();
    assert_eq!(
        out,
        format!("<html><head>{BASE_CSS}</head><body>y</body></html>")
    );
}

// ── Properties across both stages ────────────────────────────────────────────

#[test]
fn assembled_output_always_has_root_and_css() {
    for raw in [
        "",
        "plain text",
        "<p>a</p>\n[NUEVA PÁGINA]\n<p>b</p>",
        "<!DOCTYPE html><html><head><title>t</title></head><body></body></html>",
        "<html lang=\"en\"><body>no head</body></html>",
        "<HTML><HEAD></HEAD><BODY>[nueva página]</BODY></HTML>",
    ] {
        let doc = prepare(raw, &DocumentOptions::default()).unwrap();
        assert!(doc.html.to_ascii_lowercase().contains("<html"), "{raw:?}");
        assert_eq!(doc.html.matches(BASE_CSS).count(), 1, "{raw:?}");
    }
}

#[test]
fn non_marker_content_survives() {
    let raw = "<h1>Tema 1</h1>\n<p>\\(a^2 + b^2 = c^2\\)</p>\n\n[NUEVA PÁGINA]\n\n<table><tr><td>1</td></tr></table>";
    let doc = prepare(raw, &DocumentOptions::default()).unwrap();
    assert_eq!(doc.kind, DocumentKind::Fragment);
    assert_eq!(doc.page_breaks, 1);
    assert!(doc.html.contains(&format!(
        "<body><h1>Tema 1</h1>\n<p>\\(a^2 + b^2 = c^2\\)</p>{PAGE_BREAK_HTML}<table><tr><td>1</td></tr></table></body>"
    )));
}

#[test]
fn custom_document_options_apply_to_fragments_only() {
    let opts = DocumentOptions {
        lang: "en".into(),
        math_script_url: "/static/mathjax/tex-chtml.js".into(),
    };
    let frag = prepare("<p>x</p>", &opts).unwrap();
    assert!(frag.html.contains("<html lang=\"en\">"));
    assert!(frag.html.contains("src=\"/static/mathjax/tex-chtml.js\""));

    let doc = prepare("<html><head></head></html>", &opts).unwrap();
    assert!(!doc.html.contains("mathjax"));
}

// ── Conversion through a renderer ────────────────────────────────────────────

#[tokio::test]
async fn renderer_sees_normalized_and_assembled_document() {
    let mock = MockRenderer::pdf();
    let pdf = convert_html(
        "uno\n[NUEVA PÁGINA]\ndos",
        &mock,
        &DocumentOptions::default(),
    )
    .await
    .unwrap();

    assert!(pdf.starts_with(b"%PDF"));
    assert_eq!(mock.call_count(), 1);
    let sent = mock.last_received().unwrap();
    assert!(sent.contains(&format!("<body>uno{PAGE_BREAK_HTML}dos</body>")));
    assert!(!sent.contains("[NUEVA PÁGINA]"));
}

#[tokio::test]
async fn renderer_failures_are_server_side() {
    for response in [
        MockResponse::BrowserNotFound,
        MockResponse::LaunchFailed("no display".into()),
        MockResponse::Error("target crashed".into()),
        MockResponse::Timeout { secs: 60 },
    ] {
        let mock = MockRenderer::new(response);
        let err = convert_html("<p>x</p>", &mock, &DocumentOptions::default())
            .await
            .unwrap_err();
        assert!(!err.is_client_error(), "{err}");
    }
}

#[test]
fn html5_mention_is_a_fragment_not_a_malformed_document() {
    let prepared = prepare("<p>Soporta <html5 widgets</p>", &DocumentOptions::default()).unwrap();
    assert_eq!(prepared.kind, DocumentKind::Fragment);
    assert!(prepared.html.starts_with("<!DOCTYPE html><html lang=\"es\">"));
    assert!(prepared
        .html
        .contains("<body><p>Soporta <html5 widgets</p></body>"));
}

#[tokio::test]
async fn malformed_document_is_client_side_and_not_rendered() {
    let mock = MockRenderer::pdf();
    let err = convert_html("<html lang=\"es\"", &mock, &DocumentOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Html2PdfError::MalformedDocument { .. }));
    assert_eq!(mock.call_count(), 0);
}
