//! Mock renderer for tests and browser-less runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::render::{PdfRenderer, RenderFuture};
use crate::error::Html2PdfError;

/// Smallest byte string that identifies as a PDF.
pub const MINIMAL_PDF: &[u8] = b"%PDF-1.7\n1 0 obj<<>>endobj\ntrailer<<>>\n%%EOF\n";

/// A configurable mock response for [`MockRenderer`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return these bytes as the PDF.
    Pdf(Vec<u8>),
    /// Simulate a missing browser executable.
    BrowserNotFound,
    /// Simulate a browser that will not start.
    LaunchFailed(String),
    /// Simulate a DevTools failure while printing.
    Error(String),
    /// Simulate the render deadline expiring.
    Timeout { secs: u64 },
}

/// A hand-rolled [`PdfRenderer`] that never touches a browser.
///
/// Records every document it is asked to render so tests can assert on
/// what the pipeline produced.
pub struct MockRenderer {
    response: MockResponse,
    delay: Option<Duration>,
    call_count: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockRenderer {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            delay: None,
            call_count: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// A mock that returns [`MINIMAL_PDF`].
    pub fn pdf() -> Self {
        Self::new(MockResponse::Pdf(MINIMAL_PDF.to_vec()))
    }

    /// Set simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `render()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Documents received so far, oldest first.
    pub fn received(&self) -> Vec<String> {
        self.received
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// The most recent document received.
    pub fn last_received(&self) -> Option<String> {
        self.received().pop()
    }
}

impl PdfRenderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    fn render<'a>(&'a self, html: &'a str) -> RenderFuture<'a> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut docs) = self.received.lock() {
            docs.push(html.to_string());
        }
        let response = self.response.clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Pdf(bytes) => Ok(bytes),
                MockResponse::BrowserNotFound => Err(Html2PdfError::BrowserNotFound(
                    chromium_locate::LocateError::NotFound { searched: vec![] },
                )),
                MockResponse::LaunchFailed(detail) => Err(Html2PdfError::BrowserLaunch {
                    path: "/mock/chromium".into(),
                    detail,
                }),
                MockResponse::Error(detail) => Err(Html2PdfError::Render {
                    stage: "print",
                    detail,
                }),
                MockResponse::Timeout { secs } => Err(Html2PdfError::RenderTimeout { secs }),
            }
        })
    }
}
