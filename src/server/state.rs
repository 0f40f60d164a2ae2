use crate::config::{DocumentOptions, ServerConfig};
use crate::pipeline::render::PdfRenderer;
use std::sync::Arc;

/// Shared application state accessible from all handlers.
///
/// Built once at startup and handed to [`super::router`]; nothing here is
/// mutated while serving.
pub struct AppState {
    pub renderer: Arc<dyn PdfRenderer>,
    pub document: DocumentOptions,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        document: DocumentOptions,
        server: ServerConfig,
    ) -> Self {
        Self {
            renderer,
            document,
            server,
        }
    }
}
