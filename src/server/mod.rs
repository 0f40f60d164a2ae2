//! HTTP front end: one conversion endpoint and an info probe.
//!
//! ```text
//! GET  /          → {"ok": true, "service": "html2pdf", ...}
//! POST /convert   {"html": "...", "filename": "..."} → application/pdf
//! POST /html2pdf  same as /convert
//! ```
//!
//! The router is built from an explicit [`AppState`], so tests can mount it
//! with a [`crate::pipeline::mock::MockRenderer`] and drive it in-process.

pub mod error;
pub mod filename;
pub mod handlers;
pub mod models;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.server.body_limit);

    Router::new()
        .route("/", get(handlers::index))
        .route("/convert", post(handlers::convert))
        .route("/html2pdf", post(handlers::convert))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `state.server.addr()` and serve until Ctrl-C or SIGTERM.
///
/// In-flight conversions are allowed to finish before returning.
pub async fn serve(state: Arc<AppState>) -> std::io::Result<()> {
    let addr = state.server.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        renderer = state.renderer.name(),
        "Listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
