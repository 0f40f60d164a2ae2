use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::debug;

use super::error::ApiError;
use super::filename::{content_disposition, download_name};
use super::models::{ConvertRequest, InfoResponse};
use super::state::AppState;
use crate::convert::convert_html;

/// `GET /`: liveness probe.
pub async fn index() -> Json<InfoResponse> {
    Json(InfoResponse::default())
}

/// `POST /convert` (and the legacy `POST /html2pdf`).
pub async fn convert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        debug!("Unusable request body: {}", rejection.body_text());
        ApiError::missing_html()
    })?;

    let html = req.html.ok_or_else(ApiError::missing_html)?;
    let filename = download_name(req.filename.as_deref(), &state.server.default_filename);

    let pdf = convert_html(&html, state.renderer.as_ref(), &state.document).await?;

    debug!(%filename, pdf_bytes = pdf.len(), "Sending PDF");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&filename)),
            (header::CONTENT_LENGTH, pdf.len().to_string()),
        ],
        pdf,
    )
        .into_response())
}
