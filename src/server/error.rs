//! Mapping from failures to HTTP responses.
//!
//! Every error body is `{"error": "<message>"}`.
//!
//! | Failure | Status |
//! |---------|--------|
//! | Body missing, not JSON, or without `html` | 400 |
//! | Body over the configured limit | 413 |
//! | [`Html2PdfError::MalformedDocument`] | 422 |
//! | Browser not found / failed to launch | 503 |
//! | [`Html2PdfError::RenderTimeout`] | 504 |
//! | Anything else | 500 |

use crate::error::Html2PdfError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

/// Message returned when the request carries no usable `html` field.
pub const MISSING_HTML: &str = "Bad request: falta 'html'";

#[derive(Debug)]
pub enum ApiError {
    /// The request itself is unusable; nothing was rendered.
    BadRequest(String),
    /// The body exceeded the size limit.
    PayloadTooLarge(String),
    /// Conversion failed.
    Convert(Html2PdfError),
}

impl ApiError {
    pub fn missing_html() -> Self {
        ApiError::BadRequest(MISSING_HTML.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Convert(e) => match e {
                Html2PdfError::MalformedDocument { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Html2PdfError::BrowserNotFound(_) | Html2PdfError::BrowserLaunch { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                Html2PdfError::RenderTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::PayloadTooLarge(msg) => msg.clone(),
            ApiError::Convert(e) => e.to_string(),
        }
    }
}

impl From<Html2PdfError> for ApiError {
    fn from(e: Html2PdfError) -> Self {
        ApiError::Convert(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(status = status.as_u16(), "Conversion failed: {}", message);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", message);
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (ApiError::missing_html(), 400),
            (ApiError::PayloadTooLarge("too big".into()), 413),
            (
                Html2PdfError::MalformedDocument { detail: "x".into() }.into(),
                422,
            ),
            (
                Html2PdfError::BrowserNotFound(chromium_locate::LocateError::NotFound {
                    searched: vec![],
                })
                .into(),
                503,
            ),
            (
                Html2PdfError::BrowserLaunch {
                    path: "/usr/bin/chromium".into(),
                    detail: "exited".into(),
                }
                .into(),
                503,
            ),
            (Html2PdfError::RenderTimeout { secs: 60 }.into(), 504),
            (Html2PdfError::render("print", "crashed").into(), 500),
            (Html2PdfError::Internal("x".into()).into(), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status().as_u16(), expected, "{err:?}");
        }
    }

    #[test]
    fn client_errors_are_4xx() {
        let e: ApiError = Html2PdfError::MalformedDocument { detail: "x".into() }.into();
        assert!(e.status().is_client_error());
    }
}
