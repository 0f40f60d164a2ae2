use serde::{Deserialize, Serialize};

// ── Requests ────────────────────────────────────────────────────────────

/// Body of `POST /convert`.
///
/// `html` is optional at the type level so that its absence reaches the
/// handler and is reported as a 400 with a JSON body, rather than as a
/// deserialisation rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertRequest {
    pub html: Option<String>,
    pub filename: Option<String>,
}

// ── Responses ───────────────────────────────────────────────────────────

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub ok: bool,
    pub service: &'static str,
    pub endpoint: &'static str,
    pub version: &'static str,
}

impl Default for InfoResponse {
    fn default() -> Self {
        Self {
            ok: true,
            service: "html2pdf",
            endpoint: "/convert",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
