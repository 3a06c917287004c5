use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OcrStatus {
    /// `available` or `unavailable`.
    pub status: String,
    pub backend: String,
    pub model: String,
    pub languages: String,
}

/// `GET /api/v1/health`
///
/// Always 200 while the process is up. A missing OCR engine shows up as
/// `status: "degraded"`, not as an error.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let recognizer = state.recognizer();
    let available = recognizer.is_available();

    ApiResponse::success(HealthData {
        status: if available { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: OcrStatus {
            status: if available { "available" } else { "unavailable" }.to_string(),
            backend: recognizer.backend_name().to_string(),
            model: state.config.ocr.model.clone(),
            languages: state.config.ocr.languages.clone(),
        },
    })
}
