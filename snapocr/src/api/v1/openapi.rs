use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SnapOCR API",
        version = "1.0.0",
        description = "Camera OCR. Upload a capture, optionally invert it, get the recognized text back.",
    ),
    paths(
        handlers::health::health_check,
        handlers::filters::list_filters,
        handlers::captures::process_capture,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        // Pipeline
        crate::pipeline::FilterMode,
        crate::pipeline::TextStats,
        // Captures
        dto::captures::CaptureView,
        dto::captures::CaptureImage,
        dto::captures::CaptureResult,
        // Filters
        dto::filters::FilterOption,
        dto::filters::FiltersResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "captures", description = "Capture processing and filter modes"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
