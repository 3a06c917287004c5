use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::frontend;
use super::v1;
use super::v1::response::{ApiResponse, ErrorCode};
use super::AppState;

/// Multipart framing and the filter field ride on top of the image bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_bytes = state.config.capture.max_upload_bytes;
    let body_limit = max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    let v1 = v1::router::v1_router();

    Router::new()
        .nest("/api/v1", v1)
        .route("/", get(frontend::serve_root))
        .route("/{*path}", get(frontend::serve_path))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::map_response(move |response: Response| {
            oversized_body_envelope(response, max_upload_bytes)
        }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `RequestBodyLimitLayer` answers a declared oversized body with a bare
/// 413; rewrite it into the v1 envelope so the page can show the message.
async fn oversized_body_envelope(response: Response, max_upload_bytes: usize) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }

    tracing::warn!(max_upload_bytes, "Capture rejected: request body too large");
    ApiResponse::<()>::error(ErrorCode::InvalidRequest, too_large_message(max_upload_bytes))
        .into_response()
}

pub(crate) fn too_large_message(max_upload_bytes: usize) -> String {
    format!("Captured image too large (max {max_upload_bytes} bytes)")
}
