use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use crate::api::routes::too_large_message;
use crate::api::state::AppState;
use crate::api::v1::dto::CaptureView;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::pipeline::FilterMode;

/// `POST /api/v1/captures`
///
/// Multipart fields:
/// - `image` (alias `file`): the encoded photo from the camera control
/// - `filter` (alias `mode`): `filtered` / `unfiltered` or a radio label;
///   falls back to the configured default when absent
#[utoipa::path(
    post,
    path = "/api/v1/captures",
    tag = "captures",
    operation_id = "captures.process",
    request_body(content_type = "multipart/form-data", content = String, description = "Camera capture in the `image` field and an optional `filter` field"),
    responses(
        (status = 200, description = "Capture processed", body = CaptureView),
        (status = 400, description = "Missing, oversized or undecodable capture", body = ApiError),
        (status = 500, description = "OCR engine failure", body = ApiError),
        (status = 501, description = "No OCR engine available", body = ApiError),
    )
)]
pub async fn process_capture(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<CaptureView> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut filter: Option<FilterMode> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_failure(&state, e, "Malformed multipart body"),
        };
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" | "file" => {
                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => return multipart_failure(&state, e, "Failed to read image"),
                };
                image_bytes = Some(bytes.to_vec());
            }
            "filter" | "mode" => {
                let raw = match field.text().await {
                    Ok(t) => t,
                    Err(e) => return multipart_failure(&state, e, "Invalid filter value"),
                };
                match raw.parse::<FilterMode>() {
                    Ok(mode) => filter = Some(mode),
                    Err(msg) => return ApiResponse::error(ErrorCode::InvalidRequest, msg),
                }
            }
            _ => {}
        }
    }

    let bytes = match image_bytes {
        Some(b) => b,
        None => {
            return ApiResponse::error(ErrorCode::InvalidRequest, "Missing required 'image' field");
        }
    };
    let filter = filter.unwrap_or(state.config.capture.default_filter);

    let outcome = match state.pipeline.run(bytes, filter).await {
        Ok(outcome) => outcome,
        Err(e) => return e.into(),
    };

    match CaptureView::render(outcome) {
        Ok(view) => ApiResponse::success(view),
        Err(e) => e.into(),
    }
}

/// A body cut off by the size limit reads as a multipart error; report it as
/// the size problem it is.
fn multipart_failure(
    state: &AppState,
    err: MultipartError,
    context: &str,
) -> ApiResponse<CaptureView> {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            too_large_message(state.config.capture.max_upload_bytes),
        );
    }
    ApiResponse::error(ErrorCode::InvalidRequest, format!("{context}: {err}"))
}
