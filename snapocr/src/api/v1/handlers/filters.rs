use axum::extract::State;

use crate::api::state::AppState;
use crate::api::v1::dto::FiltersResponse;
use crate::api::v1::response::ApiResponse;

/// `GET /api/v1/filters`
#[utoipa::path(
    get,
    path = "/api/v1/filters",
    tag = "captures",
    operation_id = "filters.list",
    responses(
        (status = 200, description = "Available filter modes and the default", body = FiltersResponse),
    )
)]
pub async fn list_filters(State(state): State<AppState>) -> ApiResponse<FiltersResponse> {
    ApiResponse::success(FiltersResponse::new(state.config.capture.default_filter))
}
