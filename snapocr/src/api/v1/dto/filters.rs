//! Filter mode listing for the v1 API.

use serde::Serialize;

use crate::pipeline::FilterMode;

/// One radio option.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption {
    pub mode: FilterMode,
    pub label: String,
    pub status: String,
}

/// Response body for `GET /api/v1/filters`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiltersResponse {
    pub options: Vec<FilterOption>,
    /// Applied when a capture arrives without a `filter` field.
    pub default: FilterMode,
    pub help: String,
}

impl FiltersResponse {
    pub fn new(default: FilterMode) -> Self {
        Self {
            options: FilterMode::ALL
                .iter()
                .map(|mode| FilterOption {
                    mode: *mode,
                    label: mode.label().to_string(),
                    status: mode.status().to_string(),
                })
                .collect(),
            default,
            help: "El filtro invierte los colores para mejorar la detección de texto".to_string(),
        }
    }
}
