//! Capture response DTOs for the v1 API.
//!
//! A [`CaptureView`] is everything the page needs to render one processed
//! capture: the image it should show, the filter caption, and either the
//! recognized text with its statistics or the "no text" notice.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::imaging;
use crate::pipeline::{CaptureOutcome, FilterMode, RecognitionResult, TextStats};

pub const NO_TEXT_TITLE: &str = "⚠️ No se detectó texto";

pub const NO_TEXT_SUGGESTIONS: [&str; 3] = [
    "Mejorar la iluminación",
    "Usar el filtro de inversión",
    "Asegurar que el texto esté enfocado",
];

/// Processed capture, ready for an `<img src>`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureImage {
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...`, always RGB.
    pub data_url: String,
}

/// What to show next to the image.
///
/// Wire format is internally tagged on `kind`: `"text"` or `"noText"`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CaptureResult {
    /// The engine returned something besides whitespace.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Raw engine output, untrimmed.
        text: String,
        stats: TextStats,
    },
    /// Nothing readable was found.
    #[serde(rename_all = "camelCase")]
    NoText {
        title: String,
        suggestions: Vec<String>,
    },
}

/// Response body for `POST /api/v1/captures`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptureView {
    #[schema(value_type = String, format = Uuid)]
    pub capture_id: Uuid,
    pub filter: FilterMode,
    /// Radio label of the mode used (`Con Filtro` / `Sin Filtro`).
    pub filter_label: String,
    /// Caption for the processed image.
    pub filter_status: String,
    pub image: CaptureImage,
    pub result: CaptureResult,
    pub elapsed_ms: u64,
    #[schema(value_type = String, format = DateTime)]
    pub processed_at: DateTime<Utc>,
}

impl CaptureResult {
    /// Notice path when the text is blank once trimmed, text path otherwise.
    pub fn from_recognition(recognition: RecognitionResult) -> Self {
        if recognition.has_text() {
            CaptureResult::Text {
                text: recognition.text,
                stats: recognition.stats,
            }
        } else {
            CaptureResult::NoText {
                title: NO_TEXT_TITLE.to_string(),
                suggestions: NO_TEXT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    pub fn has_text(&self) -> bool {
        matches!(self, CaptureResult::Text { .. })
    }
}

impl CaptureView {
    /// Encode the processed image and pick the text or notice path.
    pub fn render(outcome: CaptureOutcome) -> Result<Self> {
        let data_url = imaging::to_data_url(&outcome.image)?;
        let (width, height) = outcome.image.dimensions();

        Ok(Self {
            capture_id: outcome.capture_id,
            filter: outcome.filter,
            filter_label: outcome.filter.label().to_string(),
            filter_status: outcome.filter.status().to_string(),
            image: CaptureImage {
                width,
                height,
                data_url,
            },
            result: CaptureResult::from_recognition(outcome.recognition),
            elapsed_ms: outcome.elapsed_ms,
            processed_at: outcome.processed_at,
        })
    }
}
