use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapError {
    #[error("Could not decode captured image: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),

    #[error("OCR unavailable: {0}")]
    RecognitionUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SnapError>;
