//! One camera capture, end to end.
//!
//! `bytes → decode (BGR) → [invert] → RGB → OCR → text + stats`

mod capture;
mod filter;
mod stats;

pub use capture::{prepare, CaptureLimits, CaptureOutcome, CapturePipeline};
pub use filter::{apply_filter, FilterMode};
pub use stats::{RecognitionResult, TextStats};
