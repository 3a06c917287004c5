//! OCR (Optical Character Recognition) Module
//!
//! Reads the text out of a processed capture. The engine is an opaque
//! collaborator behind the [`TextRecognizer`] trait:
//!
//! - [`OcrProvider`] picks a backend from `OcrConfig::model`: local
//!   Tesseract via leptess, or a hosted vision model via HTTP
//! - tests and embedders can supply their own `TextRecognizer`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ocr = OcrProvider::new(&config.ocr)?;
//! let text = ocr.recognize(&rgb_grid).await?;
//! ```

mod api;
mod provider;
mod recognizer;

pub use api::{VisionOcrClient, VisionProvider};
pub use provider::OcrProvider;
pub use recognizer::TextRecognizer;
