use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use super::filter::FilterMode;
use super::stats::RecognitionResult;
use crate::config::{CaptureConfig, OcrConfig};
use crate::error::{Result, SnapError};
use crate::imaging::{self, ChannelOrder, PixelGrid};
use crate::ocr::TextRecognizer;

/// Everything one capture produced, ready to be rendered.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub capture_id: Uuid,
    pub filter: FilterMode,
    /// The grid the engine saw, in RGB order.
    pub image: PixelGrid,
    pub recognition: RecognitionResult,
    pub elapsed_ms: u64,
    pub processed_at: DateTime<Utc>,
}

/// Size limits checked around decoding.
#[derive(Debug, Clone, Copy)]
pub struct CaptureLimits {
    pub max_upload_bytes: usize,
    pub min_dimension: u32,
    pub max_dimension: u32,
}

impl CaptureLimits {
    pub fn from_config(capture: &CaptureConfig, ocr: &OcrConfig) -> Self {
        Self {
            max_upload_bytes: capture.max_upload_bytes,
            min_dimension: ocr.min_image_dimension,
            max_dimension: ocr.max_image_dimension,
        }
    }

    /// Reject captures that are empty or too large to be worth decoding.
    pub fn check_bytes(&self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(SnapError::Validation("Captured image is empty".to_string()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(SnapError::Validation(format!(
                "Captured image too large: {} bytes (max {} bytes)",
                bytes.len(),
                self.max_upload_bytes
            )));
        }
        Ok(())
    }

    pub fn check_dimensions(&self, grid: &PixelGrid) -> Result<()> {
        let (width, height) = grid.dimensions();
        if width < self.min_dimension || height < self.min_dimension {
            return Err(SnapError::Validation(format!(
                "Image too small: {}x{}, minimum {}x{}",
                width, height, self.min_dimension, self.min_dimension
            )));
        }
        Ok(())
    }
}

/// Decode, optionally invert, convert to RGB, then recognize.
///
/// The filter mode is an argument of [`CapturePipeline::run`]; the pipeline
/// itself holds no per-capture state and can be shared freely.
#[derive(Clone)]
pub struct CapturePipeline {
    recognizer: Arc<dyn TextRecognizer>,
    limits: CaptureLimits,
}

impl CapturePipeline {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, limits: CaptureLimits) -> Self {
        Self { recognizer, limits }
    }

    pub fn recognizer(&self) -> &Arc<dyn TextRecognizer> {
        &self.recognizer
    }

    pub async fn run(&self, bytes: Vec<u8>, filter: FilterMode) -> Result<CaptureOutcome> {
        let capture_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "capture",
            capture_id = %capture_id,
            filter = %filter,
            bytes = bytes.len()
        );

        self.run_inner(capture_id, bytes, filter)
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        capture_id: Uuid,
        bytes: Vec<u8>,
        filter: FilterMode,
    ) -> Result<CaptureOutcome> {
        let started = Instant::now();
        self.limits.check_bytes(&bytes)?;

        let limits = self.limits;
        let image = tokio::task::spawn_blocking(move || prepare(&bytes, filter, &limits))
            .await
            .map_err(|e| SnapError::Internal(format!("Image task panicked: {e}")))??;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Capture decoded, running recognition"
        );

        let text = self.recognizer.recognize(&image).await.map_err(|e| {
            tracing::error!(error = %e, backend = self.recognizer.backend_name(), "Recognition failed");
            e
        })?;

        let recognition = RecognitionResult::new(text);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            characters = recognition.stats.characters,
            lines = recognition.stats.lines,
            has_text = recognition.has_text(),
            elapsed_ms,
            "Capture processed"
        );

        Ok(CaptureOutcome {
            capture_id,
            filter,
            image,
            recognition,
            elapsed_ms,
            processed_at: Utc::now(),
        })
    }
}

/// The synchronous half of a run: decode → size checks → filter → RGB.
///
/// The minimum is checked again after downscaling, since a long thin
/// capture can shrink below it.
pub fn prepare(bytes: &[u8], filter: FilterMode, limits: &CaptureLimits) -> Result<PixelGrid> {
    let grid = imaging::decode(bytes)?;
    limits.check_dimensions(&grid)?;
    let grid = imaging::fit_within(grid, limits.max_dimension)?;
    limits.check_dimensions(&grid)?;
    let grid = filter.apply(grid);
    Ok(grid.into_order(ChannelOrder::Rgb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::sync::Mutex;

    struct ScriptedRecognizer {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<PixelGrid>>,
    }

    impl ScriptedRecognizer {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(reason.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextRecognizer for ScriptedRecognizer {
        async fn recognize(&self, image: &PixelGrid) -> Result<String> {
            self.seen.lock().unwrap().push(image.clone());
            self.reply.clone().map_err(SnapError::Recognition)
        }

        fn is_available(&self) -> bool {
            true
        }

        fn backend_name(&self) -> &str {
            "scripted"
        }
    }

    fn limits() -> CaptureLimits {
        CaptureLimits {
            max_upload_bytes: 1024 * 1024,
            min_dimension: 16,
            max_dimension: 4096,
        }
    }

    fn png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(rgb));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn test_unfiltered_run_passes_rgb_grid() {
        let recognizer = ScriptedRecognizer::replying("HELLO");
        let pipeline = CapturePipeline::new(recognizer.clone(), limits());

        let outcome = pipeline
            .run(png(32, 32, [10, 20, 30]), FilterMode::Unfiltered)
            .await
            .unwrap();

        assert_eq!(outcome.recognition.text, "HELLO");
        assert_eq!(outcome.recognition.stats.characters, 5);
        assert_eq!(outcome.recognition.stats.lines, 1);
        assert_eq!(outcome.image.order(), ChannelOrder::Rgb);
        assert_eq!(outcome.image.pixel(0, 0), Some([10, 20, 30]));
        assert!(outcome.elapsed_ms < 60_000, "elapsed {}", outcome.elapsed_ms);

        let seen = recognizer.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], outcome.image);
    }

    #[tokio::test]
    async fn test_filtered_run_inverts_before_recognition() {
        let recognizer = ScriptedRecognizer::replying("");
        let pipeline = CapturePipeline::new(recognizer.clone(), limits());

        let outcome = pipeline
            .run(png(20, 20, [255, 255, 255]), FilterMode::Filtered)
            .await
            .unwrap();

        assert_eq!(outcome.filter, FilterMode::Filtered);
        assert_eq!(outcome.image.pixel(5, 5), Some([0, 0, 0]));
        assert_eq!(recognizer.seen.lock().unwrap()[0].pixel(5, 5), Some([0, 0, 0]));
        assert!(!outcome.recognition.has_text());
    }

    #[tokio::test]
    async fn test_recognition_failure_propagates() {
        let pipeline = CapturePipeline::new(ScriptedRecognizer::failing("engine crashed"), limits());

        let err = pipeline
            .run(png(20, 20, [0, 0, 0]), FilterMode::Unfiltered)
            .await
            .unwrap_err();
        assert!(matches!(err, SnapError::Recognition(_)));
    }

    #[tokio::test]
    async fn test_decode_failure_skips_recognition() {
        let recognizer = ScriptedRecognizer::replying("never");
        let pipeline = CapturePipeline::new(recognizer.clone(), limits());

        let err = pipeline
            .run(b"definitely not a photo".to_vec(), FilterMode::Filtered)
            .await
            .unwrap_err();

        assert!(matches!(err, SnapError::Decode(_)));
        assert!(recognizer.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_capture_is_validation_error() {
        let pipeline = CapturePipeline::new(ScriptedRecognizer::replying(""), limits());
        let err = pipeline
            .run(Vec::new(), FilterMode::Filtered)
            .await
            .unwrap_err();
        assert!(matches!(err, SnapError::Validation(_)));
    }

    #[test]
    fn test_check_bytes_rejects_oversized() {
        let limits = CaptureLimits {
            max_upload_bytes: 4,
            ..limits()
        };
        let err = limits.check_bytes(&[0; 5]).unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert!(limits.check_bytes(&[0; 4]).is_ok());
    }

    #[test]
    fn test_prepare_rejects_tiny_images() {
        let err = prepare(&png(10, 40, [0, 0, 0]), FilterMode::Unfiltered, &limits()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("too small"), "{message}");
        assert!(message.contains("10x40"), "{message}");
    }

    #[test]
    fn test_prepare_accepts_minimum_size() {
        let grid = prepare(&png(16, 16, [1, 2, 3]), FilterMode::Unfiltered, &limits()).unwrap();
        assert_eq!(grid.dimensions(), (16, 16));
    }

    #[test]
    fn test_prepare_rejects_strips_that_shrink_below_minimum() {
        let limits = CaptureLimits {
            max_dimension: 64,
            ..limits()
        };
        let err = prepare(&png(256, 16, [0, 0, 0]), FilterMode::Unfiltered, &limits).unwrap_err();
        assert!(matches!(err, SnapError::Validation(_)));
        assert!(err.to_string().contains("64x4"), "{err}");
    }

    #[test]
    fn test_prepare_downscales_large_captures() {
        let limits = CaptureLimits {
            max_dimension: 64,
            ..limits()
        };
        let grid = prepare(&png(256, 128, [50, 50, 50]), FilterMode::Unfiltered, &limits).unwrap();
        assert_eq!(grid.dimensions(), (64, 32));
    }
}
