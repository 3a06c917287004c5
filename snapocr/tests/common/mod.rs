// Shared helpers for integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use snapocr::error::{Result, SnapError};
use snapocr::imaging::PixelGrid;
use snapocr::ocr::TextRecognizer;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Encode a solid-colour RGB image as PNG.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode(RgbImage::from_pixel(width, height, Rgb(rgb)), ImageFormat::Png)
}

/// A white page with a black band across the middle, as JPEG.
pub fn banded_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |_, y| {
        if y >= height / 3 && y < 2 * height / 3 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    encode(img, ImageFormat::Jpeg)
}

/// Pseudo-random pixels; PNG cannot compress them, so the file stays close
/// to `width * height * 3` bytes.
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut channel = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        };
        Rgb([channel(), channel(), channel()])
    });
    encode(img, ImageFormat::Png)
}

fn encode(img: RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), format)
        .expect("encode test image");
    out
}

/// Recognizer that answers every image with the same text and keeps what it saw.
pub struct StubRecognizer {
    reply: Option<String>,
    seen: Mutex<Vec<PixelGrid>>,
}

impl StubRecognizer {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like a server with no OCR engine installed.
    pub fn unavailable() -> Self {
        Self {
            reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<PixelGrid> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextRecognizer for StubRecognizer {
    async fn recognize(&self, image: &PixelGrid) -> Result<String> {
        self.seen.lock().unwrap().push(image.clone());
        self.reply
            .clone()
            .ok_or_else(|| SnapError::RecognitionUnavailable("no engine in tests".to_string()))
    }

    fn is_available(&self) -> bool {
        self.reply.is_some()
    }

    fn backend_name(&self) -> &str {
        "stub"
    }
}

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use wiremock;
