use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, SnapError};
use crate::imaging::{encode_png, PixelGrid};

use super::api::{VisionOcrClient, VisionProvider};
use super::recognizer::TextRecognizer;

#[derive(Clone)]
enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Api { client: VisionOcrClient },
    Unavailable { reason: String },
}

/// OCR engine selected from `OCR_MODEL`.
///
/// `local/...` (or no prefix) loads Tesseract through leptess; `openai/...`,
/// `mistral/...` and `deepseek/...` call the hosted vision model. When the
/// chosen engine cannot start, the provider still builds but reports itself
/// unavailable and every recognition fails with `RecognitionUnavailable`.
#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(languages: &str) -> std::result::Result<LepTess, String> {
    LepTess::new(None, languages).map_err(|e| e.to_string())
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (prefix, model) = config
            .model
            .split_once('/')
            .unwrap_or((config.model.as_str(), ""));

        let backend = match VisionProvider::from_prefix(prefix) {
            Some(provider) => match VisionOcrClient::new(provider, model, config) {
                Ok(client) => {
                    info!(
                        provider = provider.name(),
                        model = client.model(),
                        "Vision OCR API backend initialized"
                    );
                    OcrBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("{} OCR backend unavailable: {e}", provider.name());
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            None => match create_tesseract(&config.languages) {
                Ok(lt) => {
                    info!(languages = %config.languages, "Tesseract OCR initialized");
                    OcrBackend::Local {
                        tesseract: Arc::new(Mutex::new(lt)),
                    }
                }
                Err(e) => {
                    let reason = format!("Tesseract not available: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            OcrBackend::Unavailable { reason } => Some(reason),
            _ => None,
        }
    }

    async fn ocr_internal(&self, png: Vec<u8>) -> Result<String> {
        match &self.backend {
            OcrBackend::Local { tesseract } => {
                let tesseract = Arc::clone(tesseract);

                tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&png)
                        .map_err(|e| SnapError::Recognition(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text().map_err(|e| {
                        SnapError::Recognition(format!("Failed to extract text: {e}"))
                    })
                })
                .await
                .map_err(|e| SnapError::Recognition(format!("OCR task panicked: {e}")))?
            }
            OcrBackend::Api { client } => client.ocr(&png).await,
            OcrBackend::Unavailable { reason } => {
                Err(SnapError::RecognitionUnavailable(reason.clone()))
            }
        }
    }
}

#[async_trait]
impl TextRecognizer for OcrProvider {
    async fn recognize(&self, image: &PixelGrid) -> Result<String> {
        if let OcrBackend::Unavailable { reason } = &self.backend {
            return Err(SnapError::RecognitionUnavailable(reason.clone()));
        }

        let png = encode_png(image)?;
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout_duration, self.ocr_internal(png)).await {
            Ok(inner_result) => inner_result,
            Err(_) => Err(SnapError::Recognition(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    fn backend_name(&self) -> &str {
        match &self.backend {
            OcrBackend::Local { .. } => "tesseract",
            OcrBackend::Api { client } => client.provider().name(),
            OcrBackend::Unavailable { .. } => "unavailable",
        }
    }
}
