use std::sync::Arc;

use crate::config::Config;
use crate::ocr::TextRecognizer;
use crate::pipeline::{CaptureLimits, CapturePipeline};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: CapturePipeline,
}

impl AppState {
    pub fn new(config: Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        let limits = CaptureLimits::from_config(&config.capture, &config.ocr);
        let pipeline = CapturePipeline::new(recognizer, limits);

        Self {
            config: Arc::new(config),
            pipeline,
        }
    }

    pub fn recognizer(&self) -> &Arc<dyn TextRecognizer> {
        self.pipeline.recognizer()
    }
}
