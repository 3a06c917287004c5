pub mod api;
pub mod config;
pub mod error;
pub mod imaging;
pub mod ocr;
pub mod pipeline;
