use async_trait::async_trait;

use crate::error::Result;
use crate::imaging::PixelGrid;

/// Anything that can turn a captured grid into text.
///
/// Implementations accept grids in either channel order and convert to RGB
/// themselves. The returned string is the engine's raw output: it may be
/// empty and is never trimmed.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &PixelGrid) -> Result<String>;

    fn is_available(&self) -> bool;

    /// Short label for health reports and logs (`tesseract`, `openai`, ...).
    fn backend_name(&self) -> &str;
}
