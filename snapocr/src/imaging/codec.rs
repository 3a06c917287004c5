use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::grid::{ChannelOrder, PixelGrid};
use super::transform::convert_channel_order;
use crate::error::{Result, SnapError};

/// Decode an encoded still image (JPEG, PNG, WebP, ...) into a BGR grid.
///
/// Every color type is flattened to three 8-bit channels; alpha is dropped.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    if bytes.is_empty() {
        return Err(SnapError::Decode("capture is empty".to_string()));
    }

    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(SnapError::Decode(format!(
                "expected an image, got {}",
                kind.mime_type()
            )));
        }
    }

    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SnapError::Decode(format!("failed to read image: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| SnapError::Decode(e.to_string()))?;

    let rgb = PixelGrid::from_rgb_image(img.to_rgb8());
    Ok(rgb.into_order(ChannelOrder::Bgr))
}

/// Encode a grid as an RGB PNG, converting from BGR when needed.
pub fn encode_png(grid: &PixelGrid) -> Result<Vec<u8>> {
    let rgb = convert_channel_order(grid, ChannelOrder::Rgb);
    let (_, buffer) = rgb.into_buffer()?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| SnapError::Internal(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// `data:image/png;base64,...` for embedding the processed capture in a page.
pub fn to_data_url(grid: &PixelGrid) -> Result<String> {
    let png = encode_png(grid)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
