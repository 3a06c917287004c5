use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SnapError};

/// Byte order of the three channels inside each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Blue, green, red. What the decoder hands back.
    Bgr,
    /// Red, green, blue. What the OCR engine and the browser expect.
    Rgb,
}

impl std::fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bgr => write!(f, "BGR"),
            Self::Rgb => write!(f, "RGB"),
        }
    }
}

/// A decoded capture: `height` rows of `width` pixels, three bytes per pixel,
/// stored row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
}

impl PixelGrid {
    /// Wrap an existing buffer. Fails if its length is not `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Result<Self> {
        match expected_len(width, height) {
            Some(len) if len == data.len() => Ok(Self {
                width,
                height,
                order,
                data,
            }),
            Some(len) => Err(SnapError::Internal(format!(
                "pixel buffer for {width}x{height} must hold {len} bytes, got {}",
                data.len()
            ))),
            None => Err(SnapError::Internal(format!(
                "pixel grid {width}x{height} is too large to address"
            ))),
        }
    }

    /// A grid where every pixel holds `pixel`, interpreted in `order`.
    pub fn filled(width: u32, height: u32, order: ChannelOrder, pixel: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let data = pixel.iter().copied().cycle().take(count * 3).collect();
        Self {
            width,
            height,
            order,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The three channel bytes at `(x, y)` in the grid's own order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.data.get(offset..offset + 3)?;
        Some([px[0], px[1], px[2]])
    }

    pub(crate) fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            order: ChannelOrder::Rgb,
            data: img.into_raw(),
        }
    }

    /// Same buffer, reinterpreted as an `RgbImage` without touching channel
    /// order. Callers that need real RGB must convert first.
    pub(crate) fn into_buffer(self) -> Result<(ChannelOrder, RgbImage)> {
        let order = self.order;
        let (width, height) = self.dimensions();
        RgbImage::from_raw(width, height, self.data)
            .map(|img| (order, img))
            .ok_or_else(|| {
                SnapError::Internal(format!("pixel buffer does not match {width}x{height}"))
            })
    }

    pub(crate) fn map_bytes(self, f: impl Fn(&mut [u8])) -> Self {
        let mut data = self.data;
        f(&mut data);
        Self { data, ..self }
    }

    pub(crate) fn with_order(self, order: ChannelOrder) -> Self {
        Self { order, ..self }
    }
}
