use image::imageops::FilterType;

use super::grid::{ChannelOrder, PixelGrid};
use crate::error::Result;

/// Replace every channel value `v` with `255 - v`. Channel order is kept.
pub fn invert(grid: &PixelGrid) -> PixelGrid {
    grid.clone().inverted()
}

/// Copy of `grid` with its channels laid out in `to` order.
pub fn convert_channel_order(grid: &PixelGrid, to: ChannelOrder) -> PixelGrid {
    grid.clone().into_order(to)
}

/// Downscale so neither side exceeds `max_dimension`, keeping the aspect
/// ratio. Grids already within bounds are returned untouched.
pub fn fit_within(grid: PixelGrid, max_dimension: u32) -> Result<PixelGrid> {
    let (width, height) = grid.dimensions();
    if max_dimension == 0 || (width <= max_dimension && height <= max_dimension) {
        return Ok(grid);
    }

    let ratio = if width > height {
        max_dimension as f32 / width as f32
    } else {
        max_dimension as f32 / height as f32
    };
    let new_width = ((width as f32 * ratio) as u32).clamp(1, max_dimension);
    let new_height = ((height as f32 * ratio) as u32).clamp(1, max_dimension);

    tracing::debug!(
        from = %format!("{width}x{height}"),
        to = %format!("{new_width}x{new_height}"),
        "Downscaling capture"
    );

    // Lanczos works per channel, so BGR data can be resized as if it were RGB.
    let (order, buffer) = grid.into_buffer()?;
    let resized = image::imageops::resize(&buffer, new_width, new_height, FilterType::Lanczos3);
    Ok(PixelGrid::from_rgb_image(resized).with_order(order))
}

impl PixelGrid {
    pub fn inverted(self) -> PixelGrid {
        self.map_bytes(|data| {
            for v in data.iter_mut() {
                *v = 255 - *v;
            }
        })
    }

    pub fn into_order(self, to: ChannelOrder) -> PixelGrid {
        if self.order() == to {
            return self;
        }
        self.map_bytes(|data| {
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        })
        .with_order(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelGrid {
        let data = (0..width * height * 3).map(|i| (i % 256) as u8).collect();
        PixelGrid::from_raw(width, height, ChannelOrder::Bgr, data).unwrap()
    }

    #[test]
    fn test_invert_every_channel() {
        let grid = gradient(10, 10);
        let inverted = invert(&grid);

        assert_eq!(inverted.order(), ChannelOrder::Bgr);
        for (orig, inv) in grid.as_bytes().iter().zip(inverted.as_bytes()) {
            assert_eq!(*inv, 255 - *orig);
        }
    }

    #[test]
    fn test_double_inversion_is_identity() {
        let grid = gradient(17, 9);
        assert_eq!(invert(&invert(&grid)), grid);
    }

    #[test]
    fn test_invert_extremes() {
        let white = PixelGrid::filled(2, 2, ChannelOrder::Bgr, [255, 255, 255]);
        assert_eq!(invert(&white).pixel(1, 1), Some([0, 0, 0]));

        let mid = PixelGrid::filled(1, 1, ChannelOrder::Bgr, [0, 128, 127]);
        assert_eq!(invert(&mid).pixel(0, 0), Some([255, 127, 128]));
    }

    #[test]
    fn test_convert_bgr_to_rgb_swaps_outer_channels() {
        let grid = PixelGrid::filled(3, 3, ChannelOrder::Bgr, [1, 2, 3]);
        let rgb = convert_channel_order(&grid, ChannelOrder::Rgb);

        assert_eq!(rgb.order(), ChannelOrder::Rgb);
        assert_eq!(rgb.pixel(1, 1), Some([3, 2, 1]));
    }

    #[test]
    fn test_convert_same_order_is_noop() {
        let grid = gradient(4, 4).into_order(ChannelOrder::Rgb);
        let same = convert_channel_order(&grid, ChannelOrder::Rgb);
        assert_eq!(same, grid);
    }

    #[test]
    fn test_convert_round_trip() {
        let grid = gradient(5, 7);
        let back = grid
            .clone()
            .into_order(ChannelOrder::Rgb)
            .into_order(ChannelOrder::Bgr);
        assert_eq!(back, grid);
    }

    #[test]
    fn test_fit_within_leaves_small_grids() {
        let grid = gradient(100, 50);
        let fitted = fit_within(grid.clone(), 100).unwrap();
        assert_eq!(fitted, grid);
    }

    #[test]
    fn test_fit_within_wide() {
        let grid = PixelGrid::filled(2000, 500, ChannelOrder::Bgr, [9, 9, 9]);
        let fitted = fit_within(grid, 1000).unwrap();

        assert_eq!(fitted.dimensions(), (1000, 250));
        assert_eq!(fitted.order(), ChannelOrder::Bgr);
    }

    #[test]
    fn test_fit_within_tall() {
        let grid = PixelGrid::filled(500, 2000, ChannelOrder::Rgb, [9, 9, 9]);
        let fitted = fit_within(grid, 1000).unwrap();
        assert_eq!(fitted.dimensions(), (250, 1000));
    }

    #[test]
    fn test_fit_within_keeps_solid_color() {
        let grid = PixelGrid::filled(400, 400, ChannelOrder::Bgr, [10, 200, 30]);
        let fitted = fit_within(grid, 100).unwrap();
        let px = fitted.pixel(50, 50).unwrap();
        for (got, want) in px.iter().zip([10u8, 200, 30]) {
            assert!(got.abs_diff(want) <= 1, "expected ~{want}, got {got}");
        }
    }
}
