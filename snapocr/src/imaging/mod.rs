//! Image codec layer.
//!
//! Turns the encoded bytes of a camera capture into a [`PixelGrid`] and
//! provides the pixel-level operations the capture pipeline needs:
//!
//! - [`decode`]: encoded bytes → BGR grid, or [`SnapError::Decode`](crate::error::SnapError::Decode)
//! - [`invert`]: `v` → `255 - v` on every channel
//! - [`convert_channel_order`]: BGR ↔ RGB
//! - [`fit_within`]: bound the grid size before recognition
//! - [`encode_png`] / [`to_data_url`]: hand the processed grid to the browser

mod codec;
mod grid;
mod transform;

pub use codec::{decode, encode_png, to_data_url};
pub use grid::{ChannelOrder, PixelGrid};
pub use transform::{convert_channel_order, fit_within, invert};
