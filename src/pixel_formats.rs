//! The one pixel format this crate produces.

use bytemuck::{Pod, Zeroable};

/// RGBA, 8 bits per channel, alpha not premultiplied.
///
/// The all-zero value is transparent black, which is what every pixel of an
/// image starts as before decoded data lands on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl RGBA8 {
  /// An opaque gray pixel: `y` in all three color channels, alpha 255.
  #[inline]
  #[must_use]
  pub const fn opaque_y(y: u8) -> Self {
    Self { r: y, g: y, b: y, a: 255 }
  }
}
