use super::*;

/// The PNG color type byte.
///
/// Values other than the five defined ones are kept as-is: the decoder
/// doesn't reject them, it just never produces pixels for them.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PngColorType(pub u8);
impl PngColorType {
  pub const Y: Self = Self(0);
  pub const RGB: Self = Self(2);
  pub const INDEX: Self = Self(3);
  pub const YA: Self = Self(4);
  pub const RGBA: Self = Self(6);
}
impl core::fmt::Debug for PngColorType {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match *self {
      PngColorType::Y => write!(f, "Y"),
      PngColorType::RGB => write!(f, "RGB"),
      PngColorType::INDEX => write!(f, "Index"),
      PngColorType::YA => write!(f, "YA"),
      PngColorType::RGBA => write!(f, "RGBA"),
      other => write!(f, "Illegal({})", other.0),
    }
  }
}

/// The fields of an `IHDR` chunk.
#[derive(Debug, Clone, Copy)]
pub struct PngHeader {
  pub width: u32,
  pub height: u32,
  /// Bits per channel (1, 2, 4, 8, or 16 in a legal file).
  pub bit_depth: u8,
  pub color_type: PngColorType,
  /// Must be 0 (zlib/DEFLATE) for pixel data to be produced.
  pub compression_method: u8,
  pub filter_method: u8,
  /// 0 is linear, 1 is Adam7. Interlaced data is read through the same
  /// linear row loop, so interlaced output is approximate.
  pub interlace_method: u8,
}

#[cfg(feature = "alloc")]
impl PngHeader {
  /// Parses header fields out of an `IHDR` payload.
  ///
  /// Parsing goes through the zero-filling cursor path, so a short payload
  /// gives zeroed fields rather than a failure. Zero width or height just
  /// means an empty image later on.
  pub fn from_chunk(chunk: &PngChunk<'_>) -> Self {
    let mut cursor = ByteCursor::new(chunk.data);
    let width = u32::from_be_bytes(cursor.advance_guaranteed(4).try_into().unwrap());
    let height = u32::from_be_bytes(cursor.advance_guaranteed(4).try_into().unwrap());
    let bit_depth = cursor.advance_guaranteed(1)[0];
    let color_type = PngColorType(cursor.advance_guaranteed(1)[0]);
    let compression_method = cursor.advance_guaranteed(1)[0];
    let filter_method = cursor.advance_guaranteed(1)[0];
    let interlace_method = cursor.advance_guaranteed(1)[0];
    Self {
      width,
      height,
      bit_depth,
      color_type,
      compression_method,
      filter_method,
      interlace_method,
    }
  }
}

impl PngHeader {
  /// Bits of channel data per pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    let mut bits = self.bit_depth as usize;
    // R, G, and B each carry a full channel.
    if self.color_type.0 == 2 || self.color_type.0 == 6 {
      bits *= 3;
    }
    // alpha channel.
    if self.color_type.0 & 4 != 0 {
      bits += self.bit_depth as usize;
    }
    bits
  }

  /// The byte stride used by the Sub/Average/Paeth filters, minimum 1.
  #[inline]
  #[must_use]
  pub const fn bytes_per_pixel(&self) -> usize {
    let bits = self.bits_per_pixel();
    if bits < 8 {
      1
    } else {
      bits / 8
    }
  }

  /// Bytes in one scanline of raw (filtered) data, minimum 1, not counting
  /// the filter byte.
  #[inline]
  #[must_use]
  pub const fn bytes_per_row(&self) -> usize {
    let bits = self.bits_per_pixel().saturating_mul(self.width as usize);
    if bits < 8 {
      1
    } else {
      bits / 8 + (bits % 8 != 0) as usize
    }
  }
}
