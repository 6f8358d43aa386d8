use super::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
}
impl core::fmt::Debug for ChunkType {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let [a, b, c, d] = self.0;
    write!(f, "{}{}{}{}", a as char, b as char, c as char, d as char)
  }
}

/// One record out of a PNG's chunk stream.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PngChunk<'b> {
  /// Declared payload length, clamped to 0 when the file can't back it up.
  pub length: u32,
  pub chunk_type: ChunkType,
  /// Exactly `length` bytes.
  pub data: &'b [u8],
  /// Parsed but never verified.
  pub declared_crc: u32,
}
impl core::fmt::Debug for PngChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("PngChunk")
      .field("chunk_type", &self.chunk_type)
      .field("length", &self.length)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}

/// Reads the next chunk record off the cursor.
///
/// This can't fail: every field parses through the cursor's zero-filling
/// path, so truncation and corruption show up as defused values instead.
/// * A declared length the remaining file can't cover is rewritten to 0 and
///   the payload comes back empty.
/// * A type field of four zero bytes (what you read when the stream ended
///   mid-chunk) is rewritten to `IEND`, which terminates the chunk loop.
pub fn read_chunk<'b>(cursor: &mut ByteCursor<'b>) -> PngChunk<'b> {
  let mut length = u32::from_be_bytes(cursor.advance_guaranteed(4).try_into().unwrap());
  let type_bytes: [u8; 4] = cursor.advance_guaranteed(4).try_into().unwrap();
  let data: &'b [u8] = match cursor.advance(length as usize) {
    Some(data) => data,
    None => {
      // the length field was lying.
      length = 0;
      &[]
    }
  };
  let declared_crc = u32::from_be_bytes(cursor.advance_guaranteed(4).try_into().unwrap());
  let chunk_type =
    if type_bytes == [0, 0, 0, 0] { ChunkType::IEND } else { ChunkType(type_bytes) };
  PngChunk { length, chunk_type, data, declared_crc }
}
