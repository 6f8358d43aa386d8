//! The chunk dispatcher and the top-level decode entry point.

use alloc::{vec, vec::Vec};

use crate::{expand::expand_row, inflate::decompress_to_vec_zlib};

use super::*;

/// Everything the chunk stream accumulates on its way to pixels.
struct ImageState {
  header: Option<PngHeader>,
  /// Always all 256 entries: unset ones stay zero RGB with alpha 255, and
  /// that's also what out-of-range palette indexes hit.
  palette: [RGBA8; 256],
  transparent_y: Option<u16>,
  transparent_rgb: Option<[u16; 3]>,
  /// Every `IDAT` payload, concatenated in file order. Payloads are slices
  /// of the source file, so this never outgrows the reserved source length.
  idata: Vec<u8>,
  /// Allocated (zeroed) once the header arrives. `None` afterward means
  /// the allocation failed.
  pixels: Option<Vec<RGBA8>>,
}

impl ImageState {
  fn new(source_len: usize) -> Self {
    let mut idata = Vec::new();
    // best effort: if this fails the extends below just don't happen.
    let _ = idata.try_reserve(source_len);
    Self {
      header: None,
      palette: [RGBA8 { r: 0, g: 0, b: 0, a: 255 }; 256],
      transparent_y: None,
      transparent_rgb: None,
      idata,
      pixels: None,
    }
  }

  fn process_chunk(&mut self, chunk: &PngChunk<'_>) {
    match chunk.chunk_type {
      ChunkType::IHDR => {
        let header = PngHeader::from_chunk(chunk);
        trace!("IHDR: {header:?}");
        self.pixels = None;
        if let Some(count) = (header.width as usize).checked_mul(header.height as usize) {
          let mut pixels: Vec<RGBA8> = Vec::new();
          if pixels.try_reserve_exact(count).is_ok() {
            pixels.resize(count, RGBA8::default());
            self.pixels = Some(pixels);
          }
        }
        self.header = Some(header);
      }
      ChunkType::PLTE => {
        for (entry, rgb) in self.palette.iter_mut().zip(chunk.data.chunks_exact(3)) {
          entry.r = rgb[0];
          entry.g = rgb[1];
          entry.b = rgb[2];
        }
      }
      ChunkType::IDAT => {
        if self.idata.try_reserve(chunk.data.len()).is_ok() {
          self.idata.extend_from_slice(chunk.data);
        }
      }
      ChunkType::tRNS => {
        let color_type = match self.header {
          Some(header) => header.color_type,
          None => return,
        };
        match color_type {
          PngColorType::INDEX => {
            for (entry, &a) in self.palette.iter_mut().zip(chunk.data.iter()) {
              entry.a = a;
            }
          }
          PngColorType::Y => {
            let mut cursor = ByteCursor::new(chunk.data);
            let y = u16::from_be_bytes(cursor.advance_guaranteed(2).try_into().unwrap());
            self.transparent_y = Some(y);
          }
          PngColorType::RGB => {
            let mut cursor = ByteCursor::new(chunk.data);
            let r = u16::from_be_bytes(cursor.advance_guaranteed(2).try_into().unwrap());
            let g = u16::from_be_bytes(cursor.advance_guaranteed(2).try_into().unwrap());
            let b = u16::from_be_bytes(cursor.advance_guaranteed(2).try_into().unwrap());
            self.transparent_rgb = Some([r, g, b]);
          }
          _ => (),
        }
      }
      ChunkType::IEND => self.finish(),
      // every other chunk type was already skipped over by the reader.
      _ => (),
    }
  }

  /// The `IEND` pipeline: inflate, reconstruct, expand.
  ///
  /// Bails silently wherever it can't continue, leaving however much of the
  /// (zero initialized) pixel buffer got filled in.
  fn finish(&mut self) {
    let header = match self.header {
      Some(header) => header,
      None => return,
    };
    if header.compression_method != 0 {
      return;
    }
    let pixels = match self.pixels.as_mut() {
      Some(pixels) => pixels,
      None => return,
    };
    let width = header.width as usize;
    if width == 0 || header.height == 0 {
      return;
    }
    let raw = match decompress_to_vec_zlib(&self.idata) {
      Ok(raw) => raw,
      Err(status) => {
        trace!("IDAT inflate failed: {status:?}");
        return;
      }
    };
    trace!("inflated {count} bytes of filtered scanlines", count = raw.len());

    let row_bytes = header.bytes_per_row();
    let bpp = header.bytes_per_pixel();
    let mut prev_row = vec![0_u8; row_bytes];
    let mut this_row = vec![0_u8; row_bytes];
    let mut expanded = vec![RGBA8::default(); width];
    let mut cursor = ByteCursor::new(&raw);
    for row_pixels in pixels.chunks_exact_mut(width) {
      let filter = cursor.advance_guaranteed(1)[0];
      let src = match cursor.advance(row_bytes) {
        Some(src) => src,
        // the inflated data ran out mid-image; later rows stay blank.
        None => break,
      };
      this_row.copy_from_slice(src);
      reconstruct_row(filter, bpp, &prev_row, &mut this_row);
      expand_row(
        &header,
        &self.palette,
        self.transparent_y,
        self.transparent_rgb,
        &this_row,
        &mut expanded,
      );
      row_pixels.copy_from_slice(&expanded);
      core::mem::swap(&mut prev_row, &mut this_row);
    }
  }
}

/// Decodes a PNG file's bytes into an RGBA8 [`Bitmap`].
///
/// The contract is all-or-something: an `Err` means no image at all could
/// be produced (not a PNG, no header, or no memory), while any other damage
/// to the file yields `Ok` with an image of the declared size in which the
/// unreachable parts are transparent black.
pub fn decode_png_to_rgba8(png: &[u8]) -> PngResult<Bitmap> {
  let mut cursor = ByteCursor::new(png);
  if cursor.advance_guaranteed(8) != &PNG_SIGNATURE[..] {
    return Err(PngError::NoPngSignature);
  }
  let mut state = ImageState::new(png.len());
  loop {
    let chunk = read_chunk(&mut cursor);
    trace!("chunk: {chunk:?}");
    let ended = chunk.chunk_type == ChunkType::IEND;
    state.process_chunk(&chunk);
    if ended {
      break;
    }
  }
  let header = state.header.ok_or(PngError::NoHeaderChunk)?;
  match state.pixels {
    Some(pixels) => Ok(Bitmap { width: header.width, height: header.height, pixels }),
    None => Err(PngError::AllocationFailed),
  }
}
