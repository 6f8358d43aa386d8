use alloc::{vec, vec::Vec};

/// A read cursor over a byte slice that refuses to read garbage.
///
/// Reads either hand back exactly as many bytes as were asked for, or they
/// fail. There are no partial reads. The [`advance_guaranteed`] variant
/// converts failure into a zero-filled stand-in buffer instead, which lets a
/// parser for a fixed layout be written as straight-line code: a truncated
/// input simply parses as zeros.
///
/// [`advance_guaranteed`]: ByteCursor::advance_guaranteed
pub struct ByteCursor<'b> {
  bytes: &'b [u8],
  pos: usize,
  surrogates: Vec<Vec<u8>>,
}

impl<'b> ByteCursor<'b> {
  #[inline]
  #[must_use]
  pub const fn new(bytes: &'b [u8]) -> Self {
    Self { bytes, pos: 0, surrogates: Vec::new() }
  }

  /// Tries to read the next `count` bytes.
  ///
  /// * `Some(view)`: the cursor advances and you get exactly `count` bytes,
  ///   borrowed from the underlying slice.
  /// * `None`: the request would have run off the end (or `count` was 0),
  ///   and the cursor did not move.
  #[inline]
  pub fn advance(&mut self, count: usize) -> Option<&'b [u8]> {
    if count == 0 {
      return None;
    }
    let end = self.pos.checked_add(count)?;
    if end <= self.bytes.len() {
      let out = &self.bytes[self.pos..end];
      self.pos = end;
      Some(out)
    } else {
      None
    }
  }

  /// Like [`advance`](ByteCursor::advance), but a failed read returns a
  /// zero-filled buffer of the requested length instead of `None`.
  ///
  /// The stand-in buffers are owned by the cursor and live until it's
  /// dropped, so the returned view is usable for as long as you'd expect.
  /// Intended for small fixed-size fields; don't hand this a length you got
  /// from untrusted data.
  #[inline]
  pub fn advance_guaranteed(&mut self, count: usize) -> &[u8] {
    if let Some(bytes) = self.advance(count) {
      return bytes;
    }
    self.surrogates.push(vec![0; count]);
    self.surrogates.last().unwrap()
  }
}
