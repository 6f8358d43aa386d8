#![cfg_attr(not(feature = "trace"), no_std)]
#![forbid(unsafe_code)]

//! A tiny PNG decoder.
//!
//! Feed [`decode_png_to_rgba8`] the bytes of a PNG file and you get back a
//! [`Bitmap`] of 8-bit RGBA pixels (row-major, top-left origin, alpha not
//! premultiplied), or an error if no image at all could be produced.
//!
//! The decoder is deliberately forgiving: only a bad PNG signature, a file
//! with no header chunk, or a failed allocation abort the decode. Everything
//! else (truncated chunks, lying length fields, corrupt compressed data, a
//! mangled tail) degrades to transparent black pixels wherever the data ran
//! out, so you always get an image of the declared size back.
//!
//! The DEFLATE/zlib decompressor lives in the [`inflate`] module and can be
//! used on its own for non-PNG zlib data.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "trace")]
extern crate std;

#[macro_export]
macro_rules! trace {
  ($($arg:tt)*) => {
    #[cfg(feature = "trace")] {
      ::std::print!("{file}:{line}> ", file = file!(), line = line!());
      ::std::println!($($arg)*);
    }
  }
}

#[cfg(feature = "alloc")]
mod byte_cursor;
#[cfg(feature = "alloc")]
pub use byte_cursor::*;

#[cfg(feature = "alloc")]
mod chunk;
#[cfg(feature = "alloc")]
pub use chunk::*;

mod png_header;
pub use png_header::*;

mod pixel_formats;
pub use pixel_formats::*;

#[cfg(feature = "alloc")]
mod image;
#[cfg(feature = "alloc")]
pub use image::*;

mod filtering;
pub use filtering::*;

#[cfg(feature = "alloc")]
mod expand;

pub mod inflate;

#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
pub use decode::*;

pub type PngResult<T> = Result<T, PngError>;

/// Things that stop the decoder from handing back any image at all.
///
/// Most damage a PNG can suffer does *not* show up here: the decoder patches
/// over it and returns a best-effort image instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PngError {
  /// The first eight bytes weren't the PNG signature, so this isn't a PNG.
  NoPngSignature,
  /// The chunk stream ended without an `IHDR` ever showing up, so the
  /// image's dimensions are unknown.
  NoHeaderChunk,
  /// The allocator couldn't give us room for the pixel buffer.
  AllocationFailed,
}
