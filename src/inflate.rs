//! A resumable DEFLATE (RFC 1951) decompressor with an optional zlib
//! (RFC 1950) wrapper.
//!
//! The decompressor is written the way a coroutine would be in a language
//! with one: [`Inflater`] holds an enumeration of resume points plus every
//! local that has to survive a suspension, and [`decompress`] re-enters by
//! dispatching on the saved resume point. A suspension happens whenever the
//! machine needs another input byte it doesn't have, or another output byte
//! it has nowhere to put, so input and output can be split across calls at
//! any byte boundary.
//!
//! For one-shot use there's [`decompress_to_vec_zlib`] /
//! [`decompress_to_vec`], which grow a heap buffer until the stream is done.

mod huffman;
use huffman::*;

/// Flag bits for [`decompress`].
pub mod inflate_flags {
  /// The input starts with a 2-byte zlib header and ends with an adler-32
  /// checksum of the decompressed bytes, which will be verified.
  pub const PARSE_ZLIB_HEADER: u32 = 1;
  /// More input bytes exist beyond the buffer you passed. When clear,
  /// running dry is final: the machine reports
  /// [`FailedCannotMakeProgress`](super::InflateStatus::FailedCannotMakeProgress)
  /// instead of [`NeedsMoreInput`](super::InflateStatus::NeedsMoreInput).
  pub const HAS_MORE_INPUT: u32 = 2;
  /// The output buffer is big enough for the whole decompressed stream.
  /// When clear, the output buffer is instead a power-of-two sized sliding
  /// window (32 KiB covers any stream) that back-references index modulo
  /// its length.
  pub const USING_NON_WRAPPING_OUTPUT_BUF: u32 = 4;
  /// Compute the adler-32 of the output even without a zlib wrapper.
  pub const COMPUTE_ADLER32: u32 = 8;
}

/// What a [`decompress`] call has to say for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InflateStatus {
  /// The machine needs input to go on, but the flags promised there is none
  /// left. The stream is truncated or corrupt.
  FailedCannotMakeProgress,
  /// The output buffer arrangement was unusable (a wrapping window that
  /// isn't a power of two, or a start position past the end).
  BadParam,
  /// The stream decompressed fully but its zlib checksum didn't match.
  /// The state is terminal, like `Done`.
  Adler32Mismatch,
  /// The stream is corrupt. The state is stuck here; further calls keep
  /// returning `Failed`.
  Failed,
  /// Every byte of the stream has been decompressed (and the checksum, if
  /// requested, matched). Further calls return `Done` again.
  Done,
  /// Call again with more input.
  NeedsMoreInput,
  /// There's more decompressed data than output space; call again with
  /// room to write.
  HasMoreOutput,
}
impl InflateStatus {
  /// `true` for the statuses that mean the stream can't finish.
  #[inline]
  #[must_use]
  pub const fn is_failure(self) -> bool {
    matches!(
      self,
      Self::FailedCannotMakeProgress | Self::BadParam | Self::Adler32Mismatch | Self::Failed
    )
  }
}

/// Where to pick up again when [`decompress`] is re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Start,
  ZlibCmf,
  ZlibFlg,
  BlockHeader,
  StoredHeader,
  StoredBody,
  DynTableSizes,
  DynCodeSizeCodes,
  DynCodeLengths,
  DynCodeLengthExtra,
  LitLen,
  PushLiteral,
  LengthExtra,
  Distance,
  DistanceExtra,
  CopyBackref,
  ContinueCopy,
  TrailerAlign,
  TrailerAdler,
  DoneForever,
  FailedForever,
}

/// Length-code base values and extra bit counts, RFC 1951 section 3.2.5.
/// Codes 286 and 287 never occur in a valid stream; their zero entries make
/// them decode as zero-length matches, which copy nothing.
const LENGTH_BASE: [u16; 31] = [
  3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
  163, 195, 227, 258, 0, 0,
];
const LENGTH_EXTRA: [u32; 31] =
  [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0, 0, 0];

/// Distance-code base values and extra bit counts, same section.
const DIST_BASE: [u16; 32] = [
  1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
  2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577, 0, 0,
];
const DIST_EXTRA: [u32; 32] = [
  0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
  13, 0, 0,
];

/// The order code-length code lengths arrive in, RFC 1951 section 3.2.7.
const LENGTH_DEZIGZAG: [usize; 19] =
  [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// The whole state of a suspended decompression.
///
/// Fresh from [`Inflater::new`] it's ready to start a stream; after `Done`
/// (or `Failed`) it's terminal until [`init`](Inflater::init) resets it.
pub struct Inflater {
  mode: Mode,
  bit_buf: u32,
  num_bits: u32,
  final_block: bool,
  /// General purpose countdown/index for whichever `mode` is current.
  counter: usize,
  num_extra: u32,
  dist: usize,
  table_sizes: [usize; 3],
  raw_header: [u8; 4],
  zlib_header: [u8; 2],
  check_adler32: u32,
  z_adler32: u32,
  dist_from_out_start: usize,
  /// Scratch for dynamic-block code lengths: sized so the largest legal
  /// run-length op starting at the last legal position still fits.
  len_codes: [u8; MAX_HUFF_SYMBOLS_0 + MAX_HUFF_SYMBOLS_1 + 137],
  /// Literal/length, distance, and code-length tables, in that order.
  tables: [HuffTable; 3],
}

impl Default for Inflater {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl core::fmt::Debug for Inflater {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Inflater")
      .field("mode", &self.mode)
      .field("num_bits", &self.num_bits)
      .field("final_block", &self.final_block)
      .field("counter", &self.counter)
      .field("dist", &self.dist)
      .finish_non_exhaustive()
  }
}

impl Inflater {
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self {
      mode: Mode::Start,
      bit_buf: 0,
      num_bits: 0,
      final_block: false,
      counter: 0,
      num_extra: 0,
      dist: 0,
      table_sizes: [0; 3],
      raw_header: [0; 4],
      zlib_header: [0; 2],
      check_adler32: 1,
      z_adler32: 1,
      dist_from_out_start: 0,
      len_codes: [0; MAX_HUFF_SYMBOLS_0 + MAX_HUFF_SYMBOLS_1 + 137],
      tables: [HuffTable::default(), HuffTable::default(), HuffTable::default()],
    }
  }

  /// Resets to the ready-to-start state so the value can decompress another
  /// stream.
  #[inline]
  pub fn init(&mut self) {
    *self = Self::new();
  }

  /// The adler-32 computed over the output so far (1 until any output is
  /// checksummed). Only meaningful when a flag asked for checksumming.
  #[inline]
  #[must_use]
  pub const fn adler32(&self) -> u32 {
    self.check_adler32
  }
}

/// The bit reservoir: input bytes enter at the top, bits leave from the
/// bottom, exactly the LSB-first order DEFLATE packs them in.
struct BitFeeder<'b> {
  bytes: &'b [u8],
  pos: usize,
  bit_buf: u32,
  num_bits: u32,
}

/// The result of trying to pull one Huffman symbol.
enum HuffPull {
  Sym(u32),
  NeedsInput,
  Corrupt,
}

impl<'b> BitFeeder<'b> {
  /// Pulls one more input byte into the reservoir, if there is one.
  #[inline]
  fn feed(&mut self) -> bool {
    if self.pos < self.bytes.len() {
      self.bit_buf |= u32::from(self.bytes[self.pos]) << self.num_bits;
      self.pos += 1;
      self.num_bits += 8;
      true
    } else {
      false
    }
  }

  /// Ensures at least `count` bits are buffered. `false` means the input
  /// ran dry (the reservoir keeps whatever it had).
  #[inline]
  fn try_need(&mut self, count: u32) -> bool {
    debug_assert!(count <= 15);
    while self.num_bits < count {
      if !self.feed() {
        return false;
      }
    }
    true
  }

  /// Takes `count` bits. Caller must have ensured they're buffered.
  #[inline]
  fn take(&mut self, count: u32) -> u32 {
    debug_assert!(count <= self.num_bits);
    let out = self.bit_buf & ((1 << count) - 1);
    self.bit_buf >>= count;
    self.num_bits -= count;
    out
  }

  #[inline]
  fn try_take(&mut self, count: u32) -> Option<u32> {
    if self.try_need(count) {
      Some(self.take(count))
    } else {
      None
    }
  }

  /// Discards bits up to the next byte boundary.
  #[inline]
  fn align(&mut self) {
    let drop = self.num_bits & 7;
    self.bit_buf >>= drop;
    self.num_bits -= drop;
  }

  /// Decodes one symbol, feeding bytes only as the code actually needs
  /// them, so we never over-read past the end of the deflate data.
  fn try_huff_decode(&mut self, table: &HuffTable) -> HuffPull {
    loop {
      let (sym, code_len) = table.probe(self.bit_buf);
      if code_len == 0 {
        return HuffPull::Corrupt;
      }
      if code_len <= self.num_bits {
        self.bit_buf >>= code_len;
        self.num_bits -= code_len;
        return HuffPull::Sym(sym);
      }
      if self.num_bits >= 15 {
        // no deflate code is this long; the table and stream disagree.
        return HuffPull::Corrupt;
      }
      if !self.feed() {
        return HuffPull::NeedsInput;
      }
    }
  }
}

/// Runs the decompression state machine.
///
/// * `r`: the saved state. Use a fresh ([`Inflater::new`]) value per stream.
/// * `in_buf`: the next stretch of compressed bytes.
/// * `out`: the output buffer. With
///   [`USING_NON_WRAPPING_OUTPUT_BUF`](inflate_flags::USING_NON_WRAPPING_OUTPUT_BUF)
///   it must be able to hold the entire stream; otherwise it's a
///   power-of-two sliding window.
/// * `out_pos`: where in `out` to start writing.
/// * `flags`: see [`inflate_flags`].
///
/// Returns `(status, input bytes consumed, output bytes written)`. Bytes
/// are consumed exactly as far as decoding actually progressed, so on
/// resumption you pass `&in_buf[consumed..]` (or entirely new input).
pub fn decompress(
  r: &mut Inflater, in_buf: &[u8], out: &mut [u8], out_pos: usize, flags: u32,
) -> (InflateStatus, usize, usize) {
  let zlib = (flags & inflate_flags::PARSE_ZLIB_HEADER) != 0;
  let has_more_input = (flags & inflate_flags::HAS_MORE_INPUT) != 0;
  let non_wrapping = (flags & inflate_flags::USING_NON_WRAPPING_OUTPUT_BUF) != 0;

  if out_pos > out.len() || (!non_wrapping && !out.len().is_power_of_two()) {
    return (InflateStatus::BadParam, 0, 0);
  }
  let out_mask = if non_wrapping { usize::MAX } else { out.len() - 1 };

  let mut feeder =
    BitFeeder { bytes: in_buf, pos: 0, bit_buf: r.bit_buf, num_bits: r.num_bits };
  let mut out_cur = out_pos;
  let mut finished_now = false;
  let mut status: InflateStatus;

  // the exit macros take the loop label as an argument because labels are
  // hygienic: one written inside a macro body can't name the loop here.
  macro_rules! starved {
    ($label:lifetime) => {{
      status = if has_more_input {
        InflateStatus::NeedsMoreInput
      } else {
        InflateStatus::FailedCannotMakeProgress
      };
      break $label;
    }};
  }
  macro_rules! give_up {
    ($label:lifetime) => {{
      r.mode = Mode::FailedForever;
      status = InflateStatus::Failed;
      break $label;
    }};
  }
  macro_rules! more_output {
    ($label:lifetime) => {{
      status = InflateStatus::HasMoreOutput;
      break $label;
    }};
  }

  'machine: loop {
    match r.mode {
      Mode::Start => {
        feeder.bit_buf = 0;
        feeder.num_bits = 0;
        r.final_block = false;
        r.check_adler32 = 1;
        r.z_adler32 = 1;
        r.mode = if zlib { Mode::ZlibCmf } else { Mode::BlockHeader };
      }

      Mode::ZlibCmf => match feeder.try_take(8) {
        None => starved!('machine),
        Some(cmf) => {
          r.zlib_header[0] = cmf as u8;
          r.mode = Mode::ZlibFlg;
        }
      },

      Mode::ZlibFlg => match feeder.try_take(8) {
        None => starved!('machine),
        Some(flg) => {
          r.zlib_header[1] = flg as u8;
          let cmf = u32::from(r.zlib_header[0]);
          let flg = u32::from(r.zlib_header[1]);
          trace!("zlib header: cmf {cmf:#04x} flg {flg:#04x}");
          let mut bad =
            ((cmf * 256 + flg) % 31) != 0 || (flg & 32) != 0 || (cmf & 15) != 8;
          if !non_wrapping {
            let declared_window = 1_usize << (8 + (cmf >> 4));
            bad |= declared_window > 32768 || out.len() < declared_window;
          }
          if bad {
            give_up!('machine);
          }
          r.mode = Mode::BlockHeader;
        }
      },

      Mode::BlockHeader => match feeder.try_take(3) {
        None => starved!('machine),
        Some(bits) => {
          r.final_block = (bits & 1) != 0;
          let block_type = bits >> 1;
          trace!("block: type {block_type}, final {final_}", final_ = r.final_block);
          match block_type {
            0 => {
              feeder.align();
              r.counter = 0;
              r.mode = Mode::StoredHeader;
            }
            1 => {
              for (i, cs) in r.tables[0].code_size.iter_mut().enumerate() {
                *cs = match i {
                  0..=143 => 8,
                  144..=255 => 9,
                  256..=279 => 7,
                  _ => 8,
                };
              }
              r.tables[1].code_size[..MAX_HUFF_SYMBOLS_1].fill(5);
              r.table_sizes[0] = MAX_HUFF_SYMBOLS_0;
              r.table_sizes[1] = MAX_HUFF_SYMBOLS_1;
              if !r.tables[1].build(MAX_HUFF_SYMBOLS_1)
                || !r.tables[0].build(MAX_HUFF_SYMBOLS_0)
              {
                give_up!('machine);
              }
              r.mode = Mode::LitLen;
            }
            2 => {
              r.counter = 0;
              r.mode = Mode::DynTableSizes;
            }
            _ => give_up!('machine),
          }
        }
      },

      Mode::StoredHeader => {
        while r.counter < 4 {
          match feeder.try_take(8) {
            None => starved!('machine),
            Some(byte) => {
              r.raw_header[r.counter] = byte as u8;
              r.counter += 1;
            }
          }
        }
        let len = u16::from_le_bytes([r.raw_header[0], r.raw_header[1]]);
        let nlen = u16::from_le_bytes([r.raw_header[2], r.raw_header[3]]);
        if len != !nlen {
          give_up!('machine);
        }
        r.counter = usize::from(len);
        r.mode = Mode::StoredBody;
      }

      Mode::StoredBody => {
        // a couple of whole bytes may still sit in the bit reservoir.
        while r.counter > 0 && feeder.num_bits >= 8 {
          if out_cur >= out.len() {
            more_output!('machine);
          }
          out[out_cur] = feeder.take(8) as u8;
          out_cur += 1;
          r.counter -= 1;
        }
        while r.counter > 0 {
          if out_cur >= out.len() {
            more_output!('machine);
          }
          if feeder.pos >= feeder.bytes.len() {
            starved!('machine);
          }
          let n = r
            .counter
            .min(out.len() - out_cur)
            .min(feeder.bytes.len() - feeder.pos);
          out[out_cur..out_cur + n].copy_from_slice(&feeder.bytes[feeder.pos..feeder.pos + n]);
          feeder.pos += n;
          out_cur += n;
          r.counter -= n;
        }
        r.mode = if r.final_block { Mode::TrailerAlign } else { Mode::BlockHeader };
      }

      Mode::DynTableSizes => {
        const FIELD_BITS: [u32; 3] = [5, 5, 4];
        const FIELD_BASE: [usize; 3] = [257, 1, 4];
        while r.counter < 3 {
          match feeder.try_take(FIELD_BITS[r.counter]) {
            None => starved!('machine),
            Some(v) => {
              r.table_sizes[r.counter] = v as usize + FIELD_BASE[r.counter];
              r.counter += 1;
            }
          }
        }
        r.tables[2].code_size = [0; MAX_HUFF_SYMBOLS_0];
        r.counter = 0;
        r.mode = Mode::DynCodeSizeCodes;
      }

      Mode::DynCodeSizeCodes => {
        while r.counter < r.table_sizes[2] {
          match feeder.try_take(3) {
            None => starved!('machine),
            Some(v) => {
              r.tables[2].code_size[LENGTH_DEZIGZAG[r.counter]] = v as u8;
              r.counter += 1;
            }
          }
        }
        r.table_sizes[2] = MAX_HUFF_SYMBOLS_2;
        if !r.tables[2].build(MAX_HUFF_SYMBOLS_2) {
          give_up!('machine);
        }
        r.counter = 0;
        r.mode = Mode::DynCodeLengths;
      }

      Mode::DynCodeLengths => {
        let total = r.table_sizes[0] + r.table_sizes[1];
        while r.counter < total {
          match feeder.try_huff_decode(&r.tables[2]) {
            HuffPull::NeedsInput => starved!('machine),
            HuffPull::Corrupt => give_up!('machine),
            HuffPull::Sym(sym @ 0..=15) => {
              r.len_codes[r.counter] = sym as u8;
              r.counter += 1;
            }
            HuffPull::Sym(sym @ 16..=18) => {
              if sym == 16 && r.counter == 0 {
                give_up!('machine);
              }
              r.dist = sym as usize;
              r.mode = Mode::DynCodeLengthExtra;
              continue 'machine;
            }
            HuffPull::Sym(_) => give_up!('machine),
          }
        }
        if r.counter != total {
          give_up!('machine);
        }
        let (ts0, ts1) = (r.table_sizes[0], r.table_sizes[1]);
        r.tables[0].code_size[..ts0].copy_from_slice(&r.len_codes[..ts0]);
        r.tables[1].code_size[..ts1].copy_from_slice(&r.len_codes[ts0..ts0 + ts1]);
        if !r.tables[1].build(ts1) || !r.tables[0].build(ts0) {
          give_up!('machine);
        }
        r.mode = Mode::LitLen;
      }

      Mode::DynCodeLengthExtra => {
        const EXTRA_BITS: [u32; 3] = [2, 3, 7];
        const REPEAT_BASE: [usize; 3] = [3, 3, 11];
        let which = r.dist - 16;
        match feeder.try_take(EXTRA_BITS[which]) {
          None => starved!('machine),
          Some(v) => {
            let repeat = REPEAT_BASE[which] + v as usize;
            let fill_value = if r.dist == 16 { r.len_codes[r.counter - 1] } else { 0 };
            // len_codes is sized so this slice can't run off the end even
            // at the largest legal repeat from the last legal position.
            r.len_codes[r.counter..r.counter + repeat].fill(fill_value);
            r.counter += repeat;
            r.mode = Mode::DynCodeLengths;
          }
        }
      }

      Mode::LitLen => match feeder.try_huff_decode(&r.tables[0]) {
        HuffPull::NeedsInput => starved!('machine),
        HuffPull::Corrupt => give_up!('machine),
        HuffPull::Sym(sym) => {
          if sym < 256 {
            if out_cur < out.len() {
              out[out_cur] = sym as u8;
              out_cur += 1;
            } else {
              r.counter = sym as usize;
              r.mode = Mode::PushLiteral;
              more_output!('machine);
            }
          } else if sym == 256 {
            r.mode = if r.final_block { Mode::TrailerAlign } else { Mode::BlockHeader };
          } else {
            let idx = (sym - 257) as usize;
            r.counter = usize::from(LENGTH_BASE[idx]);
            r.num_extra = LENGTH_EXTRA[idx];
            r.mode = if r.num_extra != 0 { Mode::LengthExtra } else { Mode::Distance };
          }
        }
      },

      Mode::PushLiteral => {
        if out_cur >= out.len() {
          more_output!('machine);
        }
        out[out_cur] = r.counter as u8;
        out_cur += 1;
        r.mode = Mode::LitLen;
      }

      Mode::LengthExtra => match feeder.try_take(r.num_extra) {
        None => starved!('machine),
        Some(v) => {
          r.counter += v as usize;
          r.mode = Mode::Distance;
        }
      },

      Mode::Distance => match feeder.try_huff_decode(&r.tables[1]) {
        HuffPull::NeedsInput => starved!('machine),
        HuffPull::Corrupt => give_up!('machine),
        HuffPull::Sym(sym) => {
          r.dist = usize::from(DIST_BASE[sym as usize]);
          r.num_extra = DIST_EXTRA[sym as usize];
          r.mode = if r.num_extra != 0 { Mode::DistanceExtra } else { Mode::CopyBackref };
        }
      },

      Mode::DistanceExtra => match feeder.try_take(r.num_extra) {
        None => starved!('machine),
        Some(v) => {
          r.dist += v as usize;
          r.mode = Mode::CopyBackref;
        }
      },

      Mode::CopyBackref => {
        // distance 0 only comes from the two reserved distance codes;
        // reaching back before the start of output is fatal when the
        // output isn't a wrapping dictionary.
        if r.dist == 0 || (non_wrapping && r.dist > out_cur) {
          give_up!('machine);
        }
        r.dist_from_out_start = out_cur;
        r.mode = Mode::ContinueCopy;
      }

      Mode::ContinueCopy => {
        // byte at a time, front to back: an overlapping copy (dist < len)
        // must re-read bytes this same copy just produced.
        while r.counter > 0 {
          if out_cur >= out.len() {
            more_output!('machine);
          }
          let src = r.dist_from_out_start.wrapping_sub(r.dist) & out_mask;
          out[out_cur] = out[src];
          out_cur += 1;
          r.dist_from_out_start += 1;
          r.counter -= 1;
        }
        r.mode = Mode::LitLen;
      }

      Mode::TrailerAlign => {
        feeder.align();
        if zlib {
          r.counter = 0;
          r.mode = Mode::TrailerAdler;
        } else {
          finished_now = true;
          r.mode = Mode::DoneForever;
          status = InflateStatus::Done;
          break 'machine;
        }
      }

      Mode::TrailerAdler => {
        while r.counter < 4 {
          match feeder.try_take(8) {
            None => starved!('machine),
            Some(byte) => {
              r.z_adler32 = (r.z_adler32 << 8) | byte;
              r.counter += 1;
            }
          }
        }
        finished_now = true;
        r.mode = Mode::DoneForever;
        status = InflateStatus::Done;
        break 'machine;
      }

      Mode::DoneForever => {
        status = InflateStatus::Done;
        break 'machine;
      }

      Mode::FailedForever => {
        status = InflateStatus::Failed;
        break 'machine;
      }
    }
  }

  // unless we're waiting on input, put whole unconsumed bytes back so that
  // the reported consumption doesn't cover bits we only buffered.
  if status != InflateStatus::NeedsMoreInput && status != InflateStatus::FailedCannotMakeProgress
  {
    while feeder.pos > 0 && feeder.num_bits >= 8 {
      feeder.pos -= 1;
      feeder.num_bits -= 8;
    }
    feeder.bit_buf &= (1 << feeder.num_bits) - 1;
  }
  r.bit_buf = feeder.bit_buf;
  r.num_bits = feeder.num_bits;

  let in_consumed = feeder.pos;
  let out_written = out_cur - out_pos;
  if (flags & (inflate_flags::PARSE_ZLIB_HEADER | inflate_flags::COMPUTE_ADLER32)) != 0
    && !status.is_failure()
  {
    r.check_adler32 = update_adler32(r.check_adler32, &out[out_pos..out_cur]);
    if finished_now && zlib && r.check_adler32 != r.z_adler32 {
      trace!(
        "adler32 mismatch: computed {computed:#010x}, declared {declared:#010x}",
        computed = r.check_adler32,
        declared = r.z_adler32
      );
      status = InflateStatus::Adler32Mismatch;
    }
  }
  (status, in_consumed, out_written)
}

/// Adds `bytes` into a running adler-32, folding in blocks of 5552 (the
/// largest count that can't overflow 32 bits) before reducing mod 65521.
fn update_adler32(adler: u32, bytes: &[u8]) -> u32 {
  let mut s1 = adler & 0xFFFF;
  let mut s2 = adler >> 16;
  for block in bytes.chunks(5552) {
    for &byte in block {
      s1 += u32::from(byte);
      s2 += s1;
    }
    s1 %= 65521;
    s2 %= 65521;
  }
  (s2 << 16) | s1
}

/// Decompresses a complete zlib stream (2-byte header, adler-32 trailer)
/// onto the heap.
#[cfg(feature = "alloc")]
pub fn decompress_to_vec_zlib(input: &[u8]) -> Result<alloc::vec::Vec<u8>, InflateStatus> {
  decompress_to_vec_inner(input, inflate_flags::PARSE_ZLIB_HEADER)
}

/// Decompresses a complete raw DEFLATE stream onto the heap.
#[cfg(feature = "alloc")]
pub fn decompress_to_vec(input: &[u8]) -> Result<alloc::vec::Vec<u8>, InflateStatus> {
  decompress_to_vec_inner(input, 0)
}

#[cfg(feature = "alloc")]
fn decompress_to_vec_inner(
  input: &[u8], flags: u32,
) -> Result<alloc::vec::Vec<u8>, InflateStatus> {
  use alloc::{boxed::Box, vec::Vec};
  let flags =
    (flags & !inflate_flags::HAS_MORE_INPUT) | inflate_flags::USING_NON_WRAPPING_OUTPUT_BUF;
  let mut r = Box::new(Inflater::new());
  let mut out: Vec<u8> = Vec::new();
  let mut in_pos = 0;
  let mut out_pos = 0;
  loop {
    let (status, in_read, out_written) =
      decompress(&mut r, &input[in_pos..], &mut out, out_pos, flags);
    in_pos += in_read;
    out_pos += out_written;
    match status {
      InflateStatus::Done => {
        out.truncate(out_pos);
        return Ok(out);
      }
      InflateStatus::HasMoreOutput => {
        let new_len = out.len().saturating_mul(2).max(128);
        if out.try_reserve_exact(new_len - out.len()).is_err() {
          return Err(InflateStatus::Failed);
        }
        out.resize(new_len, 0);
      }
      other => return Err(other),
    }
  }
}
