use unpng::inflate::{
  decompress, decompress_to_vec, decompress_to_vec_zlib, inflate_flags::*, Inflater,
  InflateStatus,
};

/// Bodies that exercise literals, short and long back references, stored
/// blocks (the empty and incompressible cases), and multiple 32 KiB
/// windows' worth of output.
fn sample_bodies() -> Vec<Vec<u8>> {
  let mut bodies = vec![
    Vec::new(),
    b"a".to_vec(),
    b"hello hello hello hello hello".to_vec(),
    (0..=255_u8).collect(),
  ];
  // 100k of period-251 data: long matches, and output well past one window.
  bodies.push((0..100_000_u32).map(|i| (i % 251) as u8).collect());
  // incompressible noise tends to come out as stored blocks.
  bodies.push(super::rand_bytes(4096));
  bodies
}

#[test]
fn test_round_trip_zlib_all_levels() {
  for body in sample_bodies() {
    for level in 0..=9 {
      let stream = miniz_oxide::deflate::compress_to_vec_zlib(&body, level);
      let back = decompress_to_vec_zlib(&stream).unwrap();
      assert_eq!(back, body, "level {level}, body len {len}", len = body.len());
    }
  }
}

#[test]
fn test_round_trip_raw_deflate() {
  for body in sample_bodies() {
    let stream = miniz_oxide::deflate::compress_to_vec(&body, 6);
    assert_eq!(decompress_to_vec(&stream).unwrap(), body);
  }
}

/// Feeds the machine one input byte per call, resizing output as demanded,
/// so every suspension point gets visited.
fn inflate_zlib_byte_at_a_time(stream: &[u8]) -> Result<Vec<u8>, InflateStatus> {
  let mut r = Inflater::new();
  let mut out = vec![0_u8; 64];
  let mut out_pos = 0;
  let mut in_pos = 0;
  loop {
    let end = (in_pos + 1).min(stream.len());
    let last = end == stream.len();
    let flags = PARSE_ZLIB_HEADER
      | USING_NON_WRAPPING_OUTPUT_BUF
      | if last { 0 } else { HAS_MORE_INPUT };
    let (status, in_read, out_written) =
      decompress(&mut r, &stream[in_pos..end], &mut out, out_pos, flags);
    in_pos += in_read;
    out_pos += out_written;
    match status {
      InflateStatus::Done => {
        out.truncate(out_pos);
        return Ok(out);
      }
      InflateStatus::NeedsMoreInput => (),
      InflateStatus::HasMoreOutput => out.resize(out.len() * 2, 0),
      other => return Err(other),
    }
  }
}

#[test]
fn test_resumes_across_split_input_and_output() {
  for body in sample_bodies() {
    let stream = miniz_oxide::deflate::compress_to_vec_zlib(&body, 6);
    assert_eq!(inflate_zlib_byte_at_a_time(&stream).unwrap(), body);
  }
}

/// Runs the machine against a 32 KiB wrapping window, draining the window
/// on every `HasMoreOutput`, the way a streaming caller would.
fn inflate_zlib_windowed(stream: &[u8]) -> Result<Vec<u8>, InflateStatus> {
  let mut r = Inflater::new();
  let mut window = vec![0_u8; 32 * 1024];
  let mut out = Vec::new();
  let mut in_pos = 0;
  let mut out_pos = 0;
  loop {
    let (status, in_read, out_written) =
      decompress(&mut r, &stream[in_pos..], &mut window, out_pos, PARSE_ZLIB_HEADER);
    in_pos += in_read;
    out.extend_from_slice(&window[out_pos..out_pos + out_written]);
    out_pos += out_written;
    match status {
      InflateStatus::Done => return Ok(out),
      InflateStatus::HasMoreOutput => out_pos = 0,
      other => return Err(other),
    }
  }
}

#[test]
fn test_wrapping_window_decode() {
  for body in sample_bodies() {
    let stream = miniz_oxide::deflate::compress_to_vec_zlib(&body, 6);
    assert_eq!(inflate_zlib_windowed(&stream).unwrap(), body);
  }
}

#[test]
fn test_wrapping_window_must_be_power_of_two() {
  let stream = miniz_oxide::deflate::compress_to_vec_zlib(b"hi", 6);
  let mut r = Inflater::new();
  let mut window = vec![0_u8; 1000];
  let (status, _, _) = decompress(&mut r, &stream, &mut window, 0, PARSE_ZLIB_HEADER);
  assert_eq!(status, InflateStatus::BadParam);
}

#[test]
fn test_adler_mismatch_detected() {
  let body = b"the checksum covers all of this";
  let mut stream = miniz_oxide::deflate::compress_to_vec_zlib(body, 6);
  let last = stream.len() - 1;
  stream[last] ^= 0xFF;
  assert_eq!(decompress_to_vec_zlib(&stream), Err(InflateStatus::Adler32Mismatch));
}

#[test]
fn test_truncated_stream_cannot_progress() {
  let stream = miniz_oxide::deflate::compress_to_vec_zlib(&[7_u8; 100], 6);
  let cut = &stream[..stream.len() / 2];
  assert!(matches!(
    decompress_to_vec_zlib(cut),
    Err(InflateStatus::FailedCannotMakeProgress) | Err(InflateStatus::Failed)
  ));
}

#[test]
fn test_garbage_streams_never_panic() {
  for _ in 0..50 {
    let junk = super::rand_bytes(256);
    let _ = decompress_to_vec_zlib(&junk);
    let _ = decompress_to_vec(&junk);
  }
}

#[test]
fn test_computed_adler_is_exposed() {
  let body = b"Wikipedia";
  let stream = miniz_oxide::deflate::compress_to_vec_zlib(body, 6);
  let mut r = Inflater::new();
  let mut out = vec![0_u8; body.len()];
  let (status, _, written) = decompress(
    &mut r,
    &stream,
    &mut out,
    0,
    PARSE_ZLIB_HEADER | USING_NON_WRAPPING_OUTPUT_BUF,
  );
  assert_eq!(status, InflateStatus::Done);
  assert_eq!(written, body.len());
  assert_eq!(r.adler32(), 0x11E6_0398);
}
