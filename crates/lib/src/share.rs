//! Share codes: a whole [`Request`] packed into one URL-safe string.
//!
//! The request is flattened to a list of strings: `"t"` or `"f"` for string
//! output, the entry file's contents, then a name and contents pair for every
//! other file. Each string is written as a big-endian `u32` byte length and its
//! UTF-8 bytes. The buffer is gzipped and encoded as unpadded base64url.
//!
//! The entry file travels in the main slot and always decodes as
//! [`DEFAULT_ENTRY`].

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;
use tracing::debug;

use crate::consts::DEFAULT_ENTRY;
use crate::session::Request;

/// Padding is never written and is accepted either way when reading.
const CODE_ENGINE: GeneralPurpose = GeneralPurpose::new(
  &alphabet::URL_SAFE,
  GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum ShareError {
  #[error("invalid share code encoding: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("failed decoding data: {0}")]
  Gzip(#[from] std::io::Error),

  #[error("malformed share code: {0}")]
  Malformed(&'static str),

  #[error("share code string is not utf-8")]
  Utf8(#[from] std::string::FromUtf8Error),

  #[error("file {0} is too large to share")]
  TooLarge(String),
}

/// Pack `request` into a share code.
pub fn encode(request: &Request) -> Result<String, ShareError> {
  let main = request.files.get(&request.entry).map_or("", String::as_str);
  let mut strings = vec![if request.strout { "t" } else { "f" }, main];
  for (name, contents) in &request.files {
    if *name != request.entry {
      strings.push(name);
      strings.push(contents);
    }
  }

  let buf = frame(&strings)?;
  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder.write_all(&buf)?;
  let compressed = encoder.finish()?;
  debug!(files = request.files.len(), bytes = compressed.len(), "encoded share code");
  Ok(CODE_ENGINE.encode(compressed))
}

/// Unpack a share code produced by [`encode`].
pub fn decode(code: &str) -> Result<Request, ShareError> {
  let compressed = CODE_ENGINE.decode(code.trim())?;
  let mut buf = Vec::new();
  GzDecoder::new(compressed.as_slice()).read_to_end(&mut buf)?;

  let strings = unframe(&buf)?;
  let [strout, main, rest @ ..] = strings.as_slice() else {
    return Err(ShareError::Malformed("file state is missing the main file"));
  };
  if rest.len() % 2 != 0 {
    return Err(ShareError::Malformed("file name without contents"));
  }

  let mut files = BTreeMap::new();
  files.insert(DEFAULT_ENTRY.to_string(), main.clone());
  for pair in rest.chunks_exact(2) {
    files.insert(pair[0].clone(), pair[1].clone());
  }
  Ok(Request {
    files,
    entry: DEFAULT_ENTRY.to_string(),
    strout: strout == "t",
  })
}

fn frame(strings: &[&str]) -> Result<Vec<u8>, ShareError> {
  let mut buf = Vec::with_capacity(strings.iter().map(|s| s.len() + 4).sum());
  for s in strings {
    let len = u32::try_from(s.len()).map_err(|_| ShareError::TooLarge(s.chars().take(32).collect()))?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
  }
  Ok(buf)
}

fn unframe(mut buf: &[u8]) -> Result<Vec<String>, ShareError> {
  let mut strings = Vec::new();
  while !buf.is_empty() {
    let Some((len, rest)) = buf.split_first_chunk::<4>() else {
      return Err(ShareError::Malformed("truncated string length"));
    };
    let len = u32::from_be_bytes(*len) as usize;
    if rest.len() < len {
      return Err(ShareError::Malformed("string runs past end of buffer"));
    }
    let (s, rest) = rest.split_at(len);
    strings.push(String::from_utf8(s.to_vec())?);
    buf = rest;
  }
  Ok(strings)
}
