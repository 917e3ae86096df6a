//! Decoding of write_files content under a declared encoding.

use base64::prelude::*;
use flate2::read::GzDecoder;
use std::io::{self, Read};
use thiserror::Error;

/// Why content could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported encoding {0:?}")]
    Unsupported(String),

    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid gzip data: {0}")]
    Gzip(#[from] io::Error),
}

/// Decode `content` as declared by `encoding`.
///
/// An empty encoding means the content is used as-is. `gzip+base64` (and
/// its `gz`/`b64` spellings) means the content was gzip-compressed and then
/// base64-encoded.
///
/// # Example
///
/// ```rust
/// use cloud_config_validation::decode_content;
///
/// assert_eq!(decode_content(b"aGVsbG8K", "base64").unwrap(), b"hello\n");
/// assert!(decode_content(b"hello", "custom").is_err());
/// ```
pub fn decode_content(content: &[u8], encoding: &str) -> Result<Vec<u8>, DecodeError> {
    match encoding {
        "" => Ok(content.to_vec()),
        "b64" | "base64" => decode_base64(content),
        "gz" | "gzip" => decode_gzip(content),
        "gz+base64" | "gzip+base64" | "gz+b64" | "gzip+b64" => {
            let compressed = decode_base64(content)?;
            decode_gzip(&compressed)
        }
        other => Err(DecodeError::Unsupported(other.to_string())),
    }
}

/// Standard padded base64; line breaks are ignored.
fn decode_base64(content: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let encoded: Vec<u8> = content
        .iter()
        .copied()
        .filter(|b| *b != b'\n' && *b != b'\r')
        .collect();
    Ok(BASE64_STANDARD.decode(encoded)?)
}

/// A complete gzip stream, trailer included.
fn decode_gzip(content: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if content.is_empty() {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    let mut decoder = GzDecoder::new(content);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
