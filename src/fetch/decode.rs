//! Response body decoding.
//!
//! The HTTP client runs without transparent decompression so that
//! `content-encoding` stays on the captured headers. Bodies are decoded here
//! instead, with the decoded size capped at `MAX_DECODED_BODY_SIZE`.

use std::io::{self, Read};

use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use log::debug;

use crate::config::MAX_DECODED_BODY_SIZE;
use crate::error_handling::{FetchError, FetchErrorKind};

const BROTLI_BUFFER_SIZE: usize = 4096;

/// Decoded body bytes.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub(crate) bytes: Vec<u8>,
    /// Output was cut at `MAX_DECODED_BODY_SIZE`
    pub(crate) capped: bool,
}

/// Splits a `content-encoding` value into lowercase codings, in the order applied.
pub(crate) fn parse_codings(content_encoding: Option<&str>) -> Vec<String> {
    content_encoding
        .unwrap_or_default()
        .split(',')
        .map(|coding| coding.trim().to_ascii_lowercase())
        .filter(|coding| !coding.is_empty())
        .collect()
}

/// Undoes every coding listed in `content_encoding`, last applied first.
///
/// When the raw body was truncated at the transfer cap, a decoder error after
/// some output is expected; the partial output is kept.
///
/// # Errors
///
/// Returns `FetchErrorKind::Decode` for unknown codings or corrupt data.
pub(crate) fn decode_body(
    raw: Vec<u8>,
    content_encoding: Option<&str>,
    truncated: bool,
) -> Result<Decoded, FetchError> {
    let mut decoded = Decoded {
        bytes: raw,
        capped: false,
    };

    for coding in parse_codings(content_encoding).iter().rev() {
        let input = std::mem::take(&mut decoded.bytes);
        let (bytes, error) = match coding.as_str() {
            "identity" => {
                decoded.bytes = input;
                continue;
            }
            "gzip" | "x-gzip" => read_capped(MultiGzDecoder::new(&input[..])),
            "deflate" => {
                // Some servers send raw deflate streams without the zlib wrapper
                match read_capped(ZlibDecoder::new(&input[..])) {
                    (bytes, Some(_)) if bytes.is_empty() => {
                        read_capped(DeflateDecoder::new(&input[..]))
                    }
                    outcome => outcome,
                }
            }
            "br" => read_capped(brotli::Decompressor::new(&input[..], BROTLI_BUFFER_SIZE)),
            other => {
                return Err(FetchError::new(
                    FetchErrorKind::Decode,
                    format!("unsupported content-encoding '{other}'"),
                ))
            }
        };

        if let Some(e) = error {
            if !(truncated && !bytes.is_empty()) {
                return Err(FetchError::new(
                    FetchErrorKind::Decode,
                    format!("failed to decode {coding} body: {e}"),
                ));
            }
            debug!(
                "Keeping {} bytes of partially decoded {coding} body: {e}",
                bytes.len()
            );
        }

        decoded.capped |= bytes.len() > MAX_DECODED_BODY_SIZE;
        decoded.bytes = bytes;
        decoded.bytes.truncate(MAX_DECODED_BODY_SIZE);
    }

    Ok(decoded)
}

/// Reads at most `MAX_DECODED_BODY_SIZE + 1` bytes, keeping partial output on error.
fn read_capped<R: Read>(reader: R) -> (Vec<u8>, Option<io::Error>) {
    let mut out = Vec::new();
    let limit = u64::try_from(MAX_DECODED_BODY_SIZE).unwrap_or(u64::MAX).saturating_add(1);
    match reader.take(limit).read_to_end(&mut out) {
        Ok(_) => (out, None),
        Err(e) => (out, Some(e)),
    }
}
