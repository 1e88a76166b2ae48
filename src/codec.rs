//! CR LF line framing over an accumulating byte buffer.
//!
//! [`LineCodec`] splits an arbitrary byte stream into protocol lines and
//! wraps outgoing lines with the terminator. Decoding is delivery-boundary
//! independent: bytes may arrive split at any point, including between the
//! CR and the LF, and partial data is retained across calls until the
//! terminator completes.

use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Terminator for all protocol lines sent to or received from the server.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Minimum accepted line-length limit in bytes.
pub const MIN_LINE_LENGTH: usize = 64;

/// Maximum accepted line-length limit in bytes (64 KiB).
///
/// Limits passed to [`LineCodec::new`] are clamped into
/// [`MIN_LINE_LENGTH`]..=[`MAX_LINE_LENGTH`] to bound buffer growth.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Default line-length limit: the classic 512-byte protocol line.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 512;

pub(crate) fn clamp_line_length(value: usize) -> usize {
    value.clamp(MIN_LINE_LENGTH, MAX_LINE_LENGTH)
}

/// Codec splitting a byte stream into CR LF terminated text lines.
///
/// Oversized lines are dropped rather than surfaced: the protocol policy for
/// malformed input is to ignore it, and a decode error would tear down the
/// session instead.
#[derive(Clone, Debug)]
pub struct LineCodec {
    max_line_length: usize,
    /// Scan resume offset, so repeated decodes over a growing buffer stay
    /// linear instead of rescanning from the start each delivery.
    scan_from: usize,
}

impl LineCodec {
    /// Construct a codec with a maximum accepted line length.
    #[must_use]
    pub fn new(max_line_length: usize) -> Self {
        Self {
            max_line_length: clamp_line_length(max_line_length),
            scan_from: 0,
        }
    }

    /// Return the maximum line length accepted by this codec.
    #[must_use]
    pub fn max_line_length(&self) -> usize { self.max_line_length }
}

impl Default for LineCodec {
    fn default() -> Self { Self::new(DEFAULT_MAX_LINE_LENGTH) }
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack.windows(2).position(|pair| pair == b"\r\n")
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            // Resume one byte early: the previous scan may have ended on a CR
            // whose LF had not arrived yet.
            let start = self.scan_from.saturating_sub(1).min(src.len());
            let Some(offset) = find_terminator(&src[start..]) else {
                self.scan_from = src.len();
                return Ok(None);
            };

            let line = src.split_to(start + offset);
            src.advance(LINE_TERMINATOR.len());
            self.scan_from = 0;

            if line.len() > self.max_line_length {
                log::warn!(
                    "dropping oversized line ({} bytes, limit {})",
                    line.len(),
                    self.max_line_length
                );
                continue;
            }

            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }
    }
}

impl Encoder<&str> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.contains(['\r', '\n']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "line contains an embedded terminator",
            ));
        }
        dst.reserve(item.len() + LINE_TERMINATOR.len());
        dst.put_slice(item.as_bytes());
        dst.put_slice(LINE_TERMINATOR.as_bytes());
        Ok(())
    }
}
