//! HTTP header decoder implementation for framing and parsing request heads
//!
//! This module cuts a request head out of the byte stream and turns it into a
//! structured [`RequestHeader`], then decides how the body that follows is framed.
//!
//! # Limits
//!
//! - Maximum header size: 8KB, request line and terminating blank line included
//! - Only HTTP/1.1 is accepted
//!
//! # Implementation Details
//!
//! The decoder works in multiple stages:
//!
//! 1. Drop stray CRLFs left between pipelined requests
//! 2. Search for the blank line (`CRLF CRLF`) ending the head, resuming where the last search stopped
//! 3. Split the head off the buffer and hand it to the head parser
//! 4. Determine the payload framing from `Transfer-Encoding` and `Content-Length`

use bytes::{Buf, BytesMut};
use http::{HeaderMap, HeaderValue, header};
use tokio_util::codec::Decoder;
use tracing::trace;

use super::head_parser::parse_head;
use crate::ensure;
use crate::protocol::{ParseError, PayloadSize, RequestHeader};

/// Maximum size in bytes allowed for the entire header section
pub(crate) const MAX_HEADER_BYTES: usize = 8 * 1024;

const TERMINATOR: &[u8] = b"\r\n\r\n";

/// Decoder for HTTP request heads implementing the [`Decoder`] trait.
///
/// Yields the parsed [`RequestHeader`] together with the [`PayloadSize`] describing
/// the body that follows it on the wire.
#[derive(Debug, Default)]
pub struct HeaderDecoder {
    /// bytes already scanned without finding the terminator
    searched: usize,
}

impl HeaderDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns the length of the head including its terminator, if the terminator is in `src`.
///
/// `from` is where the previous search stopped; the search backs up three bytes so a
/// terminator split across reads is still found.
fn find_head_end(src: &[u8], from: usize) -> Option<usize> {
    let start = from.saturating_sub(TERMINATOR.len() - 1);
    src.get(start..)?.windows(TERMINATOR.len()).position(|w| w == TERMINATOR).map(|pos| start + pos + TERMINATOR.len())
}

/// Removes CRLF pairs (and bare LFs) preceding a request.
fn skip_leading_crlf(src: &mut BytesMut) {
    let blank = src.iter().take_while(|&&b| b == b'\r' || b == b'\n').count();
    // keep a lone trailing CR, it may be the first half of a CRLF still in flight
    let blank = if blank > 0 && src.get(blank - 1) == Some(&b'\r') && blank == src.len() { blank - 1 } else { blank };
    if blank > 0 {
        src.advance(blank);
    }
}

impl Decoder for HeaderDecoder {
    type Item = (RequestHeader, PayloadSize);
    type Error = ParseError;

    /// Attempts to decode a request head from the provided bytes buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((header, payload_size)))` if a complete head was parsed
    /// - `Ok(None)` if more data is needed
    /// - `Err(ParseError)` if the head is malformed or exceeds [`MAX_HEADER_BYTES`]
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // blank lines before the request line may arrive over several reads
        if src.iter().take(self.searched).all(|&b| b == b'\r' || b == b'\n') {
            skip_leading_crlf(src);
            self.searched = 0;
        }

        let Some(head_len) = find_head_end(src, self.searched) else {
            self.searched = src.len();
            ensure!(src.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(src.len(), MAX_HEADER_BYTES));
            return Ok(None);
        };

        self.searched = 0;
        ensure!(head_len <= MAX_HEADER_BYTES, ParseError::too_large_header(head_len, MAX_HEADER_BYTES));
        trace!(head_size = head_len, "framed request head");

        let raw = src.split_to(head_len).freeze();
        let header = parse_head(raw)?;
        let payload_size = parse_payload(header.headers())?;

        Ok(Some((header, payload_size)))
    }
}

/// Determines how the request body is framed.
///
/// `Transfer-Encoding` wins over `Content-Length`. When present, its final coding
/// must be `chunked`, otherwise the body length cannot be determined.
fn parse_payload(headers: &HeaderMap) -> Result<PayloadSize, ParseError> {
    // refer: https://www.rfc-editor.org/rfc/rfc9112.html#name-transfer-encoding
    let te_values = headers.get_all(header::TRANSFER_ENCODING);
    if let Some(last) = te_values.iter().last() {
        ensure!(is_chunked(Some(last)), ParseError::invalid_transfer_encoding("chunked must be the final coding"));
        return Ok(PayloadSize::new_chunked());
    }

    let mut length = None;
    for value in headers.get_all(header::CONTENT_LENGTH) {
        let cl_str = value.to_str().map_err(|_| ParseError::invalid_content_length("value can't to_str"))?.trim();
        ensure!(
            !cl_str.is_empty() && cl_str.bytes().all(|b| b.is_ascii_digit()),
            ParseError::invalid_content_length(format!("value {cl_str} is not a number"))
        );
        let parsed = cl_str.parse::<u64>().map_err(|_| ParseError::invalid_content_length(format!("value {cl_str} is not u64")))?;

        match length {
            Some(previous) if previous != parsed => {
                return Err(ParseError::invalid_content_length("multiple different content_length values"));
            }
            _ => length = Some(parsed),
        }
    }

    Ok(length.map_or(PayloadSize::new_empty(), PayloadSize::new_length))
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(header_value: Option<&HeaderValue>) -> bool {
    const CHUNKED: &[u8] = b"chunked";
    if let Some(value) = header_value {
        if let Some(bytes) = value.as_bytes().rsplit(|b| *b == b',').next() {
            return bytes.trim_ascii().eq_ignore_ascii_case(CHUNKED);
        }
    }
    false
}
