//! Decoder implementation for HTTP chunked transfer encoding.
//!
//! This module provides functionality to decode HTTP messages that use chunked transfer encoding
//! as specified in [RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1).
//!
//! The size line (hex size, optional extensions, CRLF) is parsed by `httparse`; chunk
//! extensions are ignored. The CRLF after every chunk's data is checked, and the trailer
//! section after the last chunk is read and discarded.

use crate::ensure;
use crate::protocol::{ParseError, PayloadItem};
use ChunkedState::*;
use bytes::{Buf, BytesMut};
use httparse::Status;
use tokio_util::codec::Decoder;
use tracing::trace;

/// Longest size or trailer line accepted before the body is rejected.
const MAX_LINE_BYTES: usize = 4 * 1024;

const CRLF: &[u8] = b"\r\n";

/// A decoder for handling HTTP chunked transfer encoding.
///
/// The decoder processes incoming bytes according to the chunked format:
/// - Each chunk starts with its size in hexadecimal
/// - Followed by optional extensions and CRLF
/// - Then the chunk data and CRLF
/// - A zero-sized chunk indicates the end of the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDecoder {
    state: ChunkedState,
}

impl ChunkedDecoder {
    /// Creates a new ChunkedDecoder instance, ready to read the size of the first chunk.
    pub fn new() -> Self {
        Self { state: Size }
    }
}

impl Default for ChunkedDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkedState {
    /// Read the chunk size line
    Size,
    /// Read chunk data, with this many bytes left
    Data(u64),
    /// Read the CRLF closing the chunk data
    DataCrlf,
    /// Read trailer lines up to the final blank line
    Trailer,
    /// Final state after reading last chunk
    End,
}

fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(CRLF.len()).position(|w| w == CRLF)
}

impl Decoder for ChunkedDecoder {
    type Item = PayloadItem;
    type Error = ParseError;

    /// Decodes chunked transfer encoded data from the input buffer.
    ///
    /// # Returns
    /// - `Ok(Some(PayloadItem::Chunk(bytes)))` when chunk data is available
    /// - `Ok(Some(PayloadItem::Eof))` when the final chunk and trailers are consumed
    /// - `Ok(None)` when more data is needed
    /// - `Err(ParseError)` if the chunked encoding is invalid
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            match self.state {
                End => {
                    trace!("finished reading chunked data");
                    return Ok(Some(PayloadItem::Eof));
                }

                Size => match httparse::parse_chunk_size(src) {
                    Ok(Status::Complete((line_len, size))) => {
                        src.advance(line_len);
                        trace!(size, "read chunk size");
                        self.state = if size == 0 { Trailer } else { Data(size) };
                    }
                    Ok(Status::Partial) => {
                        ensure!(src.len() <= MAX_LINE_BYTES, ParseError::invalid_body("chunk size line too long"));
                        return Ok(None);
                    }
                    Err(_) => return Err(ParseError::invalid_body("invalid chunk size")),
                },

                Data(remaining) => {
                    if src.is_empty() {
                        return Ok(None);
                    }

                    let read_size = remaining.min(src.len() as u64) as usize;
                    let bytes = src.split_to(read_size).freeze();
                    let remaining = remaining - read_size as u64;
                    self.state = if remaining == 0 { DataCrlf } else { Data(remaining) };

                    trace!(len = bytes.len(), "read chunked bytes");
                    return Ok(Some(PayloadItem::Chunk(bytes)));
                }

                DataCrlf => {
                    if src.len() < CRLF.len() {
                        ensure!(src.is_empty() || src[0] == b'\r', ParseError::invalid_body("missing CRLF after chunk data"));
                        return Ok(None);
                    }
                    ensure!(src.starts_with(CRLF), ParseError::invalid_body("missing CRLF after chunk data"));
                    src.advance(CRLF.len());
                    self.state = Size;
                }

                Trailer => match find_crlf(src) {
                    Some(0) => {
                        src.advance(CRLF.len());
                        self.state = End;
                    }
                    Some(line_len) => {
                        trace!(len = line_len, "discard chunked trailer");
                        src.advance(line_len + CRLF.len());
                    }
                    None => {
                        ensure!(src.len() <= MAX_LINE_BYTES, ParseError::invalid_body("chunk trailer line too long"));
                        return Ok(None);
                    }
                },
            }
        }
    }
}
