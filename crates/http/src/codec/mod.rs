//! HTTP codec module for decoding requests and encoding responses
//!
//! This module provides the streaming side of the protocol. Incoming bytes are
//! turned into request heads and body pieces by a state machine; outgoing
//! responses are serialized in one go.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Decodes incoming HTTP requests
//!   - Head framing, unfolding and parsing via the `header` module
//!   - Payload decoding via the `body` module
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: Encodes outgoing HTTP responses
//!   - Status line and header injection via the `header` module
//!
//! # Example
//!
//! ```no_run
//! use keel_http::codec::{RequestDecoder, ResponseEncoder};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::{Bytes, BytesMut};
//!
//! // Decode incoming request
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from("GET / HTTP/1.1\r\n\r\n");
//! let request = decoder.decode(&mut request_buffer);
//!
//! // Encode outgoing response
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! let _ = encoder.encode(http::Response::new(Bytes::from_static(b"ok")), &mut response_buffer);
//! ```

mod body;
pub(crate) mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
