//! HTTP body handling module for processing request payloads
//!
//! This module decodes request bodies using the framing announced by the head.
//!
//! # Components
//!
//! - [`ChunkedDecoder`](chunked_decoder::ChunkedDecoder): chunked transfer encoded payloads
//! - [`LengthDecoder`](length_decoder::LengthDecoder): fixed-length payloads, handed out in bounded pieces
//! - [`PayloadDecoder`]: dispatches to one of the above, or ends at once for bodiless requests

mod chunked_decoder;
mod length_decoder;
mod payload_decoder;

pub use payload_decoder::PayloadDecoder;
