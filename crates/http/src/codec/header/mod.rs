//! HTTP header processing module for decoding request heads and encoding response heads
//!
//! # Components
//!
//! - [`HeaderDecoder`]: frames a request head out of the byte stream
//!   - Enforces the header size limit
//!   - Selects the body framing
//! - `head_parser`: unfolds continuation lines and parses the header fields
//! - `request_line`: validates the request line
//! - [`HeaderEncoder`]: serializes the response status line and headers

mod head_parser;
mod header_decoder;
mod header_encoder;
mod request_line;

pub(crate) use head_parser::parse_head;
pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
