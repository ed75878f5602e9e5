//! Core HTTP protocol abstractions.
//!
//! This module provides the fundamental building blocks shared by the codec and the
//! connection layer: the decoded message types, the parsed request header, the
//! response head, the error types, and the mapping from failures to canned responses.
//!
//! # Architecture
//!
//! - **Message Handling** ([`message`]): Core message types and payload processing
//!   - [`Message`]: Represents either headers or payload chunks
//!   - [`PayloadItem`]: Handles individual payload chunks and EOF
//!   - [`PayloadSize`]: Tracks how the request body is framed
//!
//! - **Request Processing** ([`request`]): Request header handling
//!   - [`RequestHeader`]: Wraps HTTP request headers with the request line and raw head
//!   - [`RequestTarget`], [`RawHead`]: extensions handed on to handlers
//!
//! - **Response Processing** ([`response`]): Response header handling
//!   - [`ResponseHead`]: Type alias for response headers before body attachment
//!
//! - **Error Handling** ([`error`], [`rejection`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response sending errors
//!   - [`Rejection`]: failure condition to status, body and connection fate

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod request;
pub use request::RawHead;
pub use request::RequestHeader;
pub use request::RequestTarget;

mod response;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;

mod rejection;
pub use rejection::Rejection;
