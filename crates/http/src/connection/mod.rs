//! HTTP connection handling module
//!
//! This module drives one client connection through repeated request/response
//! cycles until either side ends it.
//!
//! # Components
//!
//! - [`HttpConnection`]: Main connection handler that:
//!   - Reads and decodes requests, bodies included
//!   - Answers malformed requests with canned responses
//!   - Dispatches valid requests to a [`Handler`](crate::handler::Handler)
//!   - Keeps the connection alive unless the client or a fatal error says otherwise
//!   - Enforces an idle timeout on every read
//!   - Stops between requests once shutdown is signalled

mod http_connection;
mod message_writer;

pub use http_connection::{DEFAULT_IDLE_TIMEOUT, HttpConnection};
