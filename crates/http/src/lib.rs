//! A from-scratch HTTP/1.1 connection engine
//!
//! This crate turns a byte stream into request/response cycles: it frames and
//! parses request heads (folded header lines included), extracts bodies framed by
//! `Content-Length` or chunked transfer encoding, hands complete requests to a
//! [`handler::Handler`] and writes the responses back with the headers every
//! response carries.
//!
//! # Features
//!
//! - HTTP/1.1 only, anything else is answered with `505`
//! - Persistent connections, closed on `Connection: close` or after a fatal error
//! - Header folding (obsolete line continuation) support
//! - Chunked transfer encoding with trailer discarding
//! - Idle timeout on every read
//! - Cooperative shutdown between requests
//!
//! # Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use keel_http::connection::HttpConnection;
//! use keel_http::handler::{HandlerError, make_handler};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             match connection.process(handler).await {
//!                 Ok(_) => info!("finished process, connection shutdown"),
//!                 Err(e) => error!("service has error, cause {}, connection shutdown", e),
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
//!     info!(path = request.uri().path(), "request path");
//!     Ok(Response::new(Bytes::from_static(b"Hello World!\r\n")))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: the per-connection request/response cycle
//! - [`protocol`]: message types, errors and the rejection mapping
//! - [`codec`]: request decoding and response encoding
//! - [`handler`]: the handler contract
//!
//! # Limitations
//!
//! - HTTP/1.1 only
//! - No TLS support (use a reverse proxy for HTTPS)
//! - Maximum header size: 8KB
//! - Bodies are buffered completely before the handler runs

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
