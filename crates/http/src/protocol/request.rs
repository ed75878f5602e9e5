//! HTTP request header handling implementation.
//!
//! This module provides the core abstractions for handling HTTP request headers.
//! It wraps the standard `http::Request` type and keeps the pieces of the wire
//! form that handlers may still need after parsing: the request line, the raw
//! head, and whether the target was the `*` form.

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Uri, Version, header};

/// The shape of the request target.
///
/// `OPTIONS * HTTP/1.1` addresses the server itself rather than a resource,
/// so it never takes part in path based dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTarget {
    /// `/path?query`
    AbsolutePath,
    /// the literal `*`
    Asterisk,
}

/// The request head exactly as it arrived, including the terminating blank line.
///
/// Inserted into the request extensions so a handler can echo it back (`TRACE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHead(Bytes);

impl RawHead {
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

/// Represents a parsed HTTP request header.
///
/// Immutable once parsed; a fresh value is produced for every request on a connection.
#[derive(Debug)]
pub struct RequestHeader {
    inner: Request<()>,
    target: RequestTarget,
    request_line: String,
    raw: Bytes,
}

impl AsRef<Request<()>> for RequestHeader {
    fn as_ref(&self) -> &Request<()> {
        &self.inner
    }
}

impl RequestHeader {
    pub(crate) fn new(inner: Request<()>, target: RequestTarget, request_line: String, raw: Bytes) -> Self {
        Self { inner, target, request_line, raw }
    }

    /// Attaches a body to this header, converting it into a full `Request<T>`.
    ///
    /// The target shape and the raw head travel along as request extensions.
    pub fn body<T>(self, body: T) -> Request<T> {
        let Self { inner, target, raw, .. } = self;
        let mut request = inner.map(|()| body);
        request.extensions_mut().insert(target);
        request.extensions_mut().insert(RawHead(raw));
        request
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    /// Returns a reference to the request's URI.
    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Returns a reference to the request's headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    pub fn target(&self) -> RequestTarget {
        self.target
    }

    /// The request path, or `*` for the asterisk form.
    pub fn path(&self) -> &str {
        match self.target {
            RequestTarget::Asterisk => "*",
            RequestTarget::AbsolutePath => self.uri().path(),
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.uri().query()
    }

    /// The request line as received, e.g. `GET /index.html HTTP/1.1`.
    pub fn request_line(&self) -> &str {
        &self.request_line
    }

    /// The raw head, request line through the terminating blank line.
    pub fn raw_head(&self) -> &Bytes {
        &self.raw
    }

    /// Determines if this request conventionally carries a body.
    ///
    /// Only POST and PUT do; for them a missing length framing is an error.
    pub fn expects_body(&self) -> bool {
        matches!(self.method(), &Method::POST | &Method::PUT)
    }

    /// Returns true if either `Content-Length` or `Transfer-Encoding` is present.
    pub fn has_body_framing(&self) -> bool {
        self.headers().contains_key(header::CONTENT_LENGTH) || self.headers().contains_key(header::TRANSFER_ENCODING)
    }

    /// Returns true if the client asked for the connection to be closed after this exchange.
    pub fn wants_close(&self) -> bool {
        self.headers()
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|token| token.trim().eq_ignore_ascii_case("close"))
    }
}
