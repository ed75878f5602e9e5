//! Mapping from failure conditions to canned responses.
//!
//! Every condition the engine answers on its own, without the handler producing
//! a response, is a [`Rejection`]. The mapping is pure: status, body, and whether
//! the connection must be closed once the response has been written.

use bytes::Bytes;
use http::{HeaderValue, Response, StatusCode, header};

use crate::handler::HandlerError;
use crate::protocol::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// malformed request line, header syntax, target or body framing
    BadRequest(&'static str),
    /// header block exceeded the framing limit
    HeaderTooLarge,
    /// method token outside the supported set
    NotImplemented,
    /// protocol version other than HTTP/1.1
    VersionNotSupported,
    /// POST or PUT without `Content-Length` or `Transfer-Encoding`
    LengthRequired,
    /// known method the matched resource does not serve
    MethodNotAllowed,
    NotFound,
    /// a handler refused the request data
    InvalidData(String),
    /// a handler failed
    ServerError,
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::BadRequest(_) | Rejection::InvalidData(_) => StatusCode::BAD_REQUEST,
            Rejection::HeaderTooLarge => StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
            Rejection::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Rejection::VersionNotSupported => StatusCode::HTTP_VERSION_NOT_SUPPORTED,
            Rejection::LengthRequired => StatusCode::LENGTH_REQUIRED,
            Rejection::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::NotFound => StatusCode::NOT_FOUND,
            Rejection::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the connection is closed after this rejection has been sent.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Rejection::BadRequest(_) | Rejection::HeaderTooLarge | Rejection::NotImplemented | Rejection::VersionNotSupported
        )
    }

    /// The plain-text reason sent as the body, empty when the status line says it all.
    pub fn body(&self) -> Bytes {
        match self {
            Rejection::BadRequest(reason) => Bytes::from_static(reason.as_bytes()),
            Rejection::InvalidData(reason) => Bytes::from(reason.clone()),
            Rejection::HeaderTooLarge => Bytes::from_static(b"Request Header Fields Too Large"),
            Rejection::NotFound => Bytes::from_static(b"The requested resource could not be found"),
            Rejection::ServerError => Bytes::from_static(b"Internal Server Error"),
            Rejection::NotImplemented
            | Rejection::VersionNotSupported
            | Rejection::LengthRequired
            | Rejection::MethodNotAllowed => Bytes::new(),
        }
    }

    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status();
        let body = self.body();
        let has_body = !body.is_empty();

        let mut response = Response::new(body);
        *response.status_mut() = status;
        if has_body {
            response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        }
        response
    }

    /// Maps a request decoding failure, `None` for transport failures which get no response.
    pub fn from_parse_error(error: &ParseError) -> Option<Self> {
        let rejection = match error {
            ParseError::TooLargeHeader { .. } => Rejection::HeaderTooLarge,
            ParseError::InvalidHeader { .. } => Rejection::BadRequest("Invalid HTTP Header"),
            ParseError::InvalidRequestLine { .. } => Rejection::BadRequest("Invalid HTTP Method Syntax"),
            ParseError::InvalidVersion(_) => Rejection::VersionNotSupported,
            ParseError::InvalidMethod(_) => Rejection::NotImplemented,
            ParseError::InvalidUri(_) => Rejection::BadRequest("Invalid HTTP URI"),
            ParseError::InvalidContentLength { .. }
            | ParseError::InvalidTransferEncoding { .. }
            | ParseError::InvalidBody { .. } => Rejection::BadRequest("Invalid HTTP Body"),
            ParseError::ConnectionClosed | ParseError::IdleTimeout(_) | ParseError::Io { .. } => return None,
        };
        Some(rejection)
    }
}

impl From<HandlerError> for Rejection {
    fn from(error: HandlerError) -> Self {
        match error {
            HandlerError::NotFound => Rejection::NotFound,
            HandlerError::MethodNotAllowed => Rejection::MethodNotAllowed,
            HandlerError::BadRequest { reason } => Rejection::InvalidData(reason),
            HandlerError::Internal { .. } => Rejection::ServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[test]
    fn protocol_failures_are_fatal() {
        let fatal = [
            ParseError::invalid_header("no colon"),
            ParseError::invalid_request_line("two tokens"),
            ParseError::InvalidVersion("HTTP/1.2".into()),
            ParseError::InvalidMethod("QUERY".into()),
            ParseError::InvalidUri("index.html".into()),
            ParseError::invalid_body("bad chunk size"),
            ParseError::too_large_header(9000, 8192),
        ];

        for error in &fatal {
            let rejection = Rejection::from_parse_error(error).unwrap();
            assert!(rejection.is_fatal(), "{error} should close the connection");
        }
    }

    #[test]
    fn status_mapping() {
        let status = |e: ParseError| Rejection::from_parse_error(&e).unwrap().status();

        assert_eq!(status(ParseError::InvalidVersion("HTTP/1.0".into())), StatusCode::HTTP_VERSION_NOT_SUPPORTED);
        assert_eq!(status(ParseError::InvalidMethod("QUERY".into())), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(status(ParseError::InvalidUri("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ParseError::invalid_content_length("abc")), StatusCode::BAD_REQUEST);
        assert_eq!(status(ParseError::too_large_header(1, 0)), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
    }

    #[test]
    fn transport_failures_get_no_response() {
        assert!(Rejection::from_parse_error(&ParseError::ConnectionClosed).is_none());
        assert!(Rejection::from_parse_error(&ParseError::IdleTimeout(Duration::from_secs(10))).is_none());
        assert!(Rejection::from_parse_error(&ParseError::from(io::Error::from(io::ErrorKind::BrokenPipe))).is_none());
    }

    #[test]
    fn handler_failures_keep_the_connection() {
        let cases = [
            (HandlerError::NotFound, StatusCode::NOT_FOUND),
            (HandlerError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
            (HandlerError::bad_request("Invalid Request Data"), StatusCode::BAD_REQUEST),
            (HandlerError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            let rejection = Rejection::from(error);
            assert_eq!(rejection.status(), expected);
            assert!(!rejection.is_fatal());
        }

        assert!(!Rejection::LengthRequired.is_fatal());
    }

    #[test]
    fn canned_bodies() {
        let response = Rejection::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(&response.body()[..], b"The requested resource could not be found");

        let response = Rejection::VersionNotSupported.into_response();
        assert!(response.body().is_empty());
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
