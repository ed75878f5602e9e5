//! Request-line validation.
//!
//! A request line is exactly `method SP target SP version`. The checks run in a
//! fixed order: token count, protocol version, method, target. The first failing
//! check decides the status the client gets back.

use http::{Method, Uri};

use crate::ensure;
use crate::protocol::{ParseError, RequestTarget};

const HTTP_11: &str = "HTTP/1.1";

/// The validated parts of a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestLine {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) target: RequestTarget,
}

/// Maps a method token onto the supported set, ignoring ASCII case.
fn parse_method(token: &str) -> Option<Method> {
    let method = match token.to_ascii_uppercase().as_str() {
        "OPTIONS" => Method::OPTIONS,
        "HEAD" => Method::HEAD,
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        "TRACE" => Method::TRACE,
        "CONNECT" => Method::CONNECT,
        _ => return None,
    };
    Some(method)
}

/// `^/\S*$` or exactly `*`.
fn parse_target(token: &str) -> Result<(Uri, RequestTarget), ParseError> {
    if token == "*" {
        return Ok((Uri::from_static("*"), RequestTarget::Asterisk));
    }

    ensure!(token.starts_with('/'), ParseError::InvalidUri(token.to_owned()));
    ensure!(!token.bytes().any(|b| b.is_ascii_whitespace()), ParseError::InvalidUri(token.to_owned()));

    let uri = token.parse::<Uri>().map_err(|_| ParseError::InvalidUri(token.to_owned()))?;
    Ok((uri, RequestTarget::AbsolutePath))
}

pub(crate) fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let line = line.trim_end_matches(|c: char| c.is_ascii_whitespace());
    // split on every single whitespace char, so doubled separators yield empty tokens
    let tokens = line.split(|c: char| c.is_ascii_whitespace()).collect::<Vec<_>>();
    let [method, target, version] = tokens.as_slice() else {
        return Err(ParseError::invalid_request_line(format!("expect 3 tokens but found {}", tokens.len())));
    };

    ensure!(version.eq_ignore_ascii_case(HTTP_11), ParseError::InvalidVersion((*version).to_owned()));

    let method_token = *method;
    let method = parse_method(method_token).ok_or_else(|| ParseError::InvalidMethod(method_token.to_owned()))?;

    // the method must be the literal prefix of the line, followed by a single space
    let prefix = line.get(..method.as_str().len() + 1).unwrap_or_default();
    ensure!(
        prefix.eq_ignore_ascii_case(&format!("{} ", method.as_str())),
        ParseError::invalid_request_line("method must be followed by a single space")
    );

    let (uri, target) = parse_target(target)?;

    Ok(RequestLine { method, uri, target })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_get() {
        let line = parse_request_line("GET /index.html?a=1 HTTP/1.1").unwrap();
        assert_eq!(line.method, Method::GET);
        assert_eq!(line.target, RequestTarget::AbsolutePath);
        assert_eq!(line.uri.path(), "/index.html");
        assert_eq!(line.uri.query(), Some("a=1"));
    }

    #[test]
    fn method_and_version_ignore_case() {
        let line = parse_request_line("post /echo http/1.1").unwrap();
        assert_eq!(line.method, Method::POST);
    }

    #[test]
    fn asterisk_form() {
        let line = parse_request_line("OPTIONS * HTTP/1.1").unwrap();
        assert_eq!(line.method, Method::OPTIONS);
        assert_eq!(line.target, RequestTarget::Asterisk);
    }

    #[test]
    fn token_count_must_be_three() {
        for line in ["GET /", "GET / HTTP/1.1 extra", "GET  / HTTP/1.1", " GET / HTTP/1.1", ""] {
            assert!(
                matches!(parse_request_line(line), Err(ParseError::InvalidRequestLine { .. })),
                "{line:?} should be rejected"
            );
        }
    }

    #[test]
    fn trailing_whitespace_is_ignored() {
        for line in ["GET / HTTP/1.1 ", "GET /a HTTP/1.1\t", "GET /a HTTP/1.1  "] {
            let parsed = parse_request_line(line).unwrap();
            assert_eq!(parsed.method, Method::GET, "{line:?}");
        }
    }

    #[test]
    fn unsupported_version() {
        for line in ["GET / HTTP/1.2", "GET / HTTP/1.0", "GET / HTTP/2"] {
            assert!(matches!(parse_request_line(line), Err(ParseError::InvalidVersion(_))));
        }
    }

    #[test]
    fn version_is_checked_before_method() {
        assert!(matches!(parse_request_line("QUERY / HTTP/1.0"), Err(ParseError::InvalidVersion(_))));
    }

    #[test]
    fn unknown_method() {
        for line in ["QUERY / HTTP/1.1", "GETX / HTTP/1.1", "PATCH / HTTP/1.1"] {
            assert!(matches!(parse_request_line(line), Err(ParseError::InvalidMethod(_))));
        }
    }

    #[test]
    fn method_must_be_followed_by_space() {
        assert!(matches!(parse_request_line("GET\t/ HTTP/1.1"), Err(ParseError::InvalidRequestLine { .. })));
    }

    #[test]
    fn target_shape() {
        for line in ["GET index.html HTTP/1.1", "GET http://localhost/ HTTP/1.1", "GET ** HTTP/1.1"] {
            assert!(matches!(parse_request_line(line), Err(ParseError::InvalidUri(_))), "{line:?}");
        }
    }
}
