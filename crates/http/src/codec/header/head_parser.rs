//! Header block unfolding and parsing.
//!
//! Works on a complete head (request line through the terminating blank line) that
//! the framer has already cut out of the stream:
//!
//! 1. fold continuation lines (`CRLF` followed by SP/HT) into a single SP
//! 2. split the block on `CRLF`
//! 3. skip blank lines before the request line
//! 4. validate the request line
//! 5. split every remaining line at the first colon into a lower-cased name and a trimmed value
//!
//! Repeated header names are appended in arrival order, never merged.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Request, Version};
use tracing::trace;

use super::request_line::{RequestLine, parse_request_line};
use crate::protocol::{ParseError, RequestHeader};

const CRLF: &[u8] = b"\r\n";
const TERMINATOR: &[u8] = b"\r\n\r\n";

#[inline]
fn is_fold_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Replaces every `CRLF 1*(SP / HT)` with a single SP.
pub(crate) fn unfold(block: &[u8]) -> Vec<u8> {
    let mut unfolded = Vec::with_capacity(block.len());
    let mut i = 0;
    while i < block.len() {
        if block[i..].starts_with(CRLF) && block.get(i + 2).copied().is_some_and(is_fold_space) {
            i += 2;
            while block.get(i).copied().is_some_and(is_fold_space) {
                i += 1;
            }
            unfolded.push(b' ');
            continue;
        }
        unfolded.push(block[i]);
        i += 1;
    }
    unfolded
}

fn split_lines(block: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = Some(block);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.windows(2).position(|w| w == CRLF) {
            Some(pos) => {
                rest = Some(&current[pos + 2..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

fn parse_header_line(line: &[u8], headers: &mut HeaderMap) -> Result<(), ParseError> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or_else(|| ParseError::invalid_header(format!("missing colon in '{}'", line.escape_ascii())))?;

    let name = HeaderName::from_bytes(&line[..colon])
        .map_err(|_| ParseError::invalid_header(format!("invalid name '{}'", line[..colon].escape_ascii())))?;

    let value = HeaderValue::from_bytes(line[colon + 1..].trim_ascii())
        .map_err(|_| ParseError::invalid_header(format!("invalid value for '{name}'")))?;

    headers.append(name, value);
    Ok(())
}

/// Parses a framed head into a [`RequestHeader`].
///
/// `raw` must end with the blank-line terminator; it is kept as the raw head.
pub(crate) fn parse_head(raw: Bytes) -> Result<RequestHeader, ParseError> {
    let block = raw.strip_suffix(TERMINATOR).unwrap_or(&raw);
    let unfolded = unfold(block);

    let mut lines = split_lines(&unfolded).skip_while(|line| line.trim_ascii().is_empty());

    let line = lines.next().ok_or_else(|| ParseError::invalid_request_line("Invalid HTTP Request"))?;
    let line = std::str::from_utf8(line).map_err(|_| ParseError::invalid_request_line("request line is not ascii"))?;
    let RequestLine { method, uri, target } = parse_request_line(line)?;
    let request_line = line.to_owned();

    let mut headers = HeaderMap::new();
    for line in lines {
        parse_header_line(line, &mut headers)?;
    }
    trace!(header_count = headers.len(), "parsed request headers");

    let mut request = Request::new(());
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.version_mut() = Version::HTTP_11;
    *request.headers_mut() = headers;

    Ok(RequestHeader::new(request, target, request_line, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, header};
    use indoc::indoc;

    fn parse(str: &str) -> Result<RequestHeader, ParseError> {
        let raw = if str.contains("\r\n") { str.to_owned() } else { str.replace('\n', "\r\n") };
        parse_head(Bytes::from(raw))
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##};

        let header = parse(str).unwrap();

        assert_eq!(header.method(), &Method::GET);
        assert_eq!(header.version(), Version::HTTP_11);
        assert_eq!(header.path(), "/index.html");
        assert_eq!(header.query(), None);
        assert_eq!(header.request_line(), "GET /index.html HTTP/1.1");

        assert_eq!(header.headers().len(), 3);
        assert_eq!(header.headers().get(header::ACCEPT).unwrap(), "*/*");
        assert_eq!(header.headers().get(header::HOST).unwrap(), "127.0.0.1:8080");
        assert_eq!(header.headers().get(header::USER_AGENT).unwrap(), "curl/7.79.1");
    }

    #[test]
    fn names_are_lower_cased_and_values_trimmed() {
        let header = parse("GET / HTTP/1.1\nX-CUSTOM-Header:    padded value   \n\n").unwrap();
        let (name, value) = header.headers().iter().next().unwrap();
        assert_eq!(name.as_str(), "x-custom-header");
        assert_eq!(value, "padded value");
    }

    #[test]
    fn repeated_headers_keep_arrival_order() {
        let str = indoc! {r##"
        GET / HTTP/1.1
        Accept: text/html
        Host: localhost
        accept: application/json
        ACCEPT: */*

        "##};

        let header = parse(str).unwrap();
        let accepts = header.headers().get_all(header::ACCEPT).iter().collect::<Vec<_>>();
        assert_eq!(accepts, ["text/html", "application/json", "*/*"]);
    }

    #[test]
    fn folded_value_equals_single_line_value() {
        let folded = parse("POST / HTTP/1.1\r\nX-A: foo\r\n bar\r\n\r\n").unwrap();
        let single = parse("POST / HTTP/1.1\r\nX-A: foo bar\r\n\r\n").unwrap();

        assert_eq!(folded.headers().get("x-a").unwrap(), "foo bar");
        assert_eq!(folded.headers().get("x-a"), single.headers().get("x-a"));
    }

    #[test]
    fn multiple_fold_whitespace_collapses() {
        let header = parse("POST / HTTP/1.1\r\nContent-Type: text/plain;\r\n \t  charset=UTF8\r\n\r\n").unwrap();
        assert_eq!(header.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain; charset=UTF8");
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let header = parse("\r\n  \r\nGET /live HTTP/1.1\r\nHost: a\r\n\r\n").unwrap();
        assert_eq!(header.path(), "/live");
        assert_eq!(header.headers().len(), 1);
    }

    #[test]
    fn blank_head_is_rejected() {
        assert!(matches!(parse("  \r\n\r\n"), Err(ParseError::InvalidRequestLine { .. })));
    }

    #[test]
    fn header_without_colon_is_rejected() {
        assert!(matches!(parse("GET / HTTP/1.1\r\nno colon here\r\n\r\n"), Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn header_with_space_before_colon_is_rejected() {
        assert!(matches!(parse("GET / HTTP/1.1\r\nHost : a\r\n\r\n"), Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn value_may_contain_colons() {
        let header = parse("GET / HTTP/1.1\r\nHost: 127.0.0.1:8080\r\n\r\n").unwrap();
        assert_eq!(header.headers().get(header::HOST).unwrap(), "127.0.0.1:8080");
    }

    #[test]
    fn request_line_errors_propagate() {
        assert!(matches!(parse("GET / HTTP/1.2\r\n\r\n"), Err(ParseError::InvalidVersion(_))));
        assert!(matches!(parse("QUERY / HTTP/1.1\r\n\r\n"), Err(ParseError::InvalidMethod(_))));
    }

    #[test]
    fn unfold_leaves_plain_lines_untouched() {
        assert_eq!(unfold(b"a: b\r\nc: d"), b"a: b\r\nc: d");
        assert_eq!(unfold(b"a: b\r\n\tc"), b"a: b c");
    }
}
