//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! This module serializes the status line and the header section of a response.
//! Besides the handler supplied headers it injects the headers every response
//! carries: `Date`, `Server`, `X-Powered-By`, an `ETag` for successful responses,
//! and a `Content-Length` matching the body exactly.

use std::io;
use std::io::Write;
use std::sync::LazyLock;

use bytes::{BufMut, BytesMut};
use http::{HeaderName, HeaderValue, StatusCode, header};
use tokio_util::codec::Encoder;
use uuid::Uuid;

use crate::protocol::{ResponseHead, SendError};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

const SERVER: HeaderValue = HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

static X_POWERED_BY: LazyLock<HeaderValue> = LazyLock::new(|| {
    let value = format!("Rust ({}; {})", std::env::consts::OS, std::env::consts::ARCH);
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("Rust"))
});

/// headers owned by the encoder, a handler supplied value is dropped
const INJECTED: [HeaderName; 4] = [header::CONTENT_LENGTH, header::TRANSFER_ENCODING, header::DATE, header::SERVER];

/// Encoder for HTTP response heads implementing the [`Encoder`] trait.
///
/// The item is the response head and the exact length of the body that follows.
#[derive(Debug, Default)]
pub struct HeaderEncoder;

fn http_date() -> Result<HeaderValue, SendError> {
    let mut buf = faf_http_date::get_date_buff_no_key();
    faf_http_date::get_date_no_key(&mut buf);
    HeaderValue::from_bytes(&buf).map_err(|e| SendError::invalid_header(format!("date: {e}")))
}

fn etag() -> Result<HeaderValue, SendError> {
    HeaderValue::from_str(&format!("\"{}\"", Uuid::new_v4())).map_err(|e| SendError::invalid_header(format!("etag: {e}")))
}

#[inline]
fn put_header(dst: &mut BytesMut, name: &[u8], value: &[u8]) {
    dst.put_slice(name);
    dst.put_slice(b": ");
    dst.put_slice(value);
    dst.put_slice(b"\r\n");
}

impl Encoder<(ResponseHead, usize)> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers into the provided bytes buffer.
    ///
    /// Only HTTP/1.1 is ever written, whatever version the head carries.
    fn encode(&mut self, item: (ResponseHead, usize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (head, body_len) = item;
        let status = head.status();

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason_phrase(status))?;

        put_header(dst, header::DATE.as_ref(), http_date()?.as_bytes());
        put_header(dst, header::SERVER.as_ref(), SERVER.as_bytes());
        put_header(dst, b"x-powered-by", X_POWERED_BY.as_bytes());
        if status.is_success() {
            put_header(dst, header::ETAG.as_ref(), etag()?.as_bytes());
        }

        // Write all handler headers, multi-values in insertion order
        for (header_name, header_value) in head.headers().iter() {
            if INJECTED.contains(header_name) {
                continue;
            }
            put_header(dst, header_name.as_ref(), header_value.as_bytes());
        }

        write!(FastWrite(dst), "content-length: {body_len}\r\n")?;
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

fn reason_phrase(status: StatusCode) -> &'static str {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR => "Server Error",
        _ => status.canonical_reason().unwrap_or("Unknown"),
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Response;

    fn encode(head: ResponseHead, body_len: usize) -> String {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode((head, body_len), &mut dst).unwrap();
        String::from_utf8(dst.to_vec()).unwrap()
    }

    fn lines(encoded: &str) -> Vec<&str> {
        encoded.split("\r\n").collect()
    }

    #[test]
    fn status_line_and_injected_headers() {
        let encoded = encode(Response::new(()), 5);
        let lines = lines(&encoded);

        assert_eq!(lines[0], "HTTP/1.1 200 OK");
        assert!(lines[1].starts_with("date: ") && lines[1].ends_with("GMT"));
        assert_eq!(lines[2], concat!("server: ", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        assert!(lines[3].starts_with("x-powered-by: Rust"));
        assert!(lines[4].starts_with("etag: \"") && lines[4].ends_with('"'));
        assert_eq!(lines[5], "content-length: 5");
        assert!(encoded.ends_with("\r\n\r\n"));
    }

    #[test]
    fn etag_only_for_success() {
        let mut head = Response::new(());
        *head.status_mut() = StatusCode::NOT_FOUND;
        let encoded = encode(head, 0);

        assert!(encoded.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(!encoded.contains("etag"));
        assert!(encoded.contains("content-length: 0\r\n"));
    }

    #[test]
    fn etag_is_fresh_per_response() {
        let etag_line = |encoded: String| encoded.lines().find(|line| line.starts_with("etag")).map(str::to_owned);
        assert_ne!(etag_line(encode(Response::new(()), 0)), etag_line(encode(Response::new(()), 0)));
    }

    #[test]
    fn handler_headers_keep_order_and_lose_framing() {
        let head = Response::builder()
            .header(header::CONTENT_TYPE, "text/plain")
            .header(header::SET_COOKIE, "a=1")
            .header(header::SET_COOKIE, "b=2")
            .header(header::CONTENT_LENGTH, "999")
            .header(header::TRANSFER_ENCODING, "chunked")
            .body(())
            .unwrap();

        let encoded = encode(head, 3);

        let cookie_a = encoded.find("set-cookie: a=1").unwrap();
        let cookie_b = encoded.find("set-cookie: b=2").unwrap();
        assert!(cookie_a < cookie_b);
        assert!(encoded.contains("content-type: text/plain\r\n"));
        assert!(encoded.contains("content-length: 3\r\n"));
        assert!(!encoded.contains("999"));
        assert!(!encoded.contains("transfer-encoding"));
    }

    #[test]
    fn every_status_has_a_reason() {
        let mut head = Response::new(());
        *head.status_mut() = StatusCode::HTTP_VERSION_NOT_SUPPORTED;
        assert!(encode(head, 0).starts_with("HTTP/1.1 505 HTTP Version Not Supported\r\n"));

        let mut head = Response::new(());
        *head.status_mut() = StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE;
        assert!(encode(head, 0).starts_with("HTTP/1.1 431 Request Header Fields Too Large\r\n"));
    }

    #[test]
    fn internal_error_reads_server_error() {
        let mut head = Response::new(());
        *head.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        assert!(encode(head, 0).starts_with("HTTP/1.1 500 Server Error\r\n"));
    }
}
