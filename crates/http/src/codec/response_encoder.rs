//! HTTP response encoder.
//!
//! Serializes a complete `Response<Bytes>`: the head through [`HeaderEncoder`],
//! which sets `Content-Length` from the body, then the body bytes verbatim.

use crate::codec::header::HeaderEncoder;
use crate::protocol::SendError;
use bytes::{BufMut, Bytes, BytesMut};
use http::Response;
use tokio_util::codec::Encoder;

#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Encoder<Response<Bytes>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (parts, body) = item.into_parts();
        let head = Response::from_parts(parts, ());

        self.header_encoder.encode((head, body.len()), dst)?;
        dst.reserve(body.len());
        dst.put(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{StatusCode, header};

    #[test]
    fn head_then_body() {
        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Bytes::from_static(b"Hello World!"))
            .unwrap();

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();

        let encoded = std::str::from_utf8(&dst).unwrap();
        assert!(encoded.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(encoded.contains("content-length: 12\r\n"));
        assert!(encoded.ends_with("\r\n\r\nHello World!"));
    }

    #[test]
    fn empty_body_has_zero_length() {
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = StatusCode::LENGTH_REQUIRED;

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();

        let encoded = std::str::from_utf8(&dst).unwrap();
        assert!(encoded.starts_with("HTTP/1.1 411 Length Required\r\n"));
        assert!(encoded.ends_with("content-length: 0\r\n\r\n"));
    }
}
