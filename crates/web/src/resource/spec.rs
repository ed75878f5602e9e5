use std::io::Write;

use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use http::{HeaderValue, Request, Response, header};
use keel_http::handler::HandlerError;
use tracing::trace;

const PROTOCOL_NOTES: &str = include_str!("../../assets/protocol.txt");

fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

/// The bundled protocol notes, always gzip encoded.
pub(super) async fn protocol_notes(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    let compressed = gzip(PROTOCOL_NOTES.as_bytes()).map_err(HandlerError::internal)?;
    trace!(plain = PROTOCOL_NOTES.len(), compressed = compressed.len(), "compressed protocol notes");

    let mut response = Response::new(Bytes::from(compressed));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=us-ascii"));
    headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[tokio::test]
    async fn body_inflates_to_the_notes() {
        let response = protocol_notes(Request::new(Bytes::new())).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain; charset=us-ascii");

        let mut plain = String::new();
        GzDecoder::new(&response.body()[..]).read_to_string(&mut plain).unwrap();
        assert_eq!(plain, PROTOCOL_NOTES);
    }
}
