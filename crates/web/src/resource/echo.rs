use bytes::Bytes;
use http::{HeaderValue, Request, Response, header};
use keel_http::handler::HandlerError;
use keel_http::protocol::RawHead;

/// Sends the body back with the request's content type.
pub(super) async fn echo(req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    let content_type = match req.headers().get(header::CONTENT_TYPE) {
        Some(content_type) => content_type.clone(),
        None => HeaderValue::from_str(mime::APPLICATION_OCTET_STREAM.as_ref()).map_err(HandlerError::internal)?,
    };

    let mut response = Response::new(req.into_body());
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}

pub(super) async fn ping(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    Ok(Response::new(Bytes::new()))
}

/// Sends the request head back exactly as it was received.
pub(super) async fn trace(req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    let raw_head = req
        .extensions()
        .get::<RawHead>()
        .map(|head| head.as_bytes().clone())
        .ok_or_else(|| HandlerError::internal("request head was not kept"))?;

    let mut response = Response::new(raw_head);
    response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("message/http"));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_defaults_to_octet_stream() {
        let response = echo(Request::new(Bytes::from_static(b"\x00\x01"))).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
        assert_eq!(response.body(), &b"\x00\x01"[..]);
    }

    #[tokio::test]
    async fn echo_mirrors_content_type() {
        let req = Request::builder().header(header::CONTENT_TYPE, "text/csv").body(Bytes::from_static(b"a,b")).unwrap();
        let response = echo(req).await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(response.body(), "a,b");
    }

    #[tokio::test]
    async fn trace_needs_the_raw_head() {
        assert!(matches!(trace(Request::new(Bytes::new())).await, Err(HandlerError::Internal { .. })));
    }
}
