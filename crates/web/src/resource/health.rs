use bytes::Bytes;
use http::{HeaderValue, Request, Response, header};
use keel_http::handler::HandlerError;
use serde_json::json;

/// Liveness and readiness: the server answering at all is the only check.
pub(super) async fn status(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    let document = json!({ "status": "UP", "checks": [] });
    let body = serde_json::to_vec(&document).map_err(HandlerError::internal)?;

    let content_type = HeaderValue::from_str(mime::APPLICATION_JSON.as_ref()).map_err(HandlerError::internal)?;

    let mut response = Response::new(Bytes::from(body));
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}
