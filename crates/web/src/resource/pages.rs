use bytes::Bytes;
use http::{HeaderValue, Request, Response, header};
use keel_http::handler::HandlerError;

const INDEX_HTML: &str = "\
<!DOCTYPE html>
<html>
<head>
<meta charset=\"UTF-8\">
<title>Basic HTTP Server</title>
</head>
<body>
It works
</body>
</html>
";

const PAGE_HTML: &str = "\
<!DOCTYPE html>
<html>
<head>
<meta charset=\"UTF-8\">
<title>Basic HTTP Server</title>
<script src=\"/app.js\" defer></script>
</head>
<body>
<p id=\"status\">Loading...</p>
</body>
</html>
";

const APP_JS: &str = "\
document.addEventListener('DOMContentLoaded', function () {
  fetch('/live')
    .then(function (response) { return response.json(); })
    .then(function (health) {
      document.getElementById('status').textContent = 'Server is ' + health.status;
    })
    .catch(function (error) {
      document.getElementById('status').textContent = 'Server unreachable: ' + error;
    });
});
";

fn text_response(body: &'static str, content_type: &mime::Mime) -> Result<Response<Bytes>, HandlerError> {
    let content_type = HeaderValue::from_str(content_type.as_ref()).map_err(HandlerError::internal)?;

    let mut response = Response::new(Bytes::from_static(body.as_bytes()));
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}

pub(super) async fn index(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    text_response(INDEX_HTML, &mime::TEXT_HTML_UTF_8)
}

pub(super) async fn page(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    text_response(PAGE_HTML, &mime::TEXT_HTML_UTF_8)
}

pub(super) async fn app_js(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
    text_response(APP_JS, &mime::APPLICATION_JAVASCRIPT)
}
