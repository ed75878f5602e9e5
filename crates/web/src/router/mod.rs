//! Request dispatch by path and method.
//!
//! Paths are matched with `matchit`. Requests for the `*` target never take part in
//! path matching; they are served from a separate table. `TRACE` requests go to
//! the trace handler whatever their target.

use crate::handler::RequestHandler;

use bytes::Bytes;
use http::{Method, Request, Response};
use keel_http::handler::{Handler, HandlerError};
use keel_http::protocol::RequestTarget;
use std::collections::HashMap;
use tracing::debug;

type InnerRouter<T> = matchit::Router<T>;

/// Main router structure that handles HTTP request routing
pub struct Router {
    inner_router: InnerRouter<Vec<RouterItem>>,
    asterisk: Vec<RouterItem>,
    trace: Option<Box<dyn RequestHandler>>,
}

/// A handler bound to one method
pub struct RouterItem {
    method: Method,
    handler: Box<dyn RequestHandler>,
}

impl Router {
    /// Creates a new router builder
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Returns the items registered for `path`, empty when nothing matches.
    pub fn at(&self, path: &str) -> &[RouterItem] {
        self.inner_router.at(path).map(|matched| matched.value.as_slice()).unwrap_or_default()
    }

    fn items_for(&self, req: &Request<Bytes>) -> &[RouterItem] {
        match req.extensions().get::<RequestTarget>() {
            Some(RequestTarget::Asterisk) => &self.asterisk,
            _ => self.at(req.uri().path()),
        }
    }
}

impl Handler for Router {
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        if req.method() == Method::TRACE {
            if let Some(trace) = &self.trace {
                return trace.invoke(req).await;
            }
        }

        let items = self.items_for(&req);
        if items.is_empty() {
            debug!(path = req.uri().path(), "no route matched");
            return Err(HandlerError::NotFound);
        }

        match items.iter().find(|item| item.method == req.method()) {
            Some(item) => item.handler.invoke(req).await,
            None => Err(HandlerError::MethodNotAllowed),
        }
    }
}

pub struct RouterBuilder {
    data: HashMap<String, Vec<RouterItem>>,
    asterisk: Vec<RouterItem>,
    trace: Option<Box<dyn RequestHandler>>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { data: HashMap::new(), asterisk: Vec::new(), trace: None }
    }

    pub fn route(mut self, route: impl Into<String>, item: RouterItem) -> Self {
        let vec = self.data.entry(route.into()).or_default();
        vec.push(item);
        self
    }

    /// Registers a handler for the `*` request target.
    pub fn asterisk(mut self, item: RouterItem) -> Self {
        self.asterisk.push(item);
        self
    }

    /// Registers the handler answering `TRACE` on any target.
    pub fn trace<H: RequestHandler + 'static>(mut self, handler: H) -> Self {
        self.trace = Some(Box::new(handler));
        self
    }

    /// Builds the router from the accumulated routes
    pub fn build(self) -> Result<Router, matchit::InsertError> {
        let mut inner_router = InnerRouter::new();

        for (path, router_items) in self.data.into_iter() {
            inner_router.insert(path, router_items)?;
        }

        Ok(Router { inner_router, asterisk: self.asterisk, trace: self.trace })
    }
}

macro_rules! method_router_item {
    ($method:ident, $method_const:ident) => {
        pub fn $method<H: RequestHandler + 'static>(handler: H) -> RouterItem {
            RouterItem { method: Method::$method_const, handler: Box::new(handler) }
        }
    };
}

method_router_item!(get, GET);
method_router_item!(post, POST);
method_router_item!(options, OPTIONS);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler_fn;

    async fn hello(_req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        Ok(Response::new(Bytes::from_static(b"hello world")))
    }

    async fn echo_method(req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        Ok(Response::new(Bytes::from(req.method().to_string())))
    }

    fn router() -> Router {
        Router::builder()
            .route("/", get(handler_fn(hello)))
            .route("/", post(handler_fn(echo_method)))
            .route("/2", get(handler_fn(hello)))
            .asterisk(options(handler_fn(echo_method)))
            .trace(handler_fn(echo_method))
            .build()
            .unwrap()
    }

    fn request(method: Method, target: &str) -> Request<Bytes> {
        let mut req = Request::builder().method(method).uri(target).body(Bytes::new()).unwrap();
        let shape = if target == "*" { RequestTarget::Asterisk } else { RequestTarget::AbsolutePath };
        req.extensions_mut().insert(shape);
        req
    }

    #[test]
    fn test_route_at() {
        let router = router();
        assert_eq!(router.at("/").len(), 2);
        assert_eq!(router.at("/2").len(), 1);
        assert!(router.at("/3").is_empty());
    }

    #[tokio::test]
    async fn dispatch_by_method() {
        let router = router();

        let response = router.call(request(Method::GET, "/")).await.unwrap();
        assert_eq!(response.body(), "hello world");

        let response = router.call(request(Method::POST, "/")).await.unwrap();
        assert_eq!(response.body(), "POST");
    }

    #[tokio::test]
    async fn unmatched_path_and_method() {
        let router = router();

        assert!(matches!(router.call(request(Method::GET, "/missing")).await, Err(HandlerError::NotFound)));
        assert!(matches!(router.call(request(Method::DELETE, "/")).await, Err(HandlerError::MethodNotAllowed)));
        assert!(matches!(router.call(request(Method::POST, "/2")).await, Err(HandlerError::MethodNotAllowed)));
    }

    #[tokio::test]
    async fn asterisk_skips_path_matching() {
        let router = router();

        let response = router.call(request(Method::OPTIONS, "*")).await.unwrap();
        assert_eq!(response.body(), "OPTIONS");
        assert!(matches!(router.call(request(Method::GET, "*")).await, Err(HandlerError::MethodNotAllowed)));
        assert!(matches!(router.call(request(Method::OPTIONS, "/")).await, Err(HandlerError::MethodNotAllowed)));
    }

    #[tokio::test]
    async fn trace_on_any_target() {
        let router = router();

        for target in ["/", "/missing", "*"] {
            let response = router.call(request(Method::TRACE, target)).await.unwrap();
            assert_eq!(response.body(), "TRACE");
        }
    }
}
