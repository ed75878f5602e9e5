use std::future::Future;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use keel_http::handler::HandlerError;

/// A resource handler the [`Router`](crate::Router) dispatches to.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn invoke(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError>;
}

/// Holds an async fn as a [`RequestHandler`]
pub struct FnHandler<F> {
    f: F,
}

pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, HandlerError>> + Send,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, HandlerError>> + Send,
{
    async fn invoke(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        (self.f)(req).await
    }
}
