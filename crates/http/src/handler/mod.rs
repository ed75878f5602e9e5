//! The contract between the connection engine and application code.
//!
//! A [`Handler`] receives a fully buffered request and either produces a response
//! or reports a [`HandlerError`], which the engine turns into a canned status response.

use std::error::Error;
use std::future::Future;

use bytes::Bytes;
use http::{Request, Response};
use thiserror::Error;

#[trait_variant::make(Send)]
pub trait Handler: Sync {
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError>;
}

/// Why a handler produced no response.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// no resource matches the request path
    #[error("resource not found")]
    NotFound,

    /// the resource exists but does not serve the request method
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("bad request: {reason}")]
    BadRequest { reason: String },

    #[error("handler failed: {source}")]
    Internal {
        #[from]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl HandlerError {
    pub fn bad_request<S: ToString>(reason: S) -> Self {
        Self::BadRequest { reason: reason.to_string() }
    }

    pub fn internal<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> Self {
        Self::Internal { source: e.into() }
    }
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response<Bytes>, HandlerError>> + Send,
{
    async fn call(&self, req: Request<Bytes>) -> Result<Response<Bytes>, HandlerError> {
        (self.f)(req).await
    }
}

/// Adapts an async function into a [`Handler`].
pub fn make_handler<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut,
    Fut: Future<Output = Result<Response<Bytes>, HandlerError>>,
{
    HandlerFn { f }
}
