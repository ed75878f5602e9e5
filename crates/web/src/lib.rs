//! The outer parts of the keel server: configuration, the router, the resources it
//! serves, and the accept loop feeding connections to `keel_http`.

pub mod config;
mod handler;
pub mod resource;
pub mod router;
pub mod server;

pub use config::Config;
pub use handler::FnHandler;
pub use handler::RequestHandler;
pub use handler::handler_fn;
pub use router::Router;
pub use server::{Server, ServerError, ServerHandle};
