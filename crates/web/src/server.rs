//! The accept loop.
//!
//! [`Server::bind`] claims the listening socket, [`Server::run`] accepts connections
//! until [`ServerHandle::shutdown`] is called, then waits for every connection task
//! to finish its current cycle.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use keel_http::connection::HttpConnection;
use keel_http::handler::Handler;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::config::Config;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("failed to read the local address: {0}")]
    LocalAddr(#[source] io::Error),
}

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    idle_timeout: Duration,
    shutdown: CancellationToken,
}

/// Stops a running [`Server`] from another task.
#[derive(Debug, Clone)]
pub struct ServerHandle {
    shutdown: CancellationToken,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Server {
    pub async fn bind(config: &Config) -> Result<Self, ServerError> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        info!(%local_addr, "listening");
        Ok(Self { listener, local_addr, idle_timeout: config.idle_timeout(), shutdown: CancellationToken::new() })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle { shutdown: self.shutdown.clone() }
    }

    /// Serves connections until shutdown, then drains them.
    pub async fn run<H>(self, handler: H)
    where
        H: Handler + Send + 'static,
    {
        let Self { listener, idle_timeout, shutdown, .. } = self;
        let handler = Arc::new(handler);
        let tracker = TaskTracker::new();

        loop {
            let accepted = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                accepted = listener.accept() => accepted,
            };

            let (tcp_stream, remote_addr) = match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);
            let shutdown = shutdown.clone();

            tracker.spawn(async move {
                debug!(%remote_addr, "accepted connection");
                let (reader, writer) = tcp_stream.into_split();
                let connection =
                    HttpConnection::new(reader, writer).with_idle_timeout(idle_timeout).with_shutdown(shutdown);

                match connection.process(handler).await {
                    Ok(()) => debug!(%remote_addr, "connection closed"),
                    Err(e) => error!(%remote_addr, cause = %e, "connection aborted"),
                }
            });
        }

        drop(listener);
        tracker.close();
        info!(connections = tracker.len(), "stopped accepting, draining connections");
        tracker.wait().await;
        info!("server stopped");
    }
}
