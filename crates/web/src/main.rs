use std::error::Error;

use clap::Parser;
use keel_web::{Config, Server, ServerHandle, resource};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(config.log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(hostname = %config.hostname, port = config.port, "starting keel");

    let router = resource::router()?;
    let server = Server::bind(&config).await?;
    tokio::spawn(stop_on_signal(server.handle()));

    server.run(router).await;
    Ok(())
}

async fn stop_on_signal(handle: ServerHandle) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(cause = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(cause = %e, "cannot listen for ctrl-c");
                return;
            }
        }
        () = terminate => {}
    }

    info!("shutdown requested");
    handle.shutdown();
}
