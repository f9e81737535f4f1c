//! EMI Calculator server
//!
//! Serves the EMI API over HTTP until interrupted.
//!
//! # Usage
//!
//! ```bash
//! EMI_DATABASE=emi.db cargo run
//! ```
//!
//! # Environment Variables
//!
//! - `EMI_BIND_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `EMI_DATABASE`: SQLite file; records stay in memory when unset
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use emi_calculator::api::serve;
use emi_calculator::{
    create_router, AppState, Config, EmiService, MemoryStore, Result, SqliteStore, StoreBackend,
};
use log::{info, warn};
use std::future::Future;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    let service = match &config.store {
        StoreBackend::Memory => {
            info!("Using in-memory store; records are lost on exit");
            EmiService::new(MemoryStore::new())
        }
        StoreBackend::Sqlite(path) => EmiService::new(SqliteStore::open(path)?),
    };

    let router = create_router(AppState::new(service));
    serve(router, config.bind_addr, shutdown_signal()).await
}

/// Resolves on SIGINT or SIGTERM.
///
/// Handlers are installed before this returns, so a signal that arrives
/// while the listener is still binding is not lost.
#[cfg(unix)]
fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    use tokio::signal::unix::{signal, SignalKind};

    let interrupt = signal(SignalKind::interrupt());
    let terminate = signal(SignalKind::terminate());

    async move {
        match (interrupt, terminate) {
            (Ok(mut interrupt), Ok(mut terminate)) => {
                tokio::select! {
                    _ = interrupt.recv() => info!("Received SIGINT, shutting down"),
                    _ = terminate.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Cannot listen for shutdown signals: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Resolves on Ctrl+C.
#[cfg(not(unix))]
fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Cannot listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
