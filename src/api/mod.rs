//! HTTP transport for the wallet.
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /onlinewallet/balance`
//! - `POST /onlinewallet/deposit`  `{"amount": "50.00"}`
//! - `POST /onlinewallet/withdraw` `{"amount": "50.00"}`
//!
//! The wallet routes are also served as `/OnlineWallet/Balance`,
//! `/OnlineWallet/Deposit` and `/OnlineWallet/Withdraw`.

mod error;
mod health;
mod wallet;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::application::WalletService;
use crate::storage::LedgerStore;

pub use error::ApiError;
pub use wallet::{AmountRequest, AppJson};

/// Where the HTTP server listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the application router around a shared wallet service.
pub fn create_router<S: LedgerStore + 'static>(service: Arc<WalletService<S>>) -> Router {
    Router::new()
        .merge(health::routes())
        .nest("/onlinewallet", wallet::routes::<S>())
        .nest("/OnlineWallet", wallet::routes::<S>())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the wallet over HTTP until Ctrl-C.
pub async fn serve<S: LedgerStore + 'static>(
    service: Arc<WalletService<S>>,
    config: &ServerConfig,
) -> Result<()> {
    let app = create_router(service);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
