//! Inbound callbacks from the scheduler and the payment provider.

pub mod routes;

use crate::error::Result;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;

/// Binds `addr` and serves `router` until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
