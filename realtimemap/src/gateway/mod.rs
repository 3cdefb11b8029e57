//! HTTP query gateway.
//!
//! - `GET /api/v1/organization` - organizations owning at least one geofence
//! - `GET /api/v1/organization/:id` - organization with live geofence state
//! - `GET /api/v1/trail/:id` - trail of one vehicle
//! - `GET /ws` - websocket relaying geofence notifications

mod error;
mod handlers;
mod ws;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bridge::BroadcastBridge;
use crate::tracking::TrackingSystem;

pub use error::GatewayError;

/// Shared state of all handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Query facade over the actors.
    pub system: Arc<TrackingSystem>,
    /// Source of websocket notifications.
    pub bridge: Arc<BroadcastBridge>,
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/v1/organization", get(handlers::list_organizations))
        .route("/api/v1/organization/:id", get(handlers::organization_details))
        .route("/api/v1/trail/:id", get(handlers::vehicle_trail))
        .route("/ws", get(ws::notifications))
        .with_state(state)
}

/// Serve the gateway until `shutdown` is cancelled.
pub async fn serve(
    addr: SocketAddr,
    state: GatewayState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("HTTP gateway stopped");
    Ok(())
}
