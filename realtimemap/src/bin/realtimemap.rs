//! Realtimemap server: HFP ingestion, tracking actors and the HTTP gateway.
//!
//! ```bash
//! # Live Helsinki feed, gateway on :12345
//! cargo run --bin realtimemap
//!
//! # Gateway only, notifications on, JSON logs
//! cargo run --bin realtimemap -- --no-ingress --emit-geofence-notifications --log-json
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use realtimemap::bridge::BroadcastBridge;
use realtimemap::config::AppConfig;
use realtimemap::gateway::{self, GatewayState};
use realtimemap::ingress::run_mqtt_ingress;
use realtimemap::tracking::TrackingSystem;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,realtimemap=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::parse();
    init_tracing(config.log_json);

    let catalog = Arc::new(config.load_catalog()?);
    let bridge = Arc::new(BroadcastBridge::new(config.notification_buffer));
    let system = Arc::new(TrackingSystem::start(
        Arc::clone(&catalog),
        bridge.clone(),
        &config.tracking_config(),
    ));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("*** STOPPING ***"),
                Err(e) => error!(error = %e, "failed to listen for ctrl-c"),
            }
            shutdown.cancel();
        });
    }

    let ingress = if config.no_ingress {
        info!("MQTT ingress disabled");
        None
    } else {
        Some(tokio::spawn(run_mqtt_ingress(
            config.mqtt_config(),
            Arc::clone(&catalog),
            system.router().clone(),
            shutdown.clone(),
        )))
    };

    let state = GatewayState {
        system,
        bridge,
    };
    let served = gateway::serve(config.http_addr, state, shutdown.clone()).await;
    shutdown.cancel();

    if let Some(ingress) = ingress {
        ingress.await?;
    }
    served?;

    info!("realtimemap stopped");
    Ok(())
}
