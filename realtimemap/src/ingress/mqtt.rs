//! MQTT subscriber feeding HFP positions into the entity router.

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, trace, warn};

use super::hfp::{self, HFP_TOPIC};
use crate::actors::ActorId;
use crate::catalog::Catalog;
use crate::error::IngressError;
use crate::tracking::EntityRouter;

/// Broker connection settings.
#[derive(Debug, Clone)]
pub struct MqttIngressConfig {
    /// Broker host.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Subscription filter.
    pub topic: String,
    /// MQTT client id.
    pub client_id: String,
    /// Keep-alive interval.
    pub keep_alive: Duration,
    /// Pause before reconnecting after a connection error.
    pub retry_delay: Duration,
}

impl Default for MqttIngressConfig {
    fn default() -> Self {
        Self {
            host: "mqtt.hsl.fi".to_string(),
            port: 1883,
            topic: HFP_TOPIC.to_string(),
            client_id: "realtimemap".to_string(),
            keep_alive: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Consume the feed until `shutdown` is cancelled, reconnecting on errors.
#[instrument(
    name = "mqtt_ingress",
    skip_all,
    fields(host = %config.host, port = config.port, topic = %config.topic)
)]
pub async fn run_mqtt_ingress(
    config: MqttIngressConfig,
    catalog: Arc<Catalog>,
    router: EntityRouter,
    shutdown: CancellationToken,
) {
    info!("starting MQTT ingress");

    loop {
        if shutdown.is_cancelled() {
            break;
        }

        match run_connection(&config, &catalog, &router, &shutdown).await {
            Ok(()) => break,
            Err(e) => {
                error!(error = %e, retry_in = ?config.retry_delay, "MQTT connection error");
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(config.retry_delay) => {}
                }
            }
        }
    }

    info!("MQTT ingress stopped");
}

async fn run_connection(
    config: &MqttIngressConfig,
    catalog: &Catalog,
    router: &EntityRouter,
    shutdown: &CancellationToken,
) -> Result<(), IngressError> {
    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(config.keep_alive);
    options.set_clean_session(true);

    let (client, mut eventloop) = AsyncClient::new(options, 10);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("shutdown signal received");
                let _ = client.disconnect().await;
                return Ok(());
            }
            event = eventloop.poll() => {
                match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        handle_message(&publish.topic, &publish.payload, catalog, router);
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("connected to MQTT broker");
                        // Clean sessions drop subscriptions, so subscribe on every connect.
                        client
                            .subscribe(&config.topic, QoS::AtMostOnce)
                            .await
                            .map_err(|e| IngressError::Connection(e.to_string()))?;
                    }
                    Ok(Event::Incoming(Packet::SubAck(_))) => {
                        debug!("subscription acknowledged");
                    }
                    Ok(_) => {}
                    Err(e) => return Err(IngressError::Connection(e.to_string())),
                }
            }
        }
    }
}

/// Decode one feed message and route the position.
///
/// Malformed or incomplete messages are dropped. Returns the vehicle actor
/// the position went to.
pub fn handle_message(
    topic: &str,
    payload: &[u8],
    catalog: &Catalog,
    router: &EntityRouter,
) -> Option<ActorId> {
    let position = match hfp::decode(topic, payload, catalog) {
        Ok(Some(position)) => position,
        Ok(None) => {
            trace!(topic, "message without a complete position");
            return None;
        }
        Err(e) => {
            debug!(topic, error = %e, "dropping malformed HFP message");
            return None;
        }
    };

    match router.route(position) {
        Ok(address) => Some(address),
        Err(e) => {
            warn!(topic, error = %e, "failed to route position");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BroadcastBridge;
    use crate::tracking::{TrackingConfig, TrackingSystem};

    fn system() -> TrackingSystem {
        TrackingSystem::start(
            Arc::new(Catalog::builtin().expect("catalog")),
            Arc::new(BroadcastBridge::new(16)),
            &TrackingConfig::default(),
        )
    }

    #[test]
    fn test_default_config() {
        let config = MqttIngressConfig::default();
        assert_eq!(config.host, "mqtt.hsl.fi");
        assert_eq!(config.port, 1883);
        assert_eq!(config.topic, HFP_TOPIC);
    }

    #[tokio::test]
    async fn test_handle_message_routes_position() {
        let system = system();
        let payload = br#"{"VP":{"lat":60.171285,"long":24.943936,"hdg":10,
            "tst":"2024-05-01T10:00:00Z","spd":3.0,"drst":0}}"#;

        let address = handle_message(
            "/hfp/v2/journey/ongoing/vp/bus/0012/00101/1069/1",
            payload,
            system.catalog(),
            system.router(),
        );

        assert_eq!(address, Some(ActorId::vehicle("0012.00101")));
        assert!(system.vehicle_host().contains("0012.00101"));
    }

    #[tokio::test]
    async fn test_handle_message_drops_malformed() {
        let system = system();

        assert_eq!(
            handle_message("/hfp/short", b"{}", system.catalog(), system.router()),
            None
        );
        assert_eq!(
            handle_message(
                "/hfp/v2/journey/ongoing/vp/bus/0012/00101/1069/1",
                b"garbage",
                system.catalog(),
                system.router()
            ),
            None
        );
        assert!(system.vehicle_host().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_before_connect() {
        let system = system();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        run_mqtt_ingress(
            MqttIngressConfig::default(),
            Arc::new(Catalog::builtin().expect("catalog")),
            system.router().clone(),
            shutdown,
        )
        .await;
    }
}
