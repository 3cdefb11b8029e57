//! Process configuration from the command line and environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::actors::{RuntimeConfig, DEFAULT_MAX_LOG_BYTES, DEFAULT_MAX_LOG_ENTRIES};
use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::ingress::{MqttIngressConfig, HFP_TOPIC};
use crate::tracking::TrackingConfig;

/// Command line arguments. Every flag can also be set through the
/// environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "realtimemap")]
#[command(about = "Live transit vehicle tracking with geofences", long_about = None)]
pub struct AppConfig {
    /// Address the HTTP gateway listens on
    #[arg(long, env = "REALTIMEMAP_HTTP_ADDR", default_value = "0.0.0.0:12345")]
    pub http_addr: SocketAddr,

    /// MQTT broker host
    #[arg(long, env = "REALTIMEMAP_MQTT_HOST", default_value = "mqtt.hsl.fi")]
    pub mqtt_host: String,

    /// MQTT broker port
    #[arg(long, env = "REALTIMEMAP_MQTT_PORT", default_value_t = 1883)]
    pub mqtt_port: u16,

    /// HFP subscription filter
    #[arg(long, env = "REALTIMEMAP_MQTT_TOPIC", default_value = HFP_TOPIC)]
    pub mqtt_topic: String,

    /// MQTT client id
    #[arg(long, env = "REALTIMEMAP_MQTT_CLIENT_ID", default_value = "realtimemap")]
    pub mqtt_client_id: String,

    /// Seconds to wait before reconnecting to the broker
    #[arg(long, env = "REALTIMEMAP_RETRY_DELAY_SECS", default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// Run without the MQTT feed (gateway only)
    #[arg(long, env = "REALTIMEMAP_NO_INGRESS")]
    pub no_ingress: bool,

    /// Catalog JSON file replacing the built-in Helsinki data
    #[arg(long, env = "REALTIMEMAP_CATALOG", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Journal entries per actor incarnation before compaction
    #[arg(long, env = "REALTIMEMAP_MAX_LOG_ENTRIES", default_value_t = DEFAULT_MAX_LOG_ENTRIES)]
    pub max_log_entries: usize,

    /// Journal bytes per actor incarnation before compaction
    #[arg(long, env = "REALTIMEMAP_MAX_LOG_BYTES", default_value_t = DEFAULT_MAX_LOG_BYTES)]
    pub max_log_bytes: usize,

    /// Send enter/exit notifications from geofences
    #[arg(long, env = "REALTIMEMAP_EMIT_GEOFENCE_NOTIFICATIONS")]
    pub emit_geofence_notifications: bool,

    /// Notifications buffered per websocket client
    #[arg(long, env = "REALTIMEMAP_NOTIFICATION_BUFFER", default_value_t = 1024)]
    pub notification_buffer: usize,

    /// Emit logs as JSON lines
    #[arg(long, env = "REALTIMEMAP_LOG_JSON")]
    pub log_json: bool,
}

impl AppConfig {
    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::builtin(),
        }
    }

    /// Actor runtime settings.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::builder()
            .max_log_entries(self.max_log_entries)
            .max_log_bytes(self.max_log_bytes)
            .build()
    }

    /// Tracking system settings.
    pub fn tracking_config(&self) -> TrackingConfig {
        TrackingConfig {
            runtime: self.runtime_config(),
            emit_geofence_notifications: self.emit_geofence_notifications,
        }
    }

    /// MQTT ingress settings.
    pub fn mqtt_config(&self) -> MqttIngressConfig {
        MqttIngressConfig {
            host: self.mqtt_host.clone(),
            port: self.mqtt_port,
            topic: self.mqtt_topic.clone(),
            client_id: self.mqtt_client_id.clone(),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            ..MqttIngressConfig::default()
        }
    }
}
