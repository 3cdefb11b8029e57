//! Position ingestion from the HSL HFP feed.
//!
//! [`hfp`] turns topics and payloads into [`Position`](crate::model::Position)s;
//! [`mqtt`] subscribes to the broker and hands them to the
//! [`EntityRouter`](crate::tracking::EntityRouter).

pub mod hfp;
pub mod mqtt;

pub use hfp::{decode, parse_topic, HfpEvent, HfpPayload, VehicleTopic, HFP_TOPIC};
pub use mqtt::{handle_message, run_mqtt_ingress, MqttIngressConfig};
