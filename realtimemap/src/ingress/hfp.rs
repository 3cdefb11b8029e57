//! Decoding of the HSL high-frequency positioning (HFP) feed.
//!
//! Topic layout (segment index after splitting on `/`):
//!
//! ```text
//! 0/1     /2       /3            /4             /5          /6              /7           /8              /9 ...
//!  /<hfp> /<v2>    /<journey>    /<temporal>    /<event>    /<transport>    /<operator>  /<vehicle_no>   /<route> ...
//! ```
//!
//! The payload is a JSON object keyed by event type, e.g.
//! `{"VP": {"lat": 60.17, "long": 24.94, "hdg": 90, "tst": "...", "spd": 8.1, "drst": 0}}`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::IngressError;
use crate::model::Position;

/// Subscription covering every ongoing bus journey.
pub const HFP_TOPIC: &str = "/hfp/v2/journey/ongoing/vp/bus/#";

const OPERATOR_SEGMENT: usize = 7;
const VEHICLE_NUMBER_SEGMENT: usize = 8;
const MIN_TOPIC_SEGMENTS: usize = VEHICLE_NUMBER_SEGMENT + 1;

/// Vehicle identity carried in an HFP topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleTopic {
    /// Operator id, used as the organization id.
    pub operator_id: String,
    /// `"{operator}.{vehicle_number}"`, unique across operators.
    pub vehicle_id: String,
}

/// Extract operator and vehicle id from a topic.
pub fn parse_topic(topic: &str) -> Result<VehicleTopic, IngressError> {
    let segments: Vec<&str> = topic.split('/').collect();
    if segments.len() < MIN_TOPIC_SEGMENTS {
        return Err(IngressError::Topic {
            topic: topic.to_string(),
            expected: MIN_TOPIC_SEGMENTS,
            actual: segments.len(),
        });
    }

    let operator = segments[OPERATOR_SEGMENT];
    let vehicle_number = segments[VEHICLE_NUMBER_SEGMENT];
    Ok(VehicleTopic {
        operator_id: operator.to_string(),
        vehicle_id: format!("{operator}.{vehicle_number}"),
    })
}

/// Fields of one HFP event. Any of them may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HfpPayload {
    /// Longitude in degrees.
    pub long: Option<f64>,
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Heading in degrees.
    pub hdg: Option<i32>,
    /// Door status, 1 when any door is open.
    pub drst: Option<i32>,
    /// Event time.
    pub tst: Option<DateTime<Utc>>,
    /// Speed in meters per second.
    pub spd: Option<f64>,
}

/// An HFP message; exactly one event type is normally present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HfpEvent {
    /// Vehicle position.
    #[serde(rename = "VP")]
    pub vehicle_position: Option<HfpPayload>,
    /// Doors opened.
    #[serde(rename = "DOO")]
    pub door_open: Option<HfpPayload>,
    /// Doors closed.
    #[serde(rename = "DOC")]
    pub door_closed: Option<HfpPayload>,
}

impl HfpEvent {
    /// The first present payload among VP, DOO and DOC.
    pub fn payload(&self) -> Option<&HfpPayload> {
        self.vehicle_position
            .as_ref()
            .or(self.door_open.as_ref())
            .or(self.door_closed.as_ref())
    }
}

/// Build a position. `None` unless every field is present.
pub fn to_position(topic: &VehicleTopic, payload: &HfpPayload, catalog: &Catalog) -> Option<Position> {
    let (Some(latitude), Some(longitude), Some(heading), Some(tst), Some(speed), Some(drst)) = (
        payload.lat,
        payload.long,
        payload.hdg,
        payload.tst,
        payload.spd,
        payload.drst,
    ) else {
        return None;
    };

    Some(Position {
        vehicle_id: topic.vehicle_id.clone(),
        org_id: topic.operator_id.clone(),
        org_name: catalog
            .organization_name(&topic.operator_id)
            .unwrap_or_default()
            .to_string(),
        timestamp: tst.timestamp_millis(),
        longitude,
        latitude,
        heading,
        doors_open: drst == 1,
        speed,
    })
}

/// Decode one MQTT message.
///
/// `Ok(None)` means the message was well formed but carried no usable
/// position (unknown event type or incomplete fields).
pub fn decode(topic: &str, payload: &[u8], catalog: &Catalog) -> Result<Option<Position>, IngressError> {
    let vehicle = parse_topic(topic)?;
    let event: HfpEvent = serde_json::from_slice(payload)?;
    Ok(event
        .payload()
        .and_then(|payload| to_position(&vehicle, payload, catalog)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPIC: &str =
        "/hfp/v2/journey/ongoing/vp/bus/0012/00101/1069/1/Kamppi/12:58/1140439/5/60;24/19/73/47";

    fn catalog() -> Catalog {
        Catalog::builtin().expect("catalog")
    }

    #[test]
    fn test_parse_topic() {
        let topic = parse_topic(TOPIC).expect("valid topic");
        assert_eq!(topic.operator_id, "0012");
        assert_eq!(topic.vehicle_id, "0012.00101");
    }

    #[test]
    fn test_short_topic_is_rejected() {
        let result = parse_topic("/hfp/v2/journey/ongoing/vp/bus/0012");
        assert!(matches!(
            result,
            Err(IngressError::Topic { expected: 9, actual: 8, .. })
        ));
    }

    #[test]
    fn test_decode_vehicle_position() {
        let payload = br#"{"VP":{"desi":"550","lat":60.171285,"long":24.943936,"hdg":127,
            "tst":"2024-05-01T10:00:00.500Z","spd":7.5,"drst":1}}"#;

        let position = decode(TOPIC, payload, &catalog())
            .expect("decodes")
            .expect("complete position");

        assert_eq!(position.vehicle_id, "0012.00101");
        assert_eq!(position.org_id, "0012");
        assert_eq!(position.org_name, "Helsingin Bussiliikenne Oy");
        assert_eq!(position.heading, 127);
        assert_eq!(position.timestamp, 1_714_557_600_500);
        assert!(position.doors_open);
        assert_eq!(position.speed, 7.5);
    }

    #[test]
    fn test_door_events_are_used_when_no_vp() {
        let payload = br#"{"DOC":{"lat":60.0,"long":24.0,"hdg":0,
            "tst":"2024-05-01T10:00:00Z","spd":0.0,"drst":0}}"#;

        let position = decode(TOPIC, payload, &catalog())
            .expect("decodes")
            .expect("position");
        assert!(!position.doors_open);
    }

    #[test]
    fn test_missing_field_yields_nothing() {
        let payload = br#"{"VP":{"lat":60.0,"long":24.0,"hdg":0,
            "tst":"2024-05-01T10:00:00Z","spd":null,"drst":0}}"#;
        assert_eq!(decode(TOPIC, payload, &catalog()).expect("decodes"), None);
    }

    #[test]
    fn test_unknown_event_type_yields_nothing() {
        let payload = br#"{"ARR":{"lat":60.0,"long":24.0}}"#;
        assert_eq!(decode(TOPIC, payload, &catalog()).expect("decodes"), None);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(matches!(
            decode(TOPIC, b"not json", &catalog()),
            Err(IngressError::Payload(_))
        ));
    }

    #[test]
    fn test_unknown_operator_has_empty_name() {
        let topic = "/hfp/v2/journey/ongoing/vp/bus/7777/00001/x";
        let payload = br#"{"VP":{"lat":60.0,"long":24.0,"hdg":0,
            "tst":"2024-05-01T10:00:00Z","spd":1.0,"drst":0}}"#;

        let position = decode(topic, payload, &catalog())
            .expect("decodes")
            .expect("position");
        assert_eq!(position.org_id, "7777");
        assert_eq!(position.org_name, "");
    }
}
