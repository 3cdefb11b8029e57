//! Domain values exchanged between actors and exposed by the gateway.
//!
//! All JSON field names are camelCase, matching what browser clients of the
//! map expect.

use serde::{Deserialize, Serialize};

use crate::geo;

/// A vehicle position report, produced once per ingestion event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Vehicle id, unique across operators (e.g. `"0012.01234"`).
    pub vehicle_id: String,
    /// Operating organization id.
    pub org_id: String,
    /// Operating organization display name (empty when unknown).
    pub org_name: String,
    /// Report time in epoch milliseconds.
    pub timestamp: i64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Heading in integer degrees.
    pub heading: i32,
    /// Whether any door is open.
    pub doors_open: bool,
    /// Speed in meters per second.
    pub speed: f64,
}

/// Ordered vehicle trail, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionBatch {
    /// Positions, oldest to newest.
    pub positions: Vec<Position>,
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A named circular zone. Static reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularGeofence {
    /// Unique zone name.
    pub name: String,
    /// Zone center.
    pub center: Coordinate,
    /// Radius in meters.
    pub radius_in_meters: f64,
}

impl CircularGeofence {
    /// Create a geofence.
    pub fn new(name: impl Into<String>, center: Coordinate, radius_in_meters: f64) -> Self {
        Self {
            name: name.into(),
            center,
            radius_in_meters,
        }
    }

    /// Whether the point lies strictly inside the zone.
    pub fn includes_position(&self, latitude: f64, longitude: f64) -> bool {
        geo::contains(
            self.center,
            self.radius_in_meters,
            Coordinate::new(latitude, longitude),
        )
    }
}

/// Organization summary returned by the organization listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Organization with the live state of its geofences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationDetails {
    /// Organization id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Geofences, de-duplicated and sorted by name.
    pub geofences: Vec<GeofenceDetails>,
}

/// Zone state as answered by a geofence actor query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceDetails {
    /// Zone name.
    pub name: String,
    /// Center longitude.
    pub longitude: f64,
    /// Center latitude.
    pub latitude: f64,
    /// Radius in meters.
    pub radius_in_meters: f64,
    /// Vehicles currently inside. Order is not significant.
    pub vehicles_in_zone: Vec<String>,
}

/// Geofence transition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeofenceEvent {
    /// The vehicle entered the zone.
    Enter,
    /// The vehicle left the zone.
    Exit,
}

/// A geofence transition to be delivered to live clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Vehicle id.
    pub vehicle_id: String,
    /// Organization id.
    pub org_id: String,
    /// Organization display name.
    pub org_name: String,
    /// Geofence name.
    pub zone_name: String,
    /// Transition kind.
    pub event: GeofenceEvent,
}
