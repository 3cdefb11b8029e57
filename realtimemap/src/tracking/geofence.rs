//! One actor per zone: tracks which vehicles are currently inside.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::notification::{NotificationActor, NotificationSignal};
use crate::actors::{ActorContext, ActorHost, ActorId, ActorType, DurableActor};
use crate::error::ActorError;
use crate::model::{CircularGeofence, GeofenceDetails, GeofenceEvent, Notification, Position};

/// Signals accepted by [`GeofenceActor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GeofenceSignal {
    /// A position to classify against the zone.
    Position(Position),
}

/// Membership of one circular zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceActor {
    geofence: CircularGeofence,
    vehicles_in_zone: BTreeSet<String>,
    emit_notifications: bool,
}

impl GeofenceActor {
    /// An empty zone. With `emit_notifications`, every membership change is
    /// reported to the notification actor.
    pub fn new(geofence: CircularGeofence, emit_notifications: bool) -> Self {
        Self {
            geofence,
            vehicles_in_zone: BTreeSet::new(),
            emit_notifications,
        }
    }

    /// The zone.
    pub fn geofence(&self) -> &CircularGeofence {
        &self.geofence
    }

    /// Whether `vehicle_id` is currently inside.
    pub fn contains_vehicle(&self, vehicle_id: &str) -> bool {
        self.vehicles_in_zone.contains(vehicle_id)
    }

    /// Update membership for one position. Returns the transition, if any.
    fn classify(&mut self, position: &Position) -> Option<GeofenceEvent> {
        if self
            .geofence
            .includes_position(position.latitude, position.longitude)
        {
            self.vehicles_in_zone
                .insert(position.vehicle_id.clone())
                .then_some(GeofenceEvent::Enter)
        } else {
            self.vehicles_in_zone
                .remove(&position.vehicle_id)
                .then_some(GeofenceEvent::Exit)
        }
    }
}

#[async_trait::async_trait]
impl DurableActor for GeofenceActor {
    type Signal = GeofenceSignal;
    type Query = GeofenceDetails;
    type Deps = ActorHost<NotificationActor>;

    fn actor_type() -> ActorType {
        ActorType::Geofence
    }

    async fn on_signal(
        &mut self,
        signal: GeofenceSignal,
        ctx: &mut ActorContext<'_, Self::Deps>,
    ) -> Result<(), ActorError> {
        match signal {
            GeofenceSignal::Position(position) => {
                let Some(event) = self.classify(&position) else {
                    return Ok(());
                };
                debug!(zone = %self.geofence.name, vehicle = %position.vehicle_id, ?event, "membership changed");

                if !self.emit_notifications {
                    return Ok(());
                }
                let notification = Notification {
                    vehicle_id: position.vehicle_id,
                    org_id: position.org_id,
                    org_name: position.org_name,
                    zone_name: self.geofence.name.clone(),
                    event,
                };
                let notifications = ctx.deps();
                ctx.signal_external(
                    notifications,
                    ActorId::NOTIFICATION_IDENTITY,
                    NotificationSignal::Notify(notification),
                )
            }
        }
    }

    fn query(&self) -> GeofenceDetails {
        GeofenceDetails {
            name: self.geofence.name.clone(),
            longitude: self.geofence.center.longitude,
            latitude: self.geofence.center.latitude,
            radius_in_meters: self.geofence.radius_in_meters,
            vehicles_in_zone: self.vehicles_in_zone.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    fn railway_square() -> GeofenceActor {
        GeofenceActor::new(
            CircularGeofence::new("Railway Square", Coordinate::new(60.171285, 24.943936), 150.0),
            false,
        )
    }

    fn at(vehicle_id: &str, latitude: f64, longitude: f64) -> Position {
        Position {
            vehicle_id: vehicle_id.to_string(),
            org_id: "0012".to_string(),
            org_name: String::new(),
            timestamp: 0,
            longitude,
            latitude,
            heading: 0,
            doors_open: false,
            speed: 0.0,
        }
    }

    #[test]
    fn test_enter_and_exit() {
        let mut zone = railway_square();

        assert_eq!(
            zone.classify(&at("v1", 60.171285, 24.943936)),
            Some(GeofenceEvent::Enter)
        );
        assert!(zone.contains_vehicle("v1"));

        // ~200 m north of the center.
        assert_eq!(
            zone.classify(&at("v1", 60.173085, 24.943936)),
            Some(GeofenceEvent::Exit)
        );
        assert!(!zone.contains_vehicle("v1"));
    }

    #[test]
    fn test_repeated_inside_is_idempotent() {
        let mut zone = railway_square();
        zone.classify(&at("v1", 60.171285, 24.943936));

        assert_eq!(zone.classify(&at("v1", 60.1713, 24.94394)), None);
        assert_eq!(zone.query().vehicles_in_zone, vec!["v1".to_string()]);
    }

    #[test]
    fn test_outside_unknown_vehicle_is_noop() {
        let mut zone = railway_square();
        assert_eq!(zone.classify(&at("v9", 60.0, 24.0)), None);
        assert!(zone.query().vehicles_in_zone.is_empty());
    }

    #[test]
    fn test_query_reports_zone_and_sorted_members() {
        let mut zone = railway_square();
        zone.classify(&at("b", 60.171285, 24.943936));
        zone.classify(&at("a", 60.171285, 24.943936));

        let details = zone.query();
        assert_eq!(details.name, "Railway Square");
        assert_eq!(details.radius_in_meters, 150.0);
        assert_eq!(details.latitude, 60.171285);
        assert_eq!(details.longitude, 24.943936);
        assert_eq!(details.vehicles_in_zone, vec!["a".to_string(), "b".to_string()]);
    }
}
