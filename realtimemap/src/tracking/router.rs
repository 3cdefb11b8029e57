//! Entry point for normalized positions.

use super::vehicle::{VehicleActor, VehicleSignal};
use crate::actors::{ActorHost, ActorId};
use crate::error::ActorError;
use crate::model::Position;

/// Delivers each position to its vehicle actor, starting the actor on first
/// contact.
#[derive(Debug, Clone)]
pub struct EntityRouter {
    vehicles: ActorHost<VehicleActor>,
}

impl EntityRouter {
    /// Route into the given vehicle host.
    pub fn new(vehicles: ActorHost<VehicleActor>) -> Self {
        Self { vehicles }
    }

    /// The vehicle actor responsible for `position`.
    pub fn address(position: &Position) -> ActorId {
        ActorId::vehicle(position.vehicle_id.as_str())
    }

    /// Signal-with-start the vehicle actor. Returns the address it went to.
    pub fn route(&self, position: Position) -> Result<ActorId, ActorError> {
        let address = Self::address(&position);
        let vehicle_id = position.vehicle_id.clone();
        self.vehicles.signal_with_start(
            &vehicle_id,
            VehicleSignal::Position(position),
            || VehicleActor::new(vehicle_id.as_str()),
        )?;
        Ok(address)
    }
}
