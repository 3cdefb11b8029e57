//! One actor per vehicle: keeps a bounded trail and forwards every position to
//! the vehicle's organization.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::organization::{OrganizationActor, OrganizationSignal};
use crate::actors::{ActorContext, ActorHost, ActorType, DurableActor};
use crate::error::ActorError;
use crate::model::{Position, PositionBatch};

/// Maximum number of positions kept per vehicle.
pub const MAX_POSITION_HISTORY: usize = 200;

/// Signals accepted by [`VehicleActor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum VehicleSignal {
    /// A new position report for this vehicle.
    Position(Position),
}

/// Trail of one vehicle, oldest position first.
///
/// Positions are shared so that committing the actor after each report
/// copies pointers, not the whole trail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleActor {
    vehicle_id: String,
    trail: VecDeque<Arc<Position>>,
}

impl VehicleActor {
    /// A vehicle with an empty trail.
    pub fn new(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            trail: VecDeque::new(),
        }
    }

    /// The tracked vehicle.
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Number of positions in the trail.
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    fn remember(&mut self, position: Position) {
        self.trail.push_back(Arc::new(position));
        while self.trail.len() > MAX_POSITION_HISTORY {
            self.trail.pop_front();
        }
    }
}

#[async_trait::async_trait]
impl DurableActor for VehicleActor {
    type Signal = VehicleSignal;
    type Query = PositionBatch;
    type Deps = ActorHost<OrganizationActor>;

    fn actor_type() -> ActorType {
        ActorType::Vehicle
    }

    async fn on_signal(
        &mut self,
        signal: VehicleSignal,
        ctx: &mut ActorContext<'_, Self::Deps>,
    ) -> Result<(), ActorError> {
        match signal {
            VehicleSignal::Position(position) => {
                self.remember(position.clone());

                let organizations = ctx.deps();
                let org_id = position.org_id.clone();
                // Operators missing from the catalog have no organization actor.
                if let Err(e) = ctx.signal_external(
                    organizations,
                    &org_id,
                    OrganizationSignal::Position(position),
                ) {
                    debug!(vehicle = %self.vehicle_id, org = %org_id, error = %e, "position not forwarded");
                }
                Ok(())
            }
        }
    }

    fn query(&self) -> PositionBatch {
        PositionBatch {
            positions: self.trail.iter().map(|p| Position::clone(p)).collect(),
        }
    }
}
