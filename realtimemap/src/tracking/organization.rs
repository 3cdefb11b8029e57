//! One actor per operator: fans positions out to the operator's geofences.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::geofence::{GeofenceActor, GeofenceSignal};
use crate::actors::{ActorContext, ActorHost, ActorType, DurableActor};
use crate::error::ActorError;
use crate::model::{CircularGeofence, Position};

/// Signals accepted by [`OrganizationActor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrganizationSignal {
    /// A position reported by one of this organization's vehicles.
    Position(Position),
}

/// An operator and the fixed set of zones it watches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationActor {
    id: String,
    name: String,
    geofences: Arc<[CircularGeofence]>,
}

impl OrganizationActor {
    /// Create an organization. Geofences repeated by name are kept once.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        geofences: impl IntoIterator<Item = CircularGeofence>,
    ) -> Self {
        let mut seen = HashSet::new();
        let geofences = geofences
            .into_iter()
            .filter(|geofence| seen.insert(geofence.name.clone()))
            .collect::<Vec<_>>()
            .into();

        Self {
            id: id.into(),
            name: name.into(),
            geofences,
        }
    }

    /// Organization id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The zones positions are forwarded to.
    pub fn geofences(&self) -> &[CircularGeofence] {
        &self.geofences
    }
}

#[async_trait::async_trait]
impl DurableActor for OrganizationActor {
    type Signal = OrganizationSignal;
    type Query = ();
    type Deps = ActorHost<GeofenceActor>;

    fn actor_type() -> ActorType {
        ActorType::Organization
    }

    async fn on_signal(
        &mut self,
        signal: OrganizationSignal,
        ctx: &mut ActorContext<'_, Self::Deps>,
    ) -> Result<(), ActorError> {
        match signal {
            OrganizationSignal::Position(position) => {
                let geofences = ctx.deps();
                for geofence in self.geofences.iter() {
                    if let Err(e) = ctx.signal_external(
                        geofences,
                        &geofence.name,
                        GeofenceSignal::Position(position.clone()),
                    ) {
                        warn!(org = %self.id, geofence = %geofence.name, error = %e, "geofence skipped");
                    }
                }
                Ok(())
            }
        }
    }

    fn query(&self) {}
}
