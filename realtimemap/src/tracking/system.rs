//! Wiring of all actor hosts, bootstrapped from the catalog.

use std::sync::Arc;

use tracing::{error, info};

use super::geofence::GeofenceActor;
use super::notification::NotificationActor;
use super::organization::OrganizationActor;
use super::router::EntityRouter;
use super::vehicle::VehicleActor;
use crate::actors::{ActorHost, ActorId, RuntimeConfig};
use crate::bridge::NotificationBridge;
use crate::catalog::Catalog;
use crate::error::ActorError;
use crate::model::{GeofenceDetails, Organization, OrganizationDetails, PositionBatch};

/// Settings for [`TrackingSystem::start`].
#[derive(Debug, Clone, Default)]
pub struct TrackingConfig {
    /// Runtime settings shared by every actor host.
    pub runtime: RuntimeConfig,
    /// Report geofence enter/exit transitions to the notification actor.
    pub emit_geofence_notifications: bool,
}

/// The running actor system plus its query facade.
#[derive(Debug)]
pub struct TrackingSystem {
    catalog: Arc<Catalog>,
    vehicles: ActorHost<VehicleActor>,
    organizations: ActorHost<OrganizationActor>,
    geofences: ActorHost<GeofenceActor>,
    notifications: ActorHost<NotificationActor>,
    router: EntityRouter,
}

impl TrackingSystem {
    /// Start the notification actor, one actor per geofence and one per
    /// organization. Vehicles start lazily through the router.
    ///
    /// A failure to start one entity is logged and does not prevent the
    /// others from starting. Must be called from within a tokio runtime.
    pub fn start(
        catalog: Arc<Catalog>,
        bridge: Arc<dyn NotificationBridge>,
        config: &TrackingConfig,
    ) -> Self {
        let runtime = &config.runtime;

        let notifications: ActorHost<NotificationActor> = ActorHost::new(bridge, runtime.clone());
        if let Err(e) = notifications.start(
            ActorId::NOTIFICATION_IDENTITY,
            NotificationActor::default(),
        ) {
            error!(error = %e, "failed to start notification actor");
        }

        let geofences: ActorHost<GeofenceActor> = ActorHost::new(notifications.clone(), runtime.clone());
        for geofence in catalog.geofences() {
            let actor = GeofenceActor::new(geofence.clone(), config.emit_geofence_notifications);
            if let Err(e) = geofences.start(geofence.name.clone(), actor) {
                error!(geofence = %geofence.name, error = %e, "failed to start geofence actor");
            }
        }

        let organizations: ActorHost<OrganizationActor> =
            ActorHost::new(geofences.clone(), runtime.clone());
        for org in catalog.organizations() {
            let actor = OrganizationActor::new(&org.id, &org.name, org.geofences.iter().cloned());
            if let Err(e) = organizations.start(org.id.clone(), actor) {
                error!(org = %org.id, error = %e, "failed to start organization actor");
            }
        }

        let vehicles: ActorHost<VehicleActor> = ActorHost::new(organizations.clone(), runtime.clone());
        let router = EntityRouter::new(vehicles.clone());

        info!(
            organizations = organizations.len(),
            geofences = geofences.len(),
            emit_notifications = config.emit_geofence_notifications,
            "tracking system started"
        );

        Self {
            catalog,
            vehicles,
            organizations,
            geofences,
            notifications,
            router,
        }
    }

    /// Router for incoming positions.
    pub fn router(&self) -> &EntityRouter {
        &self.router
    }

    /// Reference data the system was started with.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Trail of a vehicle. Empty if the vehicle was never seen.
    pub fn vehicle_trail(&self, vehicle_id: &str) -> PositionBatch {
        self.vehicles.query(vehicle_id).unwrap_or_default()
    }

    /// Current state of one geofence.
    pub fn geofence(&self, name: &str) -> Result<GeofenceDetails, ActorError> {
        self.geofences
            .query(name)
            .ok_or_else(|| ActorError::NotFound(ActorId::geofence(name)))
    }

    /// Organizations owning at least one geofence, sorted by name.
    pub fn organizations(&self) -> Vec<Organization> {
        self.catalog.organizations_with_geofences()
    }

    /// An organization with the live state of its geofences, sorted by name.
    ///
    /// `Ok(None)` if the organization is unknown.
    pub fn organization_details(
        &self,
        org_id: &str,
    ) -> Result<Option<OrganizationDetails>, ActorError> {
        let Some(org) = self.catalog.organization(org_id) else {
            return Ok(None);
        };

        let mut geofences = org
            .geofences
            .iter()
            .map(|geofence| self.geofence(&geofence.name))
            .collect::<Result<Vec<_>, _>>()?;
        geofences.sort_by(|a, b| a.name.cmp(&b.name));
        geofences.dedup_by(|a, b| a.name == b.name);

        Ok(Some(OrganizationDetails {
            id: org.id.clone(),
            name: org.name.clone(),
            geofences,
        }))
    }

    /// Host of all vehicle actors.
    pub fn vehicle_host(&self) -> &ActorHost<VehicleActor> {
        &self.vehicles
    }

    /// Host of all organization actors.
    pub fn organization_host(&self) -> &ActorHost<OrganizationActor> {
        &self.organizations
    }

    /// Host of all geofence actors.
    pub fn geofence_host(&self) -> &ActorHost<GeofenceActor> {
        &self.geofences
    }

    /// Host of the notification actor.
    pub fn notification_host(&self) -> &ActorHost<NotificationActor> {
        &self.notifications
    }
}
