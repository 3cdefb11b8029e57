//! Actor addressing.
//!
//! Every actor address is an [`ActorType`] plus a string identity taken from
//! the domain (vehicle id, organization id, geofence name). The rendered form
//! is `"{kind}-{identity}"`, e.g. `vehicle-0012.01234` or
//! `geofence-Railway Square`. Because the kind prefix is part of the address,
//! a vehicle and an organization that share an id never collide.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of entity an actor represents.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Debug)]
pub enum ActorType {
    /// One actor per vehicle.
    Vehicle,
    /// One actor per operating organization.
    Organization,
    /// One actor per monitored zone.
    Geofence,
    /// Singleton forwarding notifications to the delivery bridge.
    Notification,
}

impl ActorType {
    /// Prefix used in rendered addresses.
    pub fn prefix(&self) -> &'static str {
        match self {
            ActorType::Vehicle => "vehicle",
            ActorType::Organization => "organization",
            ActorType::Geofence => "geofence",
            ActorType::Notification => "notification",
        }
    }

    /// Type name used as the state store namespace.
    pub fn name(&self) -> &'static str {
        match self {
            ActorType::Vehicle => "Vehicle",
            ActorType::Organization => "Organization",
            ActorType::Geofence => "Geofence",
            ActorType::Notification => "Notification",
        }
    }
}

/// Full actor address = type + string identity.
///
/// # Examples
///
/// ```rust
/// use realtimemap::actors::ActorId;
///
/// assert_eq!(ActorId::vehicle("0012.00101").to_string(), "vehicle-0012.00101");
/// assert_eq!(ActorId::notification().to_string(), "notification");
/// ```
#[derive(Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Debug)]
pub struct ActorId {
    /// The kind of actor.
    pub actor_type: ActorType,
    /// Instance identity within the kind.
    pub identity: String,
}

impl ActorId {
    /// Identity of the notification singleton.
    pub const NOTIFICATION_IDENTITY: &'static str = "";

    /// Create a new actor ID.
    pub fn new(actor_type: ActorType, identity: impl Into<String>) -> Self {
        Self {
            actor_type,
            identity: identity.into(),
        }
    }

    /// Address of the actor tracking `vehicle_id`.
    pub fn vehicle(vehicle_id: impl Into<String>) -> Self {
        Self::new(ActorType::Vehicle, vehicle_id)
    }

    /// Address of the actor for organization `org_id`.
    pub fn organization(org_id: impl Into<String>) -> Self {
        Self::new(ActorType::Organization, org_id)
    }

    /// Address of the actor for the geofence called `name`.
    pub fn geofence(name: impl Into<String>) -> Self {
        Self::new(ActorType::Geofence, name)
    }

    /// Address of the notification singleton.
    pub fn notification() -> Self {
        Self::new(ActorType::Notification, Self::NOTIFICATION_IDENTITY)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.identity.is_empty() {
            f.write_str(self.actor_type.prefix())
        } else {
            write!(f, "{}-{}", self.actor_type.prefix(), self.identity)
        }
    }
}
