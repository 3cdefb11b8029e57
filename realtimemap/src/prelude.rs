//! Common imports for the realtimemap actor system.
//!
//! This module provides a convenient prelude for importing commonly used types and traits.

pub use crate::actors::{
    ActorContext, ActorHost, ActorId, ActorLog, ActorStateStore, ActorStatus, ActorType,
    CompactionPolicy, DurableActor, InMemoryStateStore, RuntimeConfig,
};
pub use crate::bridge::{BroadcastBridge, NotificationBridge};
pub use crate::catalog::Catalog;
pub use crate::error::{ActorError, BridgeError, CatalogError, IngressError};
pub use crate::model::{
    CircularGeofence, Coordinate, GeofenceDetails, GeofenceEvent, Notification, Organization,
    OrganizationDetails, Position, PositionBatch,
};
pub use crate::tracking::{EntityRouter, TrackingConfig, TrackingSystem};

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use std::sync::Arc;

/// Result alias for actor operations.
pub type Result<T> = std::result::Result<T, ActorError>;
