//! Error types for the realtimemap actor system.

use crate::actors::{ActorId, ActorStateError};
use thiserror::Error;

/// Errors related to actor operations and lifecycle.
#[derive(Debug, Error)]
pub enum ActorError {
    /// An actor with this address is already running.
    ///
    /// Starting an actor registers its mailbox and its query handler in one
    /// step; a duplicate registration is fatal to the new instance.
    #[error("actor already started: {0}")]
    AlreadyStarted(ActorId),

    /// No actor is registered under this address.
    #[error("actor not found: {0}")]
    NotFound(ActorId),

    /// The actor's processing loop is gone and its mailbox no longer accepts
    /// signals.
    #[error("mailbox closed: {0}")]
    MailboxClosed(ActorId),

    /// A signal handler failed.
    #[error("handler error: {0}")]
    Handler(String),

    /// Snapshot storage failed.
    #[error("state store error: {0}")]
    State(#[from] ActorStateError),

    /// Signal or snapshot (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Handing a notification to the delivery bridge failed.
    #[error("delivery bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

/// Errors from the notification delivery bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The bridge cannot accept messages right now.
    #[error("bridge unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while turning feed messages into positions.
#[derive(Debug, Error)]
pub enum IngressError {
    /// The topic does not carry operator and vehicle segments.
    #[error("invalid topic {topic:?}: expected at least {expected} segments, got {actual}")]
    Topic {
        /// The offending topic.
        topic: String,
        /// Minimum number of segments.
        expected: usize,
        /// Segments found.
        actual: usize,
    },

    /// The payload is not a valid HFP JSON document.
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The MQTT connection failed.
    #[error("mqtt connection error: {0}")]
    Connection(String),
}

/// Errors from loading reference data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document is not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An organization references a geofence that is not defined.
    #[error("organization {organization} references unknown geofence {geofence:?}")]
    UnknownGeofence {
        /// Organization id.
        organization: String,
        /// Missing geofence name.
        geofence: String,
    },

    /// Two geofences share a name.
    #[error("duplicate geofence name: {0:?}")]
    DuplicateGeofence(String),
}
