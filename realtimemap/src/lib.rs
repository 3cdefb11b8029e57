//! # Realtimemap
//!
//! Live transit vehicle tracking built on durable, per-entity actors.
//!
//! Every vehicle, organization and geofence is a long-running actor with its
//! own mailbox. Actors talk to each other with fire-and-forget signals, answer
//! read-only queries synchronously, and periodically compact their journal so
//! they can run for the lifetime of the process.
//!
//! ## Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ingress (HFP over MQTT)          gateway (axum HTTP + ws)  │
//! │        │                                   ▲                │
//! │        ▼                                   │ queries        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  tracking                                                   │
//! │  EntityRouter → Vehicle → Organization → Geofence* ─┐       │
//! │                                                     ▼       │
//! │                                   Notification → bridge     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  actors: DurableActor, ActorHost, ActorLog, state store     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`actors`] - Durable actor runtime (mailboxes, queries, compaction)
//! - [`tracking`] - Vehicle, organization, geofence and notification actors
//! - [`geo`] - Great-circle containment
//! - [`catalog`] - Static organization and geofence reference data
//! - [`ingress`] - HFP feed parsing and the MQTT subscriber
//! - [`gateway`] - HTTP query gateway
//! - [`bridge`] - Notification delivery bridge
//! - [`config`] - Command line and environment configuration

#![warn(missing_docs)]

pub mod actors;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod geo;
pub mod ingress;
pub mod model;
pub mod prelude;
pub mod tracking;
