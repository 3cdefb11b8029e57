//! Vehicle, organization, geofence and notification actors.
//!
//! ```text
//! EntityRouter ──signal-with-start──▶ vehicle-{id}
//!                                        │ Position
//!                                        ▼
//!                                   organization-{orgId}
//!                                        │ Position (fan-out)
//!                                        ▼
//!                                   geofence-{name} ...
//!                                        │ Notification (opt-in)
//!                                        ▼
//!                                   notification ──▶ NotificationBridge
//! ```

mod geofence;
mod notification;
mod organization;
mod router;
mod system;
mod vehicle;

pub use geofence::{GeofenceActor, GeofenceSignal};
pub use notification::{NotificationActor, NotificationSignal};
pub use organization::{OrganizationActor, OrganizationSignal};
pub use router::EntityRouter;
pub use system::{TrackingConfig, TrackingSystem};
pub use vehicle::{VehicleActor, VehicleSignal, MAX_POSITION_HISTORY};
