#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use realtimemap::bridge::BroadcastBridge;
use realtimemap::catalog::Catalog;
use realtimemap::model::Position;
use realtimemap::tracking::{TrackingConfig, TrackingSystem};

/// Railway Square center.
pub const RAILWAY_SQUARE: (f64, f64) = (60.171285, 24.943936);

/// Degrees of latitude covering `meters` along a meridian.
pub fn meters_to_latitude(meters: f64) -> f64 {
    (meters / 6_371_000.0).to_degrees()
}

/// Poll `condition` until it holds, panicking after about two seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

pub fn position(vehicle_id: &str, org_id: &str, latitude: f64, longitude: f64, timestamp: i64) -> Position {
    Position {
        vehicle_id: vehicle_id.to_string(),
        org_id: org_id.to_string(),
        org_name: String::new(),
        timestamp,
        longitude,
        latitude,
        heading: 0,
        doors_open: false,
        speed: 5.0,
    }
}

pub fn start_with(catalog: Catalog, config: TrackingConfig) -> (TrackingSystem, Arc<BroadcastBridge>) {
    let bridge = Arc::new(BroadcastBridge::new(64));
    let system = TrackingSystem::start(Arc::new(catalog), bridge.clone(), &config);
    (system, bridge)
}

pub fn start(config: TrackingConfig) -> (TrackingSystem, Arc<BroadcastBridge>) {
    start_with(Catalog::builtin().expect("builtin catalog"), config)
}
