//! HTTP contract of the query gateway.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::{eventually, position, start, RAILWAY_SQUARE};
use realtimemap::gateway::{router, GatewayState};
use realtimemap::tracking::{TrackingConfig, TrackingSystem};

fn state() -> (GatewayState, Arc<TrackingSystem>) {
    let (system, bridge) = start(TrackingConfig::default());
    let system = Arc::new(system);
    (
        GatewayState {
            system: Arc::clone(&system),
            bridge,
        },
        system,
    )
}

async fn get(state: GatewayState, uri: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn test_list_organizations() {
    let (state, _) = state();
    let (status, body) = get(state, "/api/v1/organization").await;

    assert_eq!(status, StatusCode::OK);
    let organizations = body.as_array().expect("array");
    assert!(!organizations.is_empty());

    let names: Vec<&str> = organizations
        .iter()
        .map(|org| org["name"].as_str().expect("name"))
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    // Operators without geofences are not listed.
    assert!(organizations.iter().all(|org| org["id"] != "0006"));
}

#[tokio::test]
async fn test_unknown_organization_is_404() {
    let (state, _) = state();
    let (status, body) = get(state, "/api/v1/organization/9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Organization 9999 not found");
}

#[tokio::test]
async fn test_organization_details() {
    let (state, system) = state();
    let (lat, lon) = RAILWAY_SQUARE;
    system
        .router()
        .route(position("0022.00042", "0022", lat, lon, 1))
        .expect("route");
    eventually(|| {
        system
            .geofence("Railway Square")
            .map(|zone| !zone.vehicles_in_zone.is_empty())
            .unwrap_or(false)
    })
    .await;

    let (status, body) = get(state, "/api/v1/organization/0022").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "0022");
    assert_eq!(body["name"], "Nobina Finland Oy");
    let geofences = body["geofences"].as_array().expect("geofences");
    let names: Vec<&str> = geofences
        .iter()
        .map(|g| g["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Airport", "Downtown", "Railway Square"]);

    let railway = &geofences[2];
    assert_eq!(railway["radiusInMeters"], 150.0);
    assert_eq!(railway["latitude"], 60.171285);
    assert_eq!(railway["vehiclesInZone"], serde_json::json!(["0022.00042"]));
}

#[tokio::test]
async fn test_trail_of_unknown_vehicle_is_empty() {
    let (state, _) = state();
    let (status, body) = get(state, "/api/v1/trail/0012.99999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "positions": [] }));
}

#[tokio::test]
async fn test_trail_uses_camel_case() {
    let (state, system) = state();
    system
        .router()
        .route(position("0012.00101", "0012", 60.17, 24.94, 42))
        .expect("route");
    eventually(|| system.vehicle_trail("0012.00101").positions.len() == 1).await;

    let (status, body) = get(state, "/api/v1/trail/0012.00101").await;

    assert_eq!(status, StatusCode::OK);
    let first = &body["positions"][0];
    assert_eq!(first["vehicleId"], "0012.00101");
    assert_eq!(first["orgId"], "0012");
    assert_eq!(first["timestamp"], 42);
    assert_eq!(first["doorsOpen"], false);
}
