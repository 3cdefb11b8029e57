//! REST handlers for organizations, geofences and vehicle trails.

use axum::extract::{Path, State};
use axum::Json;

use super::{GatewayError, GatewayState};
use crate::model::{Organization, OrganizationDetails, PositionBatch};

pub(super) async fn list_organizations(
    State(state): State<GatewayState>,
) -> Json<Vec<Organization>> {
    Json(state.system.organizations())
}

pub(super) async fn organization_details(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<OrganizationDetails>, GatewayError> {
    state
        .system
        .organization_details(&id)?
        .map(Json)
        .ok_or(GatewayError::OrganizationNotFound(id))
}

/// Always 200: a vehicle never seen has an empty trail.
pub(super) async fn vehicle_trail(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Json<PositionBatch> {
    Json(state.system.vehicle_trail(&id))
}
