//! Great-circle geometry for geofence containment.

use crate::model::Coordinate;

/// Mean Earth radius used for distance computations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers.
pub fn great_circle_distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether `point` lies inside the circle around `center`.
///
/// The boundary is exclusive: a point exactly `radius_in_meters` away is
/// outside.
pub fn contains(center: Coordinate, radius_in_meters: f64, point: Coordinate) -> bool {
    great_circle_distance_km(center, point) * 1000.0 < radius_in_meters
}
