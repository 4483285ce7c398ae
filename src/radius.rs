//! Radius pre-filter over the gazetteer.
//!
//! Narrows the candidate set before any remote call is made. The geodesic
//! distance computed here is used only for inclusion; final ranking uses the
//! road distance reported by the matrix service.

use geo::{Distance, Geodesic, Point};

use crate::models::{GeoPoint, Place};

/// Geodesic distance between two points in kilometers (WGS84 ellipsoid).
pub fn geodesic_km(a: GeoPoint, b: GeoPoint) -> f64 {
    Geodesic.distance(Point::new(a.lng, a.lat), Point::new(b.lng, b.lat)) / 1000.0
}

/// Keep the places within `radius_km` of `origin`, input order preserved.
pub fn within_radius(origin: GeoPoint, places: Vec<Place>, radius_km: f64) -> Vec<Place> {
    places
        .into_iter()
        .filter(|place| geodesic_km(origin, place.point()) <= radius_km)
        .collect()
}
