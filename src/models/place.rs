//! Place, coordinate, and request/response structures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic point (lat/lng)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True iff the point lies on the WGS84 coordinate grid.
    pub fn in_range(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for GeoPoint {
    /// Renders the wire form used by the distance matrix service: `"lat,lng"`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// One gazetteer record: a named coordinate.
///
/// Immutable once loaded; the gazetteer is re-read for every request, so a
/// `Place` never outlives the request that loaded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// One reachable destination, as reported by the distance matrix service.
///
/// `destination` is the coordinate string that was sent on the wire for this
/// place (`"lat,lng"`), not the place name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelResult {
    pub destination: String,
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Inbound request body for `POST /nearby-locations`.
///
/// All fields are required; the JSON layer rejects missing fields and wrong
/// types, [`NearbyRequest::validate`] rejects out-of-range values.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub radius_km: f64,
    pub max_duration_min: f64,
}

/// Range-validation failure for a [`NearbyRequest`] field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("origin_lat must be a finite value in [-90, 90]")]
    OriginLat,
    #[error("origin_lng must be a finite value in [-180, 180]")]
    OriginLng,
    #[error("radius_km must be a finite, non-negative value")]
    RadiusKm,
    #[error("max_duration_min must be a finite, non-negative value")]
    MaxDurationMin,
}

impl NearbyRequest {
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.origin_lat, self.origin_lng)
    }

    /// Range checks, run before any pipeline stage.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.origin().in_range() {
            if !self.origin_lat.is_finite() || !(-90.0..=90.0).contains(&self.origin_lat) {
                return Err(RequestError::OriginLat);
            }
            return Err(RequestError::OriginLng);
        }
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(RequestError::RadiusKm);
        }
        if !self.max_duration_min.is_finite() || self.max_duration_min < 0.0 {
            return Err(RequestError::MaxDurationMin);
        }
        Ok(())
    }
}
