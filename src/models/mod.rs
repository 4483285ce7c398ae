//! Core data models for the nearby-places pipeline.

pub mod place;

pub use place::{GeoPoint, NearbyRequest, Place, RequestError, TravelResult};
