//! Tamarack - nearby places by radius and driving time
//!
//! This library provides shared types and modules for the server and ingest binaries.

pub mod compose;
pub mod gazetteer;
pub mod matrix;
pub mod models;
pub mod pipeline;
pub mod radius;

pub use models::{GeoPoint, NearbyRequest, Place, TravelResult};
