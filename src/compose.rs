//! Final result composition: travel-time cut plus distance ordering.

use crate::models::TravelResult;

/// Retain results within the travel-time budget, sorted ascending by road
/// distance. The sort is stable, so ties keep their input order.
pub fn compose(mut results: Vec<TravelResult>, max_duration_min: f64) -> Vec<TravelResult> {
    results.retain(|r| r.duration_min <= max_duration_min);
    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}
