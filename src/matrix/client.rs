//! Batching and reconciliation over a [`DistanceMatrixProvider`].

use tracing::debug;

use super::{DistanceMatrixProvider, MatrixError};
use crate::models::{GeoPoint, TravelResult};

/// Upstream per-call destination limit.
pub const MAX_DESTINATIONS_PER_CALL: usize = 25;

/// Distance matrix client. Splits destination lists into chunks the upstream
/// service accepts, issues one call per chunk, and normalizes the responses.
pub struct MatrixClient<P> {
    pub(crate) provider: P,
}

impl<P: DistanceMatrixProvider> MatrixClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Road distance and travel time from `origin` to every destination.
    ///
    /// Calls are issued strictly one after another, each awaited before the
    /// next. A failed chunk fails the whole query; no partial results are
    /// returned. Destinations the service marks invalid are dropped, so the
    /// output may be shorter than the input.
    pub async fn query(
        &self,
        origin: GeoPoint,
        destinations: &[GeoPoint],
    ) -> Result<Vec<TravelResult>, MatrixError> {
        let mut results = Vec::with_capacity(destinations.len());
        for chunk in destinations.chunks(MAX_DESTINATIONS_PER_CALL) {
            results.extend(self.query_chunk(origin, chunk).await?);
        }
        Ok(results)
    }

    async fn query_chunk(
        &self,
        origin: GeoPoint,
        chunk: &[GeoPoint],
    ) -> Result<Vec<TravelResult>, MatrixError> {
        let destinations: Vec<String> = chunk.iter().map(GeoPoint::to_string).collect();
        let response = self
            .provider
            .fetch(&origin.to_string(), &destinations.join("|"))
            .await?;

        if response.status != "OK" {
            return Err(MatrixError::Upstream(
                response
                    .error_message
                    .unwrap_or_else(|| "Distance Matrix Error".to_string()),
            ));
        }

        let row = response
            .rows
            .into_iter()
            .next()
            .ok_or(MatrixError::ElementCountMismatch {
                sent: chunk.len(),
                got: 0,
            })?;
        if row.elements.len() != chunk.len() {
            return Err(MatrixError::ElementCountMismatch {
                sent: chunk.len(),
                got: row.elements.len(),
            });
        }

        let mut kept = Vec::with_capacity(chunk.len());
        for (destination, element) in destinations.into_iter().zip(row.elements) {
            if element.status != "OK" {
                debug!("dropping destination {destination}: element status {}", element.status);
                continue;
            }
            let (Some(distance), Some(duration)) = (element.distance, element.duration) else {
                return Err(MatrixError::Upstream(
                    "Distance matrix element missing distance or duration".to_string(),
                ));
            };
            kept.push(TravelResult {
                destination,
                distance_km: distance.value / 1000.0,
                duration_min: duration.value / 60.0,
            });
        }
        Ok(kept)
    }
}
