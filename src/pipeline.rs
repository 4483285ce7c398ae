//! Request orchestration: load → narrow → query → compose.

use std::path::Path;

use thiserror::Error;

use crate::compose::compose;
use crate::gazetteer::{self, LoadError};
use crate::matrix::{DistanceMatrixProvider, MatrixClient, MatrixError};
use crate::models::{GeoPoint, NearbyRequest, TravelResult};
use crate::radius::within_radius;

/// Pipeline failure for one request.
///
/// Load failures carry a fixed message; callers cannot distinguish a missing
/// file from a parse error through this endpoint. Matrix failures pass
/// through unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Error loading or filtering locations")]
    Load(#[from] LoadError),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Run one validated request through the full pipeline.
///
/// The gazetteer is re-read on every call; concurrent requests share no
/// state. When the radius filter leaves no candidates, the matrix client is
/// never invoked.
pub async fn handle<P: DistanceMatrixProvider>(
    data_path: &Path,
    matrix: &MatrixClient<P>,
    req: &NearbyRequest,
) -> Result<Vec<TravelResult>, PipelineError> {
    let origin = req.origin();
    let places = gazetteer::load(data_path)?;
    let candidates = within_radius(origin, places, req.radius_km);
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let destinations: Vec<GeoPoint> = candidates.iter().map(|place| place.point()).collect();
    let results = matrix.query(origin, &destinations).await?;
    Ok(compose(results, req.max_duration_min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{MatrixElement, MatrixResponse, MatrixRow, Measure};
    use approx::assert_relative_eq;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Canned provider that counts calls.
    struct CountingProvider {
        responses: Mutex<Vec<MatrixResponse>>,
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new(responses: Vec<MatrixResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl DistanceMatrixProvider for CountingProvider {
        async fn fetch(
            &self,
            _origins: &str,
            _destinations: &str,
        ) -> Result<MatrixResponse, MatrixError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.responses.lock().unwrap().remove(0))
        }
    }

    fn element(meters: f64, seconds: f64) -> MatrixElement {
        MatrixElement {
            status: "OK".to_string(),
            distance: Some(Measure { value: meters }),
            duration: Some(Measure { value: seconds }),
        }
    }

    fn response(elements: Vec<MatrixElement>) -> MatrixResponse {
        MatrixResponse {
            status: "OK".to_string(),
            error_message: None,
            rows: vec![MatrixRow { elements }],
        }
    }

    fn gazetteer_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let file = gazetteer_file("Milano|45.4642|9.1900\nMonza|45.5845|9.2744\n");
        let client = MatrixClient::new(CountingProvider::new(vec![response(vec![
            element(16000.0, 22.0 * 60.0),
            element(4000.0, 8.0 * 60.0),
        ])]));
        let req = NearbyRequest {
            origin_lat: 45.4642,
            origin_lng: 9.19,
            radius_km: 30.0,
            max_duration_min: 60.0,
        };

        let results = handle(file.path(), &client, &req).await.unwrap();

        // Sorted by road distance, so Monza first despite Milano's gazetteer order
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].destination, "45.5845,9.2744");
        assert_relative_eq!(results[0].distance_km, 4.0);
        assert_eq!(results[1].destination, "45.4642,9.19");
    }

    #[tokio::test]
    async fn test_empty_radius_makes_no_remote_call() {
        // Origin ~50 km from Milano with a sub-meter radius
        let file = gazetteer_file("Milano|45.4642|9.1900\n");
        let client = MatrixClient::new(CountingProvider::new(Vec::new()));
        let req = NearbyRequest {
            origin_lat: 45.0526,
            origin_lng: 9.6930,
            radius_km: 0.0001,
            max_duration_min: 60.0,
        };

        let results = handle(file.path(), &client, &req).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(client.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_failure_is_opaque() {
        let client = MatrixClient::new(CountingProvider::new(Vec::new()));
        let req = NearbyRequest {
            origin_lat: 45.4642,
            origin_lng: 9.19,
            radius_km: 30.0,
            max_duration_min: 60.0,
        };

        let err = handle(Path::new("/nonexistent/locations.txt"), &client, &req)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error loading or filtering locations");
        assert_eq!(client.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_discards_results() {
        let file = gazetteer_file("Milano|45.4642|9.1900\n");
        let client = MatrixClient::new(CountingProvider::new(vec![MatrixResponse {
            status: "OVER_QUERY_LIMIT".to_string(),
            error_message: Some("quota exhausted".to_string()),
            rows: Vec::new(),
        }]));
        let req = NearbyRequest {
            origin_lat: 45.4642,
            origin_lng: 9.19,
            radius_km: 30.0,
            max_duration_min: 60.0,
        };

        let err = handle(file.path(), &client, &req).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Matrix(MatrixError::Upstream(ref m)) if m == "quota exhausted"
        ));
    }

    #[tokio::test]
    async fn test_compose_applies_duration_budget() {
        let file = gazetteer_file("Milano|45.4642|9.1900\nMonza|45.5845|9.2744\n");
        let client = MatrixClient::new(CountingProvider::new(vec![response(vec![
            element(12000.0, 900.0),
            element(4000.0, 480.0),
        ])]));
        let req = NearbyRequest {
            origin_lat: 45.4642,
            origin_lng: 9.19,
            radius_km: 30.0,
            max_duration_min: 10.0,
        };

        let results = handle(file.path(), &client, &req).await.unwrap();

        // The 15 minute destination is over budget
        assert_eq!(results.len(), 1);
        assert_relative_eq!(results[0].duration_min, 8.0);
    }

    #[tokio::test]
    async fn test_identical_inputs_identical_outputs() {
        let content = "Milano|45.4642|9.1900\nMonza|45.5845|9.2744\n";
        let req = NearbyRequest {
            origin_lat: 45.4642,
            origin_lng: 9.19,
            radius_km: 30.0,
            max_duration_min: 60.0,
        };

        let mut runs = Vec::new();
        for _ in 0..2 {
            let file = gazetteer_file(content);
            let client = MatrixClient::new(CountingProvider::new(vec![response(vec![
                element(16000.0, 1320.0),
                element(4000.0, 480.0),
            ])]));
            let results = handle(file.path(), &client, &req).await.unwrap();
            runs.push(
                results
                    .into_iter()
                    .map(|r| (r.destination, r.distance_km, r.duration_min))
                    .collect::<Vec<_>>(),
            );
        }
        assert_eq!(runs[0], runs[1]);
    }
}
