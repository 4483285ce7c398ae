//! Distance matrix client: batched road distance/time lookups.

pub mod client;
pub mod provider;

use serde::Deserialize;
use thiserror::Error;

pub use client::{MatrixClient, MAX_DESTINATIONS_PER_CALL};
pub use provider::GoogleMatrixProvider;

/// Distance matrix failure.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// The service rejected the call (bad parameters, quota, key). The
    /// message is the service's own and is shown to the caller.
    #[error("{0}")]
    Upstream(String),
    /// The service answered OK but the element list does not line up with
    /// the destinations that were sent. Positional reconciliation would be
    /// guesswork, so the whole query fails.
    #[error("distance matrix returned {got} elements for {sent} destinations")]
    ElementCountMismatch { sent: usize, got: usize },
    /// Timeout, connection failure, or an undecodable body.
    #[error("distance matrix request failed")]
    Transport(#[from] reqwest::Error),
}

/// Top-level distance matrix response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

/// One origin row; this client always sends a single origin.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    pub elements: Vec<MatrixElement>,
}

/// Per-destination result, aligned positionally with the request.
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    pub distance: Option<Measure>,
    pub duration: Option<Measure>,
}

/// A `{value, ...}` measurement; meters for distances, seconds for durations.
#[derive(Debug, Clone, Deserialize)]
pub struct Measure {
    pub value: f64,
}

/// Capability interface for the remote distance matrix call, so the
/// batching and reconciliation logic is testable with canned responses.
///
/// `origins` and `destinations` are already in wire form: `"lat,lng"`
/// strings, pipe-joined.
pub trait DistanceMatrixProvider {
    fn fetch(
        &self,
        origins: &str,
        destinations: &str,
    ) -> impl std::future::Future<Output = Result<MatrixResponse, MatrixError>> + Send;
}
