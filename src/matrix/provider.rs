//! Production distance matrix provider backed by the Google Maps API.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use url::Url;

use super::{DistanceMatrixProvider, MatrixError, MatrixResponse};

const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Each remote call must complete within this window or the request fails.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Distance Matrix provider. The API key and endpoint are injected at
/// construction; nothing is read from the environment here.
pub struct GoogleMatrixProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleMatrixProvider {
    /// Create a provider for the given credential, optionally overriding the
    /// endpoint (used to point tests or staging at a different host).
    pub fn new(api_key: String, endpoint: Option<&str>) -> Result<Self> {
        let endpoint = Url::parse(endpoint.unwrap_or(DEFAULT_ENDPOINT))?;
        let client = Client::builder()
            .user_agent("Tamarack/0.1 (nearby-places)")
            .timeout(CALL_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl DistanceMatrixProvider for GoogleMatrixProvider {
    async fn fetch(&self, origins: &str, destinations: &str) -> Result<MatrixResponse, MatrixError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("origins", origins),
                ("destinations", destinations),
                ("mode", "driving"),
                ("units", "metric"),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        Ok(response.json::<MatrixResponse>().await?)
    }
}
