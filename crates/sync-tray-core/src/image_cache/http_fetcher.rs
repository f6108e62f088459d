use crate::{CoreError, CoreResult, ImageFetcher};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, instrument};

/// Fetches images with a plain HTTP GET.
#[derive(Debug, Clone, Default)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Fetcher using a default `reqwest` client.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageFetcher for HttpImageFetcher {
    #[instrument(skip(self))]
    async fn fetch_bytes(&self, url: &str) -> CoreResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::ImageFetch {
                reason: format!("failed to download {url}: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !response.status().is_success() {
            return Err(CoreError::ImageFetch {
                reason: format!("download {url} returned status {}", response.status()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let bytes = response.bytes().await.map_err(|e| CoreError::ImageFetch {
            reason: format!("failed to read response from {url}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(url = %url, size = bytes.len(), "Image downloaded");

        Ok(bytes.to_vec())
    }
}
