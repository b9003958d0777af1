//! Dog CEO API gateway
//!
//! Implementation of `BreedGateway` for the Dog CEO API
//! (<https://dog.ceo/dog-api/>).

use crate::config::gateway::DOG_CEO_DEFAULT_SERVER;
use crate::data::types::BreedListEntry;
use crate::error::{AppError, Result};
use crate::network::HttpClient;

use super::mapper::{self, ApiEnvelope};
use super::traits::BreedGateway;

use reqwest::Url;
use tracing::debug;

/// Dog CEO API gateway
///
/// Fetches from the free [Dog CEO](https://dog.ceo/dog-api/) image API.
pub struct DogCeoGateway {
    client: HttpClient,
    base_url: Url,
}

impl DogCeoGateway {
    /// Create a gateway using the default server
    pub fn new() -> Result<Self> {
        Self::with_base_url(DOG_CEO_DEFAULT_SERVER)
    }

    /// Create a gateway with a custom API root (for testing or mirrors)
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref();
        let base_url = Url::parse(raw)
            .map_err(|e| AppError::Config(format!("Invalid server URL {raw:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("Server URL cannot take a path: {raw}")));
        }
        Ok(Self {
            client: HttpClient::new()?,
            base_url,
        })
    }

    /// Build a full API URL from path segments, percent-encoding each one
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn fetch(&self, segments: &[&str]) -> Result<ApiEnvelope> {
        self.client.get_json(self.url(segments))
    }
}

impl BreedGateway for DogCeoGateway {
    fn name(&self) -> &'static str {
        "Dog CEO"
    }

    fn list_breeds(&self) -> Result<Vec<BreedListEntry>> {
        let envelope = self.fetch(&["breeds", "list", "all"])?;
        let breeds = mapper::map_breeds(envelope)?;
        debug!(count = breeds.len(), "listed breeds");
        Ok(breeds)
    }

    fn list_images(&self, breed: &str) -> Result<Vec<String>> {
        let envelope = self.fetch(&["breed", breed, "images"])?;
        let images = mapper::map_images(envelope)?;
        debug!(breed, count = images.len(), "listed images");
        Ok(images)
    }
}
