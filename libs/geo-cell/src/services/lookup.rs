use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::{GeoCoordinates, GeoError, NominatimPlace};

/// Resolves a free-form address to coordinates.
///
/// Implementations absorb every failure (network, status, parse) and report
/// it as `None`; callers treat `None` as "infinitely far away".
#[async_trait]
pub trait CoordinateLookup: Send + Sync {
    async fn lookup(&self, address: &str) -> Option<GeoCoordinates>;
}

#[async_trait]
impl<T> CoordinateLookup for Arc<T>
where
    T: CoordinateLookup + ?Sized,
{
    async fn lookup(&self, address: &str) -> Option<GeoCoordinates> {
        (**self).lookup(address).await
    }
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geocoder_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build geocoder HTTP client ({}), using defaults", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.geocoder_base_url.trim_end_matches('/').to_string(),
            user_agent: config.geocoder_user_agent.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(agent) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        headers
    }

    /// Queries `/search` for the best single match of `address`.
    pub async fn search(&self, address: &str) -> Result<Option<GeoCoordinates>, GeoError> {
        let url = format!("{}/search", self.base_url);
        debug!("Geocoding '{}' via {}", address, url);

        let response = self.client
            .get(&url)
            .headers(self.get_headers())
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Status { status: status.as_u16(), body });
        }

        let places: Vec<NominatimPlace> = response.json().await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let coords = GeoCoordinates::parse(&place.lat, &place.lon)
            .ok_or_else(|| GeoError::InvalidCoordinates { lat: place.lat.clone(), lon: place.lon.clone() })?;
        debug!(
            "Resolved '{}' to {} ({}, {})",
            address,
            place.display_name.as_deref().unwrap_or("an unnamed place"),
            coords.lat,
            coords.lon
        );

        Ok(Some(coords))
    }
}

#[async_trait]
impl CoordinateLookup for NominatimClient {
    async fn lookup(&self, address: &str) -> Option<GeoCoordinates> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        match self.search(address).await {
            Ok(Some(coords)) => Some(coords),
            Ok(None) => {
                warn!("No geocoding result for '{}'", address);
                None
            }
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", address, e);
                None
            }
        }
    }
}
