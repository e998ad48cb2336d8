//! OpenStreetMap Nominatim geocoder

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ports::Geocoder;
use crate::domain::listing::GeoPoint;
use crate::domain::{DomainError, DomainResult};

pub const NOMINATIM_SEARCH_PATH: &str = "/search";

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// e.g. "https://nominatim.openstreetmap.org"
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying agent
    pub user_agent: String,
    pub timeout: Duration,
}

/// One search hit; Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl SearchHit {
    fn to_point(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            longitude: self.lon.parse().ok()?,
            latitude: self.lat.parse().ok()?,
        })
    }
}

pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        let mut url = self.config.base_url.trim_end_matches('/').to_string();
        url.push_str(NOMINATIM_SEARCH_PATH);
        url
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> DomainResult<Option<GeoPoint>> {
        debug!(query, "Geocoding");

        let response = self
            .client
            .get(self.search_url())
            .query(&[("format", "json"), ("limit", "1"), ("q", query)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(query, error = %e, "Geocoding request failed");
                DomainError::Geocoding(e.to_string())
            })?;

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| DomainError::Geocoding(e.to_string()))?;

        Ok(hits.first().and_then(SearchHit::to_point))
    }
}
