//! Geocoding port
//!
//! Resolves a free-text place ("Pune, India") to a point. Implementations
//! return `Ok(None)` when the place is unknown and `Err` only when the
//! lookup itself failed.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::listing::GeoPoint;
use crate::domain::DomainResult;

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> DomainResult<Option<GeoPoint>>;
}

pub type SharedGeocoder = Arc<dyn Geocoder>;

/// Geocoder that never finds anything. Used when lookups are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn geocode(&self, _query: &str) -> DomainResult<Option<GeoPoint>> {
        Ok(None)
    }
}
