//! Listing repository interface

use async_trait::async_trait;

use super::model::{Listing, ListingFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Save a new listing
    async fn save(&self, listing: Listing) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Listing>>;

    /// All listings matching the catalogue filter
    async fn search(&self, filter: &ListingFilter) -> DomainResult<Vec<Listing>>;

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Listing>>;

    /// Overwrite an existing listing
    async fn update(&self, listing: Listing) -> DomainResult<()>;

    /// Delete a listing. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> DomainResult<bool>;
}
