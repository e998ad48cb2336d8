//! Review repository interface

use async_trait::async_trait;

use super::model::Review;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn save(&self, review: Review) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>>;

    /// Reviews with the given ids, in the order of `ids`; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Review>>;

    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// Delete every review whose id is in `ids`. Returns the number removed.
    async fn delete_many(&self, ids: &[String]) -> DomainResult<u64>;
}
