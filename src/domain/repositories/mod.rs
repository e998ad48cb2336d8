//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::booking::BookingRepository;
use super::listing::ListingRepository;
use super::review::ReviewRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let listing = repos.listings().find_by_id("L1").await?;
///     let history = repos.bookings().find_for_listing_and_user("L1", "u1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn listings(&self) -> &dyn ListingRepository;
    fn reviews(&self) -> &dyn ReviewRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
