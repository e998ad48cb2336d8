//! Booking repository interface

use async_trait::async_trait;

use super::model::{Booking, BookingStatus, BookingWithListing};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking.
    ///
    /// A second pending booking for the same (listing, user) pair is refused
    /// with `DomainError::Conflict`.
    async fn save(&self, booking: Booking) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()>;

    /// One user's bookings for one listing, newest first
    async fn find_for_listing_and_user(
        &self,
        listing_id: &str,
        user_id: &str,
    ) -> DomainResult<Vec<Booking>>;

    /// Requests received by an owner, newest first, joined with their listing
    async fn find_by_owner_with_listing(&self, owner_id: &str)
        -> DomainResult<Vec<BookingWithListing>>;

    /// Bookings made by a renter, newest first, joined with their listing
    async fn find_by_user_with_listing(&self, user_id: &str)
        -> DomainResult<Vec<BookingWithListing>>;

    /// Delete a booking. Returns `false` if it did not exist.
    async fn delete(&self, id: &str) -> DomainResult<bool>;

    /// Delete every booking of a listing. Returns the number removed.
    async fn delete_by_listing(&self, listing_id: &str) -> DomainResult<u64>;

    async fn delete_many(&self, ids: &[String]) -> DomainResult<u64>;
}
