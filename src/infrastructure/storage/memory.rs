//! In-memory storage for development and testing
//!
//! Every repository keeps its rows in a `DashMap`. Rows carry an insertion
//! sequence so "newest first" stays stable when timestamps collide.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::booking::{Booking, BookingRepository, BookingStatus, BookingWithListing};
use crate::domain::listing::{Listing, ListingFilter, ListingRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::review::{Review, ReviewRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Default)]
struct Sequence(AtomicU64);

impl Sequence {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: User) -> DomainResult<()> {
        let taken = self
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(DomainError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }
}

// ── Listings ────────────────────────────────────────────────────

type ListingTable = Arc<DashMap<String, Row<Listing>>>;

pub struct InMemoryListingRepository {
    listings: ListingTable,
    seq: Sequence,
}

impl InMemoryListingRepository {
    fn sorted_newest_first(&self, keep: impl Fn(&Listing) -> bool) -> Vec<Listing> {
        let mut rows: Vec<Row<Listing>> = self
            .listings
            .iter()
            .filter(|r| keep(&r.value))
            .map(|r| r.clone())
            .collect();
        rows.sort_by(|a, b| {
            (b.value.created_at, b.seq).cmp(&(a.value.created_at, a.seq))
        });
        rows.into_iter().map(|r| r.value).collect()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn save(&self, listing: Listing) -> DomainResult<()> {
        let seq = self.seq.next();
        self.listings
            .insert(listing.id.clone(), Row { seq, value: listing });
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Listing>> {
        Ok(self.listings.get(id).map(|r| r.value.clone()))
    }

    async fn search(&self, filter: &ListingFilter) -> DomainResult<Vec<Listing>> {
        Ok(self.sorted_newest_first(|l| filter.matches(l)))
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Listing>> {
        Ok(self.sorted_newest_first(|l| l.owner_id == owner_id))
    }

    async fn update(&self, listing: Listing) -> DomainResult<()> {
        let mut row = self
            .listings
            .get_mut(&listing.id)
            .ok_or_else(|| DomainError::NotFound(format!("Listing {} not found", listing.id)))?;
        row.value = listing;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        Ok(self.listings.remove(id).is_some())
    }
}

// ── Reviews ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: DashMap<String, Review>,
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn save(&self, review: Review) -> DomainResult<()> {
        self.reviews.insert(review.id.clone(), review);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Review>> {
        Ok(self.reviews.get(id).map(|r| r.clone()))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Review>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.reviews.get(id).map(|r| r.clone()))
            .collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.reviews.remove(id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[String]) -> DomainResult<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.reviews.remove(id.as_str()).is_some())
            .count() as u64)
    }
}

// ── Bookings ────────────────────────────────────────────────────

pub struct InMemoryBookingRepository {
    bookings: DashMap<String, Row<Booking>>,
    listings: ListingTable,
    seq: Sequence,
}

impl InMemoryBookingRepository {
    fn sorted_newest_first(&self, keep: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        let mut rows: Vec<Row<Booking>> = self
            .bookings
            .iter()
            .filter(|r| keep(&r.value))
            .map(|r| r.clone())
            .collect();
        rows.sort_by(|a, b| {
            (b.value.created_at, b.seq).cmp(&(a.value.created_at, a.seq))
        });
        rows.into_iter().map(|r| r.value).collect()
    }

    fn with_listing(&self, booking: Booking) -> BookingWithListing {
        let listing = self
            .listings
            .get(&booking.listing_id)
            .map(|r| r.value.clone());
        BookingWithListing { booking, listing }
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: Booking) -> DomainResult<()> {
        if booking.status == BookingStatus::Pending {
            let duplicate = self.bookings.iter().any(|r| {
                r.value.status == BookingStatus::Pending
                    && r.value.listing_id == booking.listing_id
                    && r.value.user_id == booking.user_id
            });
            if duplicate {
                return Err(DomainError::Conflict(
                    "pending booking for this listing".to_string(),
                ));
            }
        }
        let seq = self.seq.next();
        self.bookings
            .insert(booking.id.clone(), Row { seq, value: booking });
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|r| r.value.clone()))
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
        let mut row = self
            .bookings
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Booking {id} not found")))?;
        row.value.status = status;
        Ok(())
    }

    async fn find_for_listing_and_user(
        &self,
        listing_id: &str,
        user_id: &str,
    ) -> DomainResult<Vec<Booking>> {
        Ok(self.sorted_newest_first(|b| b.listing_id == listing_id && b.user_id == user_id))
    }

    async fn find_by_owner_with_listing(
        &self,
        owner_id: &str,
    ) -> DomainResult<Vec<BookingWithListing>> {
        Ok(self
            .sorted_newest_first(|b| b.owner_id == owner_id)
            .into_iter()
            .map(|b| self.with_listing(b))
            .collect())
    }

    async fn find_by_user_with_listing(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<BookingWithListing>> {
        Ok(self
            .sorted_newest_first(|b| b.user_id == user_id)
            .into_iter()
            .map(|b| self.with_listing(b))
            .collect())
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        Ok(self.bookings.remove(id).is_some())
    }

    async fn delete_by_listing(&self, listing_id: &str) -> DomainResult<u64> {
        let mut removed = 0u64;
        self.bookings.retain(|_, r| {
            let keep = r.value.listing_id != listing_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn delete_many(&self, ids: &[String]) -> DomainResult<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.bookings.remove(id.as_str()).is_some())
            .count() as u64)
    }
}

// ── Provider ────────────────────────────────────────────────────

/// Repository provider keeping everything in process memory
pub struct InMemoryRepositoryProvider {
    users: InMemoryUserRepository,
    listings: InMemoryListingRepository,
    reviews: InMemoryReviewRepository,
    bookings: InMemoryBookingRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let listing_table: ListingTable = Arc::new(DashMap::new());
        Self {
            users: InMemoryUserRepository::default(),
            listings: InMemoryListingRepository {
                listings: listing_table.clone(),
                seq: Sequence::default(),
            },
            reviews: InMemoryReviewRepository::default(),
            bookings: InMemoryBookingRepository {
                bookings: DashMap::new(),
                listings: listing_table,
                seq: Sequence::default(),
            },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn listings(&self) -> &dyn ListingRepository {
        &self.listings
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        &self.reviews
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}

// ── Tests ──────────────────────────────────────────────────────
