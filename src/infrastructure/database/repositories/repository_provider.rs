//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::listing::ListingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::review::ReviewRepository;
use crate::domain::user::UserRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::listing_repository::SeaOrmListingRepository;
use super::review_repository::SeaOrmReviewRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let listing = repos.listings().find_by_id("L1").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    listings: SeaOrmListingRepository,
    reviews: SeaOrmReviewRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            listings: SeaOrmListingRepository::new(db.clone()),
            reviews: SeaOrmReviewRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
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
