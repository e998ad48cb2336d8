//! Domain layer: entities, business rules and repository ports.

pub mod booking;
pub mod listing;
pub mod repositories;
pub mod review;
pub mod user;

pub use booking::{Booking, BookingRepository, BookingStatus, BookingWithListing, DisplayStatus};
pub use listing::{GeoPoint, Listing, ListingFilter, ListingImage, ListingRepository, ListingTag};
pub use repositories::{DomainResult, RepositoryProvider};
pub use review::{Review, ReviewRepository};
pub use user::{User, UserRepository};

pub use crate::shared::errors::DomainError;
