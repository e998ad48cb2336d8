//! Listing aggregate
//!
//! Contains the Listing entity, its value types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{truncate_tags, GeoPoint, Listing, ListingFilter, ListingImage, ListingTag, MAX_TAGS};
pub use repository::ListingRepository;
