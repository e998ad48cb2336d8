//! Listing catalogue service
//!
//! Search, show, create, update and delete listings, plus reviews. Deleting
//! a listing removes its bookings and reviews first.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::ports::SharedGeocoder;
use crate::domain::booking::{Booking, BookingEligibility};
use crate::domain::listing::{truncate_tags, GeoPoint, Listing, ListingFilter, ListingImage, ListingTag};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, Review};
use crate::shared::SharedClock;

pub const MSG_LOCATION_NOT_FOUND: &str = "Location not found!";
pub const MSG_LOCATION_REQUIRED: &str = "Please provide location or country!";
pub const MSG_LISTING_NOT_FOUND: &str = "Listing not found.";
pub const MSG_NOT_OWNER: &str = "You are not the owner of this listing.";
pub const MSG_NOT_REVIEW_AUTHOR: &str = "You are not the author of this review.";

/// Editable fields of a listing, shared by create and update
#[derive(Debug, Clone, Default)]
pub struct ListingInput {
    pub title: String,
    pub description: String,
    /// On update, `None` keeps the current image
    pub image: Option<ListingImage>,
    pub price: f64,
    pub location: String,
    pub country: String,
    pub tags: Vec<ListingTag>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ListingInput {
    fn validate(&self) -> DomainResult<()> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("country", &self.country),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DomainError::Validation(format!("\"{name}\" is required")));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::Validation(
                "\"price\" must be greater than or equal to 0".into(),
            ));
        }
        Ok(())
    }

    fn supplied_point(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                longitude,
                latitude,
            }),
            _ => None,
        }
    }
}

/// Free-text geocoding query from whichever of location/country is present
pub fn geocode_query(location: &str, country: &str) -> Option<String> {
    match (location.trim(), country.trim()) {
        ("", "") => None,
        (l, "") => Some(l.to_string()),
        ("", c) => Some(c.to_string()),
        (l, c) => Some(format!("{l}, {c}")),
    }
}

/// A listing as shown on its page
#[derive(Debug, Clone)]
pub struct ListingDetails {
    pub listing: Listing,
    pub reviews: Vec<Review>,
    /// The viewer's blocking booking, if any
    pub user_booking: Option<Booking>,
    pub can_rebook: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingDeletion {
    pub removed_bookings: u64,
    pub removed_reviews: u64,
}

pub struct ListingService {
    repos: Arc<dyn RepositoryProvider>,
    geocoder: SharedGeocoder,
    clock: SharedClock,
}

impl ListingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, geocoder: SharedGeocoder, clock: SharedClock) -> Self {
        Self {
            repos,
            geocoder,
            clock,
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn index(&self, filter: &ListingFilter) -> DomainResult<Vec<Listing>> {
        self.repos.listings().search(filter).await
    }

    /// Listing page; `viewer` adds the booking panel state.
    pub async fn show(&self, id: &str, viewer: Option<&str>) -> DomainResult<ListingDetails> {
        let listing = self.find_listing(id).await?;
        let reviews = self.repos.reviews().find_by_ids(&listing.reviews).await?;

        let (user_booking, can_rebook) = match viewer {
            Some(user_id) => {
                let history = self
                    .repos
                    .bookings()
                    .find_for_listing_and_user(id, user_id)
                    .await?;
                let eligibility = BookingEligibility::assess(&history, self.clock.now());
                (eligibility.blocking_booking().cloned(), eligibility.can_rebook())
            }
            None => (None, false),
        };

        Ok(ListingDetails {
            listing,
            reviews,
            user_booking,
            can_rebook,
        })
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(&self, owner_id: &str, input: ListingInput) -> DomainResult<Listing> {
        input.validate()?;

        let geometry = match input.supplied_point() {
            Some(point) => point,
            None => {
                let query = geocode_query(&input.location, &input.country)
                    .ok_or_else(|| DomainError::Validation(MSG_LOCATION_REQUIRED.into()))?;
                self.geocoder
                    .geocode(&query)
                    .await?
                    .ok_or_else(|| DomainError::Validation(MSG_LOCATION_NOT_FOUND.into()))?
            }
        };

        let listing = Listing {
            id: uuid::Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            image: input.image.unwrap_or_default(),
            price: Some(input.price),
            location: input.location,
            country: input.country,
            tags: truncate_tags(input.tags),
            geometry,
            owner_id: owner_id.to_string(),
            reviews: Vec::new(),
            created_at: Utc::now(),
        };
        self.repos.listings().save(listing.clone()).await?;

        info!(listing_id = %listing.id, owner_id, "Listing created");
        Ok(listing)
    }

    /// Replace the editable fields. Geometry follows supplied coordinates, or
    /// a fresh geocode; a failed lookup keeps the old point.
    pub async fn update(&self, id: &str, caller: &str, input: ListingInput) -> DomainResult<Listing> {
        input.validate()?;
        let mut listing = self.find_owned_listing(id, caller).await?;

        let geometry = match input.supplied_point() {
            Some(point) => Some(point),
            None => self.try_geocode(&input.location, &input.country).await,
        };

        listing.title = input.title;
        listing.description = input.description;
        if let Some(image) = input.image {
            listing.image = image;
        }
        listing.price = Some(input.price);
        listing.location = input.location;
        listing.country = input.country;
        listing.tags = truncate_tags(input.tags);
        if let Some(point) = geometry {
            listing.geometry = point;
        }

        self.repos.listings().update(listing.clone()).await?;
        info!(listing_id = %listing.id, "Listing updated");
        Ok(listing)
    }

    /// Delete a listing together with its bookings and reviews.
    pub async fn delete(&self, id: &str, caller: &str) -> DomainResult<ListingDeletion> {
        let listing = self.find_owned_listing(id, caller).await?;

        let removed_bookings = self.repos.bookings().delete_by_listing(id).await?;
        let removed_reviews = self.repos.reviews().delete_many(&listing.reviews).await?;
        self.repos.listings().delete(id).await?;

        info!(
            listing_id = id,
            removed_bookings, removed_reviews, "Listing deleted"
        );
        Ok(ListingDeletion {
            removed_bookings,
            removed_reviews,
        })
    }

    // ── Reviews ─────────────────────────────────────────────────

    pub async fn add_review(
        &self,
        listing_id: &str,
        author_id: &str,
        rating: i32,
        comment: &str,
    ) -> DomainResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::Validation(
                "\"rating\" must be between 1 and 5".into(),
            ));
        }
        if comment.trim().is_empty() {
            return Err(DomainError::Validation("\"comment\" is required".into()));
        }

        let mut listing = self.find_listing(listing_id).await?;
        let review = Review::new(listing_id, author_id, rating, comment.trim());
        self.repos.reviews().save(review.clone()).await?;

        listing.reviews.push(review.id.clone());
        self.repos.listings().update(listing).await?;

        info!(listing_id, review_id = %review.id, "Review added");
        Ok(review)
    }

    pub async fn delete_review(&self, listing_id: &str, review_id: &str, caller: &str) -> DomainResult<()> {
        let review = self
            .repos
            .reviews()
            .find_by_id(review_id)
            .await?
            .filter(|r| r.listing_id == listing_id)
            .ok_or_else(|| DomainError::NotFound("Review not found.".into()))?;
        if review.author_id != caller {
            return Err(DomainError::Forbidden(MSG_NOT_REVIEW_AUTHOR.into()));
        }

        if let Some(mut listing) = self.repos.listings().find_by_id(listing_id).await? {
            listing.reviews.retain(|id| id != review_id);
            self.repos.listings().update(listing).await?;
        }
        self.repos.reviews().delete(review_id).await?;

        info!(listing_id, review_id, "Review deleted");
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn find_listing(&self, id: &str) -> DomainResult<Listing> {
        self.repos
            .listings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(MSG_LISTING_NOT_FOUND.into()))
    }

    async fn find_owned_listing(&self, id: &str, caller: &str) -> DomainResult<Listing> {
        let listing = self.find_listing(id).await?;
        if !listing.is_owned_by(caller) {
            return Err(DomainError::Forbidden(MSG_NOT_OWNER.into()));
        }
        Ok(listing)
    }

    async fn try_geocode(&self, location: &str, country: &str) -> Option<GeoPoint> {
        let query = geocode_query(location, country)?;
        match self.geocoder.geocode(&query).await {
            Ok(Some(point)) => Some(point),
            Ok(None) => {
                warn!(query, "No geocoding result on update, keeping old geometry");
                None
            }
            Err(e) => {
                warn!(query, error = %e, "Geocoding failed on update, keeping old geometry");
                None
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        fixture, listing_input, pending_request, Fixture,
    };
    use crate::domain::booking::BookingStatus;

    #[test]
    fn geocode_query_uses_what_is_present() {
        assert_eq!(geocode_query("Pune", "India").as_deref(), Some("Pune, India"));
        assert_eq!(geocode_query("Pune", " ").as_deref(), Some("Pune"));
        assert_eq!(geocode_query("", "India").as_deref(), Some("India"));
        assert_eq!(geocode_query("", ""), None);
    }

    #[tokio::test]
    async fn create_geocodes_and_truncates_tags() {
        let Fixture { listings, .. } = fixture();
        let mut input = listing_input();
        input.tags = vec![
            ListingTag::Premium,
            ListingTag::Suv,
            ListingTag::Electric,
            ListingTag::Manual,
            ListingTag::Budget,
        ];
        let listing = listings.create("owner", input).await.unwrap();
        assert_eq!(listing.tags.len(), 4);
        assert_eq!(listing.geometry.latitude, 18.52);
        assert_eq!(listing.price, Some(1000.0));
    }

    #[tokio::test]
    async fn create_prefers_supplied_coordinates() {
        let Fixture { listings, .. } = fixture();
        let mut input = listing_input();
        input.location = "Nowhere".into();
        input.latitude = Some(1.5);
        input.longitude = Some(2.5);
        let listing = listings.create("owner", input).await.unwrap();
        assert_eq!(listing.geometry, GeoPoint { longitude: 2.5, latitude: 1.5 });
    }

    #[tokio::test]
    async fn create_with_unknown_place_is_rejected() {
        let Fixture { listings, .. } = fixture();
        let mut input = listing_input();
        input.location = "Atlantis".into();
        input.country = "Sea".into();
        match listings.create("owner", input).await {
            Err(DomainError::Validation(msg)) => assert_eq!(msg, MSG_LOCATION_NOT_FOUND),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_keeps_geometry_when_lookup_fails() {
        let Fixture { listings, .. } = fixture();
        let created = listings.create("owner", listing_input()).await.unwrap();

        let mut input = listing_input();
        input.title = "Swift Dzire".into();
        input.location = "Atlantis".into();
        let updated = listings.update(&created.id, "owner", input).await.unwrap();
        assert_eq!(updated.title, "Swift Dzire");
        assert_eq!(updated.geometry, created.geometry);
    }

    #[tokio::test]
    async fn only_owner_may_update_or_delete() {
        let Fixture { listings, .. } = fixture();
        let created = listings.create("owner", listing_input()).await.unwrap();
        assert!(matches!(
            listings.update(&created.id, "intruder", listing_input()).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            listings.delete(&created.id, "intruder").await,
            Err(DomainError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn delete_cascades_to_bookings_and_reviews() {
        let Fixture {
            repos,
            listings,
            bookings,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        listings.add_review(&listing.id, "renter", 5, "Great car").await.unwrap();
        bookings
            .create(&listing.id, "renter", pending_request())
            .await
            .unwrap();

        let deletion = listings.delete(&listing.id, "owner").await.unwrap();
        assert_eq!(deletion.removed_bookings, 1);
        assert_eq!(deletion.removed_reviews, 1);
        assert!(repos.listings().find_by_id(&listing.id).await.unwrap().is_none());
        assert!(repos
            .bookings()
            .find_by_user_with_listing("renter")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn show_reports_viewer_booking_state() {
        let Fixture {
            repos,
            listings,
            bookings,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings
            .create(&listing.id, "renter", pending_request())
            .await
            .unwrap();

        let details = listings.show(&listing.id, Some("renter")).await.unwrap();
        assert_eq!(details.user_booking.map(|b| b.id), Some(booking.id.clone()));
        assert!(!details.can_rebook);

        repos
            .bookings()
            .update_status(&booking.id, BookingStatus::Rejected)
            .await
            .unwrap();
        let anonymous = listings.show(&listing.id, None).await.unwrap();
        assert!(anonymous.user_booking.is_none());
    }

    #[tokio::test]
    async fn reviews_are_linked_and_unlinked() {
        let Fixture { repos, listings, .. } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let review = listings.add_review(&listing.id, "renter", 4, "Clean").await.unwrap();

        let details = listings.show(&listing.id, None).await.unwrap();
        assert_eq!(details.reviews.len(), 1);

        assert!(matches!(
            listings.delete_review(&listing.id, &review.id, "someone").await,
            Err(DomainError::Forbidden(_))
        ));
        listings.delete_review(&listing.id, &review.id, "renter").await.unwrap();
        let listing = repos.listings().find_by_id(&listing.id).await.unwrap().unwrap();
        assert!(listing.reviews.is_empty());
    }

    #[tokio::test]
    async fn review_rating_must_be_in_range() {
        let Fixture { listings, .. } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        assert!(matches!(
            listings.add_review(&listing.id, "renter", 6, "Too good").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            listings.add_review(&listing.id, "renter", 3, "  ").await,
            Err(DomainError::Validation(_))
        ));
    }
}
