//! Listing DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{ListingDeletion, ListingDetails, ListingInput};
use crate::domain::listing::{GeoPoint, Listing, ListingFilter, ListingImage, ListingTag};
use crate::domain::Review;
use crate::interfaces::http::modules::bookings::BookingDto;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageDto {
    pub url: String,
    pub filename: String,
}

impl From<ListingImage> for ImageDto {
    fn from(i: ListingImage) -> Self {
        Self {
            url: i.url,
            filename: i.filename,
        }
    }
}

/// GeoJSON point
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeometryDto {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for GeometryDto {
    fn from(p: GeoPoint) -> Self {
        Self {
            kind: "Point".into(),
            coordinates: vec![p.longitude, p.latitude],
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: ImageDto,
    pub price: Option<f64>,
    pub location: String,
    pub country: String,
    pub tags: Vec<ListingTag>,
    pub geometry: GeometryDto,
    pub owner_id: String,
    pub review_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Listing> for ListingDto {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            title: l.title,
            description: l.description,
            image: l.image.into(),
            price: l.price,
            location: l.location,
            country: l.country,
            tags: l.tags,
            geometry: l.geometry.into(),
            owner_id: l.owner_id,
            review_ids: l.reviews,
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewDto {
    pub id: String,
    pub listing_id: String,
    pub author_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            listing_id: r.listing_id,
            author_id: r.author_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
        }
    }
}

/// Listing page payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDetailsDto {
    pub listing: ListingDto,
    pub reviews: Vec<ReviewDto>,
    /// The caller's pending, running or rejected request, if any
    pub user_booking: Option<BookingDto>,
    pub can_rebook: bool,
}

impl From<ListingDetails> for ListingDetailsDto {
    fn from(d: ListingDetails) -> Self {
        Self {
            listing: d.listing.into(),
            reviews: d.reviews.into_iter().map(Into::into).collect(),
            user_booking: d.user_booking.map(Into::into),
            can_rebook: d.can_rebook,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDeletionDto {
    pub removed_bookings: u64,
    pub removed_reviews: u64,
}

impl From<ListingDeletion> for ListingDeletionDto {
    fn from(d: ListingDeletion) -> Self {
        Self {
            removed_bookings: d.removed_bookings,
            removed_reviews: d.removed_reviews,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListingQuery {
    /// Matched against title, location and country
    pub search: Option<String>,
    /// Comma-separated tags, all required, e.g. `SUV,Family`
    pub tags: Option<String>,
}

impl ListingQuery {
    /// Unknown tag names are ignored.
    pub fn into_filter(self) -> ListingFilter {
        let tags = self
            .tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|t| ListingTag::parse(t.trim()))
            .collect();
        ListingFilter {
            search: self.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            tags,
        }
    }
}

/// Create/update body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListingRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub image: Option<ImageDto>,
    #[validate(range(min = 0.0, message = "price must be greater than or equal to 0"))]
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: String,
    /// At most four are kept
    #[serde(default)]
    pub tags: Vec<ListingTag>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<ListingRequest> for ListingInput {
    fn from(r: ListingRequest) -> Self {
        Self {
            title: r.title,
            description: r.description,
            image: r.image.map(|i| ListingImage {
                url: i.url,
                filename: i.filename,
            }),
            price: r.price,
            location: r.location,
            country: r.country,
            tags: r.tags,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
}

// ── Tests ──────────────────────────────────────────────────────
