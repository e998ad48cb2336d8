//! Review domain entity

use chrono::{DateTime, Utc};

/// A renter's rating of a listing
#[derive(Debug, Clone)]
pub struct Review {
    pub id: String,
    pub listing_id: String,
    pub author_id: String,
    /// 1..=5
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        listing_id: impl Into<String>,
        author_id: impl Into<String>,
        rating: i32,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            listing_id: listing_id.into(),
            author_id: author_id.into(),
            rating,
            comment: comment.into(),
            created_at: Utc::now(),
        }
    }
}
