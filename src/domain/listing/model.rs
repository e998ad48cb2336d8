//! Listing domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of category tags a listing may carry.
pub const MAX_TAGS: usize = 4;

/// Category label used for filtering the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ListingTag {
    Premium,
    Luxurious,
    Budget,
    Family,
    #[serde(rename = "SUV")]
    Suv,
    Sedan,
    Hatchback,
    Electric,
    Manual,
    Automatic,
}

impl ListingTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Luxurious => "Luxurious",
            Self::Budget => "Budget",
            Self::Family => "Family",
            Self::Suv => "SUV",
            Self::Sedan => "Sedan",
            Self::Hatchback => "Hatchback",
            Self::Electric => "Electric",
            Self::Manual => "Manual",
            Self::Automatic => "Automatic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Premium" => Some(Self::Premium),
            "Luxurious" => Some(Self::Luxurious),
            "Budget" => Some(Self::Budget),
            "Family" => Some(Self::Family),
            "SUV" => Some(Self::Suv),
            "Sedan" => Some(Self::Sedan),
            "Hatchback" => Some(Self::Hatchback),
            "Electric" => Some(Self::Electric),
            "Manual" => Some(Self::Manual),
            "Automatic" => Some(Self::Automatic),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keep the first [`MAX_TAGS`] tags, dropping the rest.
pub fn truncate_tags(mut tags: Vec<ListingTag>) -> Vec<ListingTag> {
    tags.truncate(MAX_TAGS);
    tags
}

/// Reference to an already-hosted image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingImage {
    pub url: String,
    pub filename: String,
}

/// WGS84 point, longitude first as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// A car offered for rent
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: ListingImage,
    /// Daily rate. Optional for rows written before the rate became mandatory.
    pub price: Option<f64>,
    pub location: String,
    pub country: String,
    pub tags: Vec<ListingTag>,
    pub geometry: GeoPoint,
    pub owner_id: String,
    /// Review ids, oldest first.
    pub reviews: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Case-insensitive match of `term` against title, location or country.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.title, &self.location, &self.country]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// True when every tag in `required` is carried by this listing.
    pub fn has_all_tags(&self, required: &[ListingTag]) -> bool {
        required.iter().all(|t| self.tags.contains(t))
    }
}

/// Catalogue filter for the listing index.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub tags: Vec<ListingTag>,
}

impl ListingFilter {
    pub fn is_filtered(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.is_empty()) || !self.tags.is_empty()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let search_ok = match self.search.as_deref() {
            Some(term) if !term.is_empty() => listing.matches_search(term),
            _ => true,
        };
        search_ok && listing.has_all_tags(&self.tags)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            id: "L1".into(),
            title: "Toyota Innova".into(),
            description: "7 seater".into(),
            image: ListingImage::default(),
            price: Some(2500.0),
            location: "Goa".into(),
            country: "India".into(),
            tags: vec![ListingTag::Family, ListingTag::Suv],
            geometry: GeoPoint {
                longitude: 73.8,
                latitude: 15.4,
            },
            owner_id: "owner".into(),
            reviews: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn truncate_keeps_first_four() {
        let tags = vec![
            ListingTag::Premium,
            ListingTag::Suv,
            ListingTag::Electric,
            ListingTag::Manual,
            ListingTag::Budget,
        ];
        assert_eq!(
            truncate_tags(tags),
            vec![
                ListingTag::Premium,
                ListingTag::Suv,
                ListingTag::Electric,
                ListingTag::Manual
            ]
        );
    }

    #[test]
    fn search_is_case_insensitive_over_title_location_country() {
        let l = sample_listing();
        assert!(l.matches_search("innova"));
        assert!(l.matches_search("GOA"));
        assert!(l.matches_search("ind"));
        assert!(!l.matches_search("mumbai"));
    }

    #[test]
    fn tag_filter_requires_all_tags() {
        let l = sample_listing();
        let filter = ListingFilter {
            search: None,
            tags: vec![ListingTag::Family, ListingTag::Suv],
        };
        assert!(filter.matches(&l));

        let filter = ListingFilter {
            search: None,
            tags: vec![ListingTag::Family, ListingTag::Electric],
        };
        assert!(!filter.matches(&l));
    }

    #[test]
    fn empty_filter_is_not_filtered() {
        assert!(!ListingFilter::default().is_filtered());
        let f = ListingFilter {
            search: Some(String::new()),
            tags: vec![],
        };
        assert!(!f.is_filtered());
    }

    #[test]
    fn tag_names_roundtrip_through_parse() {
        assert_eq!(ListingTag::parse("SUV"), Some(ListingTag::Suv));
        assert_eq!(ListingTag::Suv.as_str(), "SUV");
        assert_eq!(ListingTag::parse("suv"), None);
    }
}
