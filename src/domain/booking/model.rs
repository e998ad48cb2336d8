//! Booking domain entity

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::window::RentalWindow;
use crate::domain::listing::Listing;

/// Persisted booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Awaiting the owner's decision
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Strict parse; anything outside the three stored values is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status shown to renters: an approved booking whose window has ended
/// is reported as `Completed`. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A renter's request to rent a listing for a date/time window
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub listing_id: String,
    /// Requesting renter
    pub user_id: String,
    /// Copy of the listing owner at booking time
    pub owner_id: String,
    pub full_name: String,
    pub mobile_number: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    /// "HH:MM", stored verbatim
    pub pickup_time: String,
    /// "HH:MM", stored verbatim
    pub return_time: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// New pending booking against `listing`, owner copied from the listing.
    pub fn new(listing: &Listing, user_id: impl Into<String>, details: BookingDetails) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            listing_id: listing.id.clone(),
            user_id: user_id.into(),
            owner_id: listing.owner_id.clone(),
            full_name: details.full_name,
            mobile_number: details.mobile_number,
            pickup_date: details.pickup_date,
            return_date: details.return_date,
            pickup_time: details.pickup_time,
            return_time: details.return_time,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn window(&self) -> RentalWindow<'_> {
        RentalWindow {
            pickup_date: self.pickup_date,
            pickup_time: Some(self.pickup_time.as_str()),
            return_date: self.return_date,
            return_time: Some(self.return_time.as_str()),
        }
    }

    /// End of the rental window, `None` when the stored time is unreadable.
    pub fn end_at(&self) -> Option<NaiveDateTime> {
        self.window().end()
    }

    pub fn is_approved_ongoing(&self, now: NaiveDateTime) -> bool {
        self.status == BookingStatus::Approved && !self.window().has_ended(now)
    }

    pub fn is_approved_completed(&self, now: NaiveDateTime) -> bool {
        self.status == BookingStatus::Approved && self.window().has_ended(now)
    }

    pub fn display_status(&self, now: NaiveDateTime) -> DisplayStatus {
        match self.status {
            BookingStatus::Pending => DisplayStatus::Pending,
            BookingStatus::Rejected => DisplayStatus::Rejected,
            BookingStatus::Approved if self.window().has_ended(now) => DisplayStatus::Completed,
            BookingStatus::Approved => DisplayStatus::Approved,
        }
    }

    /// Approved and still running: the owner dashboard shows it as locked.
    pub fn is_approved_locked(&self, now: NaiveDateTime) -> bool {
        self.is_approved_ongoing(now)
    }
}

/// Validated renter-supplied fields of a booking request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub full_name: String,
    pub mobile_number: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_time: String,
    pub return_time: String,
}

/// A booking joined with its listing; `listing` is `None` for orphans.
#[derive(Debug, Clone)]
pub struct BookingWithListing {
    pub booking: Booking,
    pub listing: Option<Listing>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::listing::{GeoPoint, ListingImage};

    pub(crate) fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M")
            .expect("valid test instant")
    }

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
    }

    pub(crate) fn sample_listing(owner: &str) -> Listing {
        Listing {
            id: "listing-1".into(),
            title: "Swift".into(),
            description: "Hatchback".into(),
            image: ListingImage::default(),
            price: Some(1000.0),
            location: "Pune".into(),
            country: "India".into(),
            tags: vec![],
            geometry: GeoPoint {
                longitude: 73.85,
                latitude: 18.52,
            },
            owner_id: owner.into(),
            reviews: vec![],
            created_at: Utc::now(),
        }
    }

    pub(crate) fn booking(status: BookingStatus, ret: &str, ret_time: &str) -> Booking {
        let mut b = Booking::new(
            &sample_listing("owner"),
            "renter",
            BookingDetails {
                full_name: "Asha Rao".into(),
                mobile_number: "9876543210".into(),
                pickup_date: date("2024-01-01"),
                return_date: date(ret),
                pickup_time: "09:00".into(),
                return_time: ret_time.into(),
            },
        );
        b.status = status;
        b
    }

    #[test]
    fn new_booking_is_pending_and_copies_owner() {
        let b = booking(BookingStatus::Pending, "2024-01-02", "09:00");
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.owner_id, "owner");
        assert_eq!(b.listing_id, "listing-1");
    }

    #[test]
    fn approved_becomes_completed_after_end() {
        let b = booking(BookingStatus::Approved, "2024-01-02", "09:00");
        assert_eq!(
            b.display_status(at("2024-01-02", "08:59")),
            DisplayStatus::Approved
        );
        assert!(b.is_approved_locked(at("2024-01-02", "08:59")));
        assert_eq!(
            b.display_status(at("2024-01-02", "09:00")),
            DisplayStatus::Completed
        );
        assert!(!b.is_approved_locked(at("2024-01-02", "09:00")));
    }

    #[test]
    fn unreadable_end_time_is_treated_as_not_ended() {
        let b = booking(BookingStatus::Approved, "2024-01-02", "xx:00");
        let far_future = at("2030-01-01", "00:00");
        assert_eq!(b.end_at(), None);
        assert_eq!(b.display_status(far_future), DisplayStatus::Approved);
        assert!(b.is_approved_ongoing(far_future));
    }

    #[test]
    fn rejected_and_pending_display_as_is() {
        let now = at("2030-01-01", "00:00");
        let b = booking(BookingStatus::Rejected, "2024-01-02", "09:00");
        assert_eq!(b.display_status(now), DisplayStatus::Rejected);
        let b = booking(BookingStatus::Pending, "2024-01-02", "09:00");
        assert_eq!(b.display_status(now), DisplayStatus::Pending);
    }

    #[test]
    fn status_parse_is_strict() {
        assert_eq!(BookingStatus::parse("approved"), Some(BookingStatus::Approved));
        assert_eq!(BookingStatus::parse("Approved"), None);
        assert_eq!(BookingStatus::parse("completed"), None);
        assert_eq!(DisplayStatus::parse("completed"), Some(DisplayStatus::Completed));
    }
}
