//! Booking eligibility
//!
//! Classifies one user's booking history for one listing and decides whether
//! a new request may be created. The same classification drives the
//! "your booking" panel and the rebook hint on the listing page.

use chrono::NaiveDateTime;

use super::model::{Booking, BookingStatus};
use crate::domain::listing::Listing;
use crate::domain::{DomainError, DomainResult};

pub const MSG_PENDING_EXISTS: &str = "You already have a pending request for this listing.";
pub const MSG_ACTIVE_APPROVED_EXISTS: &str =
    "You already have an active approved booking for this listing.";
pub const MSG_PREVIOUSLY_REJECTED: &str =
    "Your previous booking request for this listing was rejected. You cannot book it again.";
pub const MSG_OWN_LISTING: &str = "You cannot book your own listing.";

/// Classified history of one (listing, user) pair.
///
/// Each slot holds the newest booking of its class; `history` must be sorted
/// newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingEligibility<'a> {
    pending: Option<&'a Booking>,
    approved_ongoing: Option<&'a Booking>,
    latest_rejected: Option<&'a Booking>,
    has_approved_completed: bool,
}

impl<'a> BookingEligibility<'a> {
    pub fn assess(history: &'a [Booking], now: NaiveDateTime) -> Self {
        let mut out = Self::default();
        for booking in history {
            match booking.status {
                BookingStatus::Pending => {
                    out.pending.get_or_insert(booking);
                }
                BookingStatus::Approved if booking.is_approved_completed(now) => {
                    out.has_approved_completed = true;
                }
                BookingStatus::Approved => {
                    out.approved_ongoing.get_or_insert(booking);
                }
                BookingStatus::Rejected => {
                    out.latest_rejected.get_or_insert(booking);
                }
            }
        }
        out
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_approved_ongoing(&self) -> bool {
        self.approved_ongoing.is_some()
    }

    pub fn has_rejected(&self) -> bool {
        self.latest_rejected.is_some()
    }

    pub fn has_approved_completed(&self) -> bool {
        self.has_approved_completed
    }

    /// Gate for a new booking request; first matching rule wins.
    pub fn check_new_booking(&self) -> DomainResult<()> {
        if self.has_pending() {
            return Err(DomainError::PolicyViolation(MSG_PENDING_EXISTS.into()));
        }
        if self.has_approved_ongoing() {
            return Err(DomainError::PolicyViolation(
                MSG_ACTIVE_APPROVED_EXISTS.into(),
            ));
        }
        if self.has_rejected() && !self.has_approved_completed {
            return Err(DomainError::PolicyViolation(MSG_PREVIOUSLY_REJECTED.into()));
        }
        Ok(())
    }

    /// The booking to show as "your booking": newest pending, else newest
    /// ongoing approved, else newest rejected unless a completed rental
    /// has since cleared it.
    pub fn blocking_booking(&self) -> Option<&'a Booking> {
        self.pending
            .or(self.approved_ongoing)
            .or(self.latest_rejected.filter(|_| !self.has_approved_completed))
    }

    pub fn can_rebook(&self) -> bool {
        self.has_approved_completed && !self.has_pending() && !self.has_approved_ongoing()
    }
}

/// Owners never book their own listing.
pub fn ensure_not_own_listing(listing: &Listing, user_id: &str) -> DomainResult<()> {
    if listing.is_owned_by(user_id) {
        return Err(DomainError::PolicyViolation(MSG_OWN_LISTING.into()));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::model::tests::{at, booking, sample_listing};

    fn now() -> NaiveDateTime {
        at("2024-02-01", "12:00")
    }

    fn message(result: DomainResult<()>) -> String {
        match result {
            Err(DomainError::PolicyViolation(msg)) => msg,
            other => panic!("expected policy violation, got {other:?}"),
        }
    }

    #[test]
    fn empty_history_allows_booking() {
        let e = BookingEligibility::assess(&[], now());
        assert!(e.check_new_booking().is_ok());
        assert!(e.blocking_booking().is_none());
        assert!(!e.can_rebook());
    }

    #[test]
    fn pending_blocks_first() {
        let history = vec![
            booking(BookingStatus::Pending, "2024-03-01", "09:00"),
            booking(BookingStatus::Approved, "2024-03-01", "09:00"),
            booking(BookingStatus::Rejected, "2024-01-02", "09:00"),
        ];
        let e = BookingEligibility::assess(&history, now());
        assert_eq!(message(e.check_new_booking()), MSG_PENDING_EXISTS);
        assert_eq!(
            e.blocking_booking().map(|b| b.status),
            Some(BookingStatus::Pending)
        );
    }

    #[test]
    fn ongoing_approved_blocks() {
        let history = vec![booking(BookingStatus::Approved, "2024-03-01", "09:00")];
        let e = BookingEligibility::assess(&history, now());
        assert_eq!(message(e.check_new_booking()), MSG_ACTIVE_APPROVED_EXISTS);
        assert!(!e.can_rebook());
    }

    #[test]
    fn approved_with_unreadable_end_counts_as_ongoing() {
        let history = vec![booking(BookingStatus::Approved, "2024-01-02", "later")];
        let e = BookingEligibility::assess(&history, now());
        assert!(e.has_approved_ongoing());
        assert_eq!(message(e.check_new_booking()), MSG_ACTIVE_APPROVED_EXISTS);
    }

    #[test]
    fn rejection_without_completed_rental_blocks_forever() {
        let history = vec![booking(BookingStatus::Rejected, "2024-01-02", "09:00")];
        let e = BookingEligibility::assess(&history, at("2030-01-01", "00:00"));
        assert_eq!(message(e.check_new_booking()), MSG_PREVIOUSLY_REJECTED);
        assert!(e.blocking_booking().is_some());
        assert!(!e.can_rebook());
    }

    #[test]
    fn completed_rental_allows_rebooking() {
        let history = vec![booking(BookingStatus::Approved, "2024-01-02", "09:00")];
        let e = BookingEligibility::assess(&history, now());
        assert!(e.check_new_booking().is_ok());
        assert!(e.can_rebook());
        assert!(e.blocking_booking().is_none());
    }

    #[test]
    fn completed_rental_clears_earlier_rejection() {
        let history = vec![
            booking(BookingStatus::Rejected, "2024-01-10", "09:00"),
            booking(BookingStatus::Approved, "2024-01-02", "09:00"),
        ];
        let e = BookingEligibility::assess(&history, now());
        assert!(e.check_new_booking().is_ok());
        assert!(e.can_rebook());
        assert!(e.blocking_booking().is_none());
    }

    #[test]
    fn newest_booking_of_each_class_is_kept() {
        let mut older = booking(BookingStatus::Rejected, "2024-01-02", "09:00");
        older.id = "older".into();
        let mut newer = booking(BookingStatus::Rejected, "2024-01-05", "09:00");
        newer.id = "newer".into();
        let history = vec![newer, older];
        let e = BookingEligibility::assess(&history, now());
        assert_eq!(e.blocking_booking().map(|b| b.id.as_str()), Some("newer"));
    }

    #[test]
    fn owner_cannot_book_own_listing() {
        let listing = sample_listing("owner");
        assert_eq!(
            message(ensure_not_own_listing(&listing, "owner")),
            MSG_OWN_LISTING
        );
        assert!(ensure_not_own_listing(&listing, "renter").is_ok());
    }
}
