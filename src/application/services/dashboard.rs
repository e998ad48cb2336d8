//! Owner dashboard service
//!
//! Lists an owner's listings and incoming booking requests with income
//! totals, and applies the owner's approve/reject decisions.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::remove_orphans;
use crate::domain::booking::status::MSG_STATUS_UNCHANGED;
use crate::domain::booking::{
    aggregate_income, plan_status_change, Booking, BookingStatus, IncomeSummary, StatusChange,
};
use crate::domain::listing::Listing;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::SharedClock;

pub const MSG_BOOKING_NOT_OWNED: &str = "Booking not found or unauthorized";
pub const MSG_STATUS_UPDATED: &str = "Booking status updated successfully";

/// A booking request as the owner sees it
#[derive(Debug, Clone)]
pub struct OwnerBooking {
    pub booking: Booking,
    pub listing: Listing,
    /// Approved and still running; the owner can no longer act on it
    pub is_approved_locked: bool,
    pub end_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct OwnerDashboard {
    pub listings: Vec<Listing>,
    pub booking_requests: Vec<OwnerBooking>,
    pub total_bookings: usize,
    pub approved_bookings: usize,
    pub income: IncomeSummary,
}

/// Result of an owner's status decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub booking_id: String,
    pub new_status: BookingStatus,
    /// False when the requested status was already set
    pub changed: bool,
    pub message: &'static str,
}

pub struct DashboardService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl DashboardService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    pub async fn read_dashboard(&self, owner_id: &str) -> DomainResult<OwnerDashboard> {
        let listings = self.repos.listings().find_by_owner(owner_id).await?;

        let rows = self.repos.bookings().find_by_owner_with_listing(owner_id).await?;

        // orphans carry no listing and are never counted
        let income = aggregate_income(&rows);
        if !income.skipped.is_empty() {
            for skipped in &income.skipped {
                debug!(
                    booking_id = %skipped.booking_id,
                    reason = %skipped.reason,
                    "Booking left out of income"
                );
            }
            metrics::counter!("income_skipped_bookings_total")
                .increment(income.skipped.len() as u64);
        }

        let rows = remove_orphans(self.repos.as_ref(), rows, owner_id).await?;

        let now = self.clock.now();
        let booking_requests: Vec<OwnerBooking> = rows
            .into_iter()
            .map(|(booking, listing)| OwnerBooking {
                is_approved_locked: booking.is_approved_locked(now),
                end_at: booking.end_at(),
                booking,
                listing,
            })
            .collect();

        let approved_bookings = booking_requests
            .iter()
            .filter(|b| b.booking.status == BookingStatus::Approved)
            .count();

        Ok(OwnerDashboard {
            listings,
            total_bookings: booking_requests.len(),
            approved_bookings,
            booking_requests,
            income,
        })
    }

    /// Apply the owner's decision on one of their booking requests.
    pub async fn update_status(
        &self,
        booking_id: &str,
        owner_id: &str,
        requested: &str,
    ) -> DomainResult<StatusUpdate> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .filter(|b| b.owner_id == owner_id)
            .ok_or_else(|| DomainError::NotFound(MSG_BOOKING_NOT_OWNED.into()))?;

        match plan_status_change(booking.status, requested)? {
            StatusChange::Unchanged(status) => {
                debug!(booking_id, %status, "Status unchanged");
                Ok(StatusUpdate {
                    booking_id: booking.id,
                    new_status: status,
                    changed: false,
                    message: MSG_STATUS_UNCHANGED,
                })
            }
            StatusChange::Applied { from, to } => {
                self.repos.bookings().update_status(booking_id, to).await?;
                metrics::counter!("booking_status_updates_total", "status" => to.as_str())
                    .increment(1);
                info!(booking_id, owner_id, %from, %to, "Booking status updated");
                Ok(StatusUpdate {
                    booking_id: booking.id,
                    new_status: to,
                    changed: true,
                    message: MSG_STATUS_UPDATED,
                })
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        fixture, fixture_at, listing_input, pending_request, Fixture,
    };
    use crate::domain::booking::status::{MSG_ALREADY_DECIDED, MSG_INVALID_STATUS};

    #[tokio::test]
    async fn approve_then_repeat_is_a_no_op() {
        let Fixture {
            listings,
            bookings,
            dashboard,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();

        let first = dashboard.update_status(&booking.id, "owner", "approved").await.unwrap();
        assert!(first.changed);
        assert_eq!(first.new_status, BookingStatus::Approved);

        let again = dashboard.update_status(&booking.id, "owner", "approved").await.unwrap();
        assert!(!again.changed);
        assert_eq!(again.message, MSG_STATUS_UNCHANGED);
    }

    #[tokio::test]
    async fn decisions_are_final() {
        let Fixture {
            repos,
            listings,
            bookings,
            dashboard,
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        dashboard.update_status(&booking.id, "owner", "rejected").await.unwrap();

        let err = dashboard
            .update_status(&booking.id, "owner", "approved")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PolicyViolation(m) if m == MSG_ALREADY_DECIDED));

        let stored = repos.bookings().find_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Rejected);
    }

    #[tokio::test]
    async fn foreign_or_missing_booking_is_not_found() {
        let Fixture {
            listings,
            bookings,
            dashboard,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();

        for (id, caller) in [(booking.id.as_str(), "renter"), ("nope", "owner")] {
            let err = dashboard.update_status(id, caller, "approved").await.unwrap_err();
            assert!(matches!(err, DomainError::NotFound(m) if m == MSG_BOOKING_NOT_OWNED));
        }
    }

    #[tokio::test]
    async fn invalid_status_is_a_validation_error() {
        let Fixture {
            listings,
            bookings,
            dashboard,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        let err = dashboard
            .update_status(&booking.id, "owner", "completed")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(m) if m == MSG_INVALID_STATUS));
    }

    #[tokio::test]
    async fn dashboard_totals_and_lock_state() {
        let Fixture {
            repos,
            listings,
            bookings,
            dashboard,
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let approved = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        bookings.create(&listing.id, "other", pending_request()).await.unwrap();
        dashboard.update_status(&approved.id, "owner", "approved").await.unwrap();

        let view = dashboard.read_dashboard("owner").await.unwrap();
        assert_eq!(view.listings.len(), 1);
        assert_eq!(view.total_bookings, 2);
        assert_eq!(view.approved_bookings, 1);
        assert_eq!(view.income.display_total(), "1180.00");
        let locked = view
            .booking_requests
            .iter()
            .find(|b| b.booking.id == approved.id)
            .unwrap();
        assert!(locked.is_approved_locked);

        // after the return instant the approval unlocks
        let later = fixture_at(repos, "2024-03-16 10:00");
        let view = later.dashboard.read_dashboard("owner").await.unwrap();
        assert!(view.booking_requests.iter().all(|b| !b.is_approved_locked));
        assert_eq!(view.income.display_total(), "1180.00");
    }

    #[tokio::test]
    async fn orphaned_requests_are_removed() {
        let Fixture {
            repos,
            listings,
            bookings,
            dashboard,
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        repos.listings().delete(&listing.id).await.unwrap();

        let view = dashboard.read_dashboard("owner").await.unwrap();
        assert_eq!(view.total_bookings, 0);
        assert!(view.listings.is_empty());
        assert!(repos.bookings().find_by_id(&booking.id).await.unwrap().is_none());
    }
}
