//! Renter-side booking service
//!
//! Create and cancel booking requests, list the caller's bookings with
//! pricing, and quote a rental without persisting anything.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::remove_orphans;
use crate::domain::booking::eligibility::{ensure_not_own_listing, MSG_PENDING_EXISTS};
use crate::domain::booking::request::parse_date;
use crate::domain::booking::{
    quote, Booking, BookingEligibility, BookingRequest, BookingStatus, DailyRate, DisplayStatus,
    PriceQuote, RentalWindow,
};
use crate::domain::listing::Listing;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::SharedClock;

pub const MSG_LISTING_GONE: &str = "This listing no longer exists or has been deleted.";
pub const MSG_CANCEL_NOT_FOUND: &str = "Booking not found or already cancelled.";
pub const MSG_CANCEL_FORBIDDEN: &str = "You are not authorized to cancel this booking.";
pub const MSG_CANCEL_NOT_PENDING: &str = "Only pending bookings can be cancelled.";

/// Which bookings "my bookings" shows, by display status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DisplayStatus),
}

impl StatusFilter {
    /// Case-insensitive; unknown or missing values mean `All`.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(str::to_lowercase)
            .as_deref()
            .and_then(DisplayStatus::parse)
            .map(Self::Only)
            .unwrap_or(Self::All)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }

    fn accepts(&self, status: DisplayStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Per-display-status badge counts, computed before filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
}

impl StatusCounts {
    fn record(&mut self, status: DisplayStatus) {
        self.all += 1;
        match status {
            DisplayStatus::Pending => self.pending += 1,
            DisplayStatus::Approved => self.approved += 1,
            DisplayStatus::Rejected => self.rejected += 1,
            DisplayStatus::Completed => self.completed += 1,
        }
    }
}

/// One row of the renter's booking list
#[derive(Debug, Clone)]
pub struct RenterBooking {
    pub booking: Booking,
    pub listing: Listing,
    pub display_status: DisplayStatus,
    pub end_at: Option<NaiveDateTime>,
    /// `None` when the listing has no usable price
    pub pricing: Option<PriceQuote>,
}

#[derive(Debug, Clone)]
pub struct MyBookings {
    pub bookings: Vec<RenterBooking>,
    pub selected: StatusFilter,
    pub counts: StatusCounts,
}

/// Price preview input
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub rate: DailyRate,
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    pub return_date: String,
    pub return_time: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    /// Submit a booking request for `listing_id` on behalf of `user_id`.
    pub async fn create(
        &self,
        listing_id: &str,
        user_id: &str,
        request: BookingRequest,
    ) -> DomainResult<Booking> {
        let details = request.validate(self.clock.today())?;

        let listing = self
            .repos
            .listings()
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(MSG_LISTING_GONE.into()))?;

        ensure_not_own_listing(&listing, user_id)?;

        let history = self
            .repos
            .bookings()
            .find_for_listing_and_user(listing_id, user_id)
            .await?;
        BookingEligibility::assess(&history, self.clock.now()).check_new_booking()?;

        let booking = Booking::new(&listing, user_id, details);
        self.repos
            .bookings()
            .save(booking.clone())
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent request from the same user
                DomainError::Conflict(_) => DomainError::PolicyViolation(MSG_PENDING_EXISTS.into()),
                other => other,
            })?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = %booking.id,
            listing_id,
            user_id,
            "Booking request created"
        );
        Ok(booking)
    }

    /// Withdraw a pending request. Only its renter may do this.
    pub async fn cancel(&self, booking_id: &str, user_id: &str) -> DomainResult<()> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(MSG_CANCEL_NOT_FOUND.into()))?;

        if booking.user_id != user_id {
            return Err(DomainError::Forbidden(MSG_CANCEL_FORBIDDEN.into()));
        }
        if booking.status != BookingStatus::Pending {
            return Err(DomainError::PolicyViolation(MSG_CANCEL_NOT_PENDING.into()));
        }

        self.repos.bookings().delete(booking_id).await?;
        info!(booking_id, user_id, "Booking request cancelled");
        Ok(())
    }

    /// The caller's bookings, newest first, with display status and pricing.
    pub async fn my_bookings(&self, user_id: &str, selected: StatusFilter) -> DomainResult<MyBookings> {
        let rows = self.repos.bookings().find_by_user_with_listing(user_id).await?;
        let rows = remove_orphans(self.repos.as_ref(), rows, user_id).await?;

        let now = self.clock.now();
        let mut counts = StatusCounts::default();
        let mut bookings = Vec::with_capacity(rows.len());

        for (booking, listing) in rows {
            let display_status = booking.display_status(now);
            counts.record(display_status);
            if !selected.accepts(display_status) {
                continue;
            }

            let pricing = listing.price.and_then(|price| {
                quote(&DailyRate::Amount(price), &booking.window())
                    .map_err(|reason| {
                        debug!(booking_id = %booking.id, %reason, "Booking not priced");
                    })
                    .ok()
            });

            bookings.push(RenterBooking {
                end_at: booking.end_at(),
                display_status,
                pricing,
                booking,
                listing,
            });
        }

        Ok(MyBookings {
            bookings,
            selected,
            counts,
        })
    }

    /// Price a prospective rental.
    pub fn quote(&self, request: &QuoteRequest) -> DomainResult<PriceQuote> {
        let pickup_date = parse_date(&request.pickup_date)?;
        let return_date = parse_date(&request.return_date)?;
        let window = RentalWindow {
            pickup_date,
            pickup_time: request.pickup_time.as_deref(),
            return_date,
            return_time: request.return_time.as_deref(),
        };
        quote(&request.rate, &window).map_err(|reason| DomainError::Validation(reason.to_string()))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        fixture, fixture_at, listing_input, pending_request, request_for, Fixture,
    };
    use crate::domain::booking::eligibility::{
        MSG_ACTIVE_APPROVED_EXISTS, MSG_OWN_LISTING, MSG_PREVIOUSLY_REJECTED,
    };
    use crate::domain::booking::request::MSG_FIELDS_REQUIRED;

    fn message(err: DomainError) -> String {
        match err {
            DomainError::Validation(m)
            | DomainError::PolicyViolation(m)
            | DomainError::NotFound(m)
            | DomainError::Forbidden(m) => m,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_copies_owner_and_starts_pending() {
        let Fixture { listings, bookings, .. } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.owner_id, "owner");
    }

    #[tokio::test]
    async fn validation_runs_before_listing_lookup() {
        let Fixture { bookings, .. } = fixture();
        let mut request = pending_request();
        request.full_name = None;
        let err = bookings.create("missing", "renter", request).await.unwrap_err();
        assert_eq!(message(err), MSG_FIELDS_REQUIRED);

        let err = bookings
            .create("missing", "renter", pending_request())
            .await
            .unwrap_err();
        assert_eq!(message(err), MSG_LISTING_GONE);
    }

    #[tokio::test]
    async fn owner_cannot_book_own_listing() {
        let Fixture { listings, bookings, .. } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let err = bookings
            .create(&listing.id, "owner", pending_request())
            .await
            .unwrap_err();
        assert_eq!(message(err), MSG_OWN_LISTING);
    }

    #[tokio::test]
    async fn second_request_while_pending_is_rejected() {
        let Fixture { listings, bookings, .. } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        let err = bookings
            .create(&listing.id, "renter", pending_request())
            .await
            .unwrap_err();
        assert_eq!(message(err), MSG_PENDING_EXISTS);
    }

    #[tokio::test]
    async fn approved_then_completed_allows_rebooking() {
        let Fixture {
            repos,
            listings,
            bookings,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let first = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        repos
            .bookings()
            .update_status(&first.id, BookingStatus::Approved)
            .await
            .unwrap();

        let err = bookings
            .create(&listing.id, "renter", pending_request())
            .await
            .unwrap_err();
        assert_eq!(message(err), MSG_ACTIVE_APPROVED_EXISTS);

        // a week later the rental has ended
        let later = fixture_at(repos.clone(), "2024-03-20 10:00");
        later
            .bookings
            .create(&listing.id, "renter", request_for("2024-03-21", "2024-03-22"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_request_blocks_rebooking() {
        let Fixture {
            repos,
            listings,
            bookings,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let first = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        repos
            .bookings()
            .update_status(&first.id, BookingStatus::Rejected)
            .await
            .unwrap();
        let err = bookings
            .create(&listing.id, "renter", pending_request())
            .await
            .unwrap_err();
        assert_eq!(message(err), MSG_PREVIOUSLY_REJECTED);
    }

    #[tokio::test]
    async fn cancel_rules() {
        let Fixture {
            repos,
            listings,
            bookings,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let booking = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();

        assert_eq!(
            message(bookings.cancel(&booking.id, "intruder").await.unwrap_err()),
            MSG_CANCEL_FORBIDDEN
        );
        bookings.cancel(&booking.id, "renter").await.unwrap();
        assert_eq!(
            message(bookings.cancel(&booking.id, "renter").await.unwrap_err()),
            MSG_CANCEL_NOT_FOUND
        );

        let second = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();
        repos
            .bookings()
            .update_status(&second.id, BookingStatus::Approved)
            .await
            .unwrap();
        assert_eq!(
            message(bookings.cancel(&second.id, "renter").await.unwrap_err()),
            MSG_CANCEL_NOT_PENDING
        );
    }

    #[tokio::test]
    async fn my_bookings_prices_counts_and_drops_orphans() {
        let Fixture {
            repos,
            listings,
            bookings,
            ..
        } = fixture();
        let listing = listings.create("owner", listing_input()).await.unwrap();
        let kept = bookings.create(&listing.id, "renter", pending_request()).await.unwrap();

        let doomed = listings.create("owner", listing_input()).await.unwrap();
        let orphan = bookings.create(&doomed.id, "renter", pending_request()).await.unwrap();
        repos.listings().delete(&doomed.id).await.unwrap();

        let mine = bookings.my_bookings("renter", StatusFilter::All).await.unwrap();
        assert_eq!(mine.bookings.len(), 1);
        assert_eq!(mine.bookings[0].booking.id, kept.id);
        assert_eq!(mine.counts.all, 1);
        assert_eq!(mine.counts.pending, 1);
        // 2024-03-15 10:00 -> 2024-03-16 10:00 at 1000/day
        let pricing = mine.bookings[0].pricing.unwrap();
        assert_eq!(pricing.rental_days, 1.0);
        assert_eq!(pricing.total_amount, 1180.0);

        assert!(repos.bookings().find_by_id(&orphan.id).await.unwrap().is_none());

        let approved_only = bookings
            .my_bookings("renter", StatusFilter::Only(DisplayStatus::Approved))
            .await
            .unwrap();
        assert!(approved_only.bookings.is_empty());
        assert_eq!(approved_only.counts.pending, 1);
    }

    #[test]
    fn status_filter_defaults_to_all() {
        assert_eq!(StatusFilter::parse(None), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("bogus")), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(Some("completed")),
            StatusFilter::Only(DisplayStatus::Completed)
        );
    }

    #[test]
    fn status_filter_ignores_case() {
        assert_eq!(
            StatusFilter::parse(Some("Completed")),
            StatusFilter::Only(DisplayStatus::Completed)
        );
        assert_eq!(
            StatusFilter::parse(Some("PENDING")),
            StatusFilter::Only(DisplayStatus::Pending)
        );
    }

    #[tokio::test]
    async fn quote_matches_pricing_engine() {
        let Fixture { bookings, .. } = fixture();
        let q = bookings
            .quote(&QuoteRequest {
                rate: DailyRate::from("₹1,000"),
                pickup_date: "2024-01-01".into(),
                pickup_time: Some("09:00".into()),
                return_date: "2024-01-01".into(),
                return_time: Some("15:00".into()),
            })
            .unwrap();
        assert_eq!(q.rental_days, 0.5);
        assert_eq!(q.total_amount, 590.0);

        let err = bookings
            .quote(&QuoteRequest {
                rate: DailyRate::from("1.2.3"),
                pickup_date: "2024-01-01".into(),
                pickup_time: None,
                return_date: "2024-01-02".into(),
                return_time: None,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    /// A store whose history read misses a request that lands right after it.
    mod racing {
        use async_trait::async_trait;

        use super::*;
        use crate::domain::booking::{BookingRepository, BookingWithListing};
        use crate::domain::listing::ListingRepository;
        use crate::domain::review::ReviewRepository;
        use crate::domain::user::UserRepository;

        pub(super) struct StaleHistory(pub Arc<dyn RepositoryProvider>);

        #[async_trait]
        impl BookingRepository for StaleHistory {
            async fn save(&self, booking: Booking) -> DomainResult<()> {
                self.0.bookings().save(booking).await
            }
            async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
                self.0.bookings().find_by_id(id).await
            }
            async fn update_status(&self, id: &str, status: BookingStatus) -> DomainResult<()> {
                self.0.bookings().update_status(id, status).await
            }
            async fn find_for_listing_and_user(
                &self,
                _listing_id: &str,
                _user_id: &str,
            ) -> DomainResult<Vec<Booking>> {
                Ok(Vec::new())
            }
            async fn find_by_owner_with_listing(
                &self,
                owner_id: &str,
            ) -> DomainResult<Vec<BookingWithListing>> {
                self.0.bookings().find_by_owner_with_listing(owner_id).await
            }
            async fn find_by_user_with_listing(
                &self,
                user_id: &str,
            ) -> DomainResult<Vec<BookingWithListing>> {
                self.0.bookings().find_by_user_with_listing(user_id).await
            }
            async fn delete(&self, id: &str) -> DomainResult<bool> {
                self.0.bookings().delete(id).await
            }
            async fn delete_by_listing(&self, listing_id: &str) -> DomainResult<u64> {
                self.0.bookings().delete_by_listing(listing_id).await
            }
            async fn delete_many(&self, ids: &[String]) -> DomainResult<u64> {
                self.0.bookings().delete_many(ids).await
            }
        }

        pub(super) struct RacingRepos {
            pub inner: Arc<dyn RepositoryProvider>,
            pub bookings: StaleHistory,
        }

        impl RepositoryProvider for RacingRepos {
            fn users(&self) -> &dyn UserRepository {
                self.inner.users()
            }
            fn listings(&self) -> &dyn ListingRepository {
                self.inner.listings()
            }
            fn reviews(&self) -> &dyn ReviewRepository {
                self.inner.reviews()
            }
            fn bookings(&self) -> &dyn BookingRepository {
                &self.bookings
            }
        }
    }

    #[tokio::test]
    async fn unique_index_conflict_reads_as_pending_exists() {
        use crate::domain::booking::model::tests::booking;
        use crate::infrastructure::database::repositories::booking_repository::tests::sqlite_repos;
        use crate::shared::FixedClock;

        let store: Arc<dyn RepositoryProvider> = Arc::new(sqlite_repos().await);
        // the competing request is already committed
        store
            .bookings()
            .save(booking(BookingStatus::Pending, "2024-03-16", "10:00"))
            .await
            .unwrap();

        let repos = Arc::new(racing::RacingRepos {
            inner: store.clone(),
            bookings: racing::StaleHistory(store.clone()),
        });
        let now = NaiveDateTime::parse_from_str("2024-03-15 08:00", "%Y-%m-%d %H:%M").unwrap();
        let bookings = BookingService::new(repos, Arc::new(FixedClock(now)));

        let err = bookings
            .create("listing-1", "renter", pending_request())
            .await
            .unwrap_err();
        assert_eq!(message(err), MSG_PENDING_EXISTS);

        let history = store
            .bookings()
            .find_for_listing_and_user("listing-1", "renter")
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
    }
}
