//! Application services

pub mod booking;
pub mod dashboard;
pub mod listing;

pub use booking::{
    BookingService, MyBookings, QuoteRequest, RenterBooking, StatusCounts, StatusFilter,
};
pub use dashboard::{DashboardService, OwnerBooking, OwnerDashboard, StatusUpdate};
pub use listing::{geocode_query, ListingDeletion, ListingDetails, ListingInput, ListingService};

use tracing::warn;

use crate::domain::booking::{Booking, BookingWithListing};
use crate::domain::listing::Listing;
use crate::domain::{DomainResult, RepositoryProvider};

/// Split joined rows into live pairs, deleting bookings whose listing is gone.
pub(crate) async fn remove_orphans(
    repos: &dyn RepositoryProvider,
    rows: Vec<BookingWithListing>,
    context: &str,
) -> DomainResult<Vec<(Booking, Listing)>> {
    let mut live = Vec::with_capacity(rows.len());
    let mut orphaned = Vec::new();

    for row in rows {
        match row.listing {
            Some(listing) => live.push((row.booking, listing)),
            None => orphaned.push(row.booking.id),
        }
    }

    if !orphaned.is_empty() {
        let removed = repos.bookings().delete_many(&orphaned).await?;
        metrics::counter!("orphaned_bookings_removed_total").increment(removed);
        warn!(context, removed, "Removed bookings whose listing no longer exists");
    }
    Ok(live)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDateTime;

    use super::{BookingService, DashboardService, ListingInput, ListingService};
    use crate::application::ports::Geocoder;
    use crate::domain::booking::BookingRequest;
    use crate::domain::listing::{GeoPoint, ListingImage};
    use crate::domain::DomainResult;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::FixedClock;

    /// Knows exactly one city.
    pub(crate) struct StubGeocoder;

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, query: &str) -> DomainResult<Option<GeoPoint>> {
            Ok(query.contains("Pune").then_some(GeoPoint {
                longitude: 73.85,
                latitude: 18.52,
            }))
        }
    }

    pub(crate) struct Fixture {
        pub repos: Arc<InMemoryRepositoryProvider>,
        pub listings: ListingService,
        pub bookings: BookingService,
        pub dashboard: DashboardService,
    }

    /// Fresh store, clock at 2024-03-15 08:00.
    pub(crate) fn fixture() -> Fixture {
        fixture_at(Arc::new(InMemoryRepositoryProvider::new()), "2024-03-15 08:00")
    }

    pub(crate) fn fixture_at(repos: Arc<InMemoryRepositoryProvider>, now: &str) -> Fixture {
        let now = NaiveDateTime::parse_from_str(now, "%Y-%m-%d %H:%M").expect("valid test instant");
        let clock = Arc::new(FixedClock(now));
        Fixture {
            listings: ListingService::new(repos.clone(), Arc::new(StubGeocoder), clock.clone()),
            bookings: BookingService::new(repos.clone(), clock.clone()),
            dashboard: DashboardService::new(repos.clone(), clock),
            repos,
        }
    }

    pub(crate) fn listing_input() -> ListingInput {
        ListingInput {
            title: "Swift".into(),
            description: "Hatchback".into(),
            image: Some(ListingImage {
                url: "https://img.example/swift.jpg".into(),
                filename: "swift.jpg".into(),
            }),
            price: 1000.0,
            location: "Pune".into(),
            country: "India".into(),
            ..Default::default()
        }
    }

    pub(crate) fn request_for(pickup: &str, ret: &str) -> BookingRequest {
        BookingRequest {
            full_name: Some("Asha Rao".into()),
            mobile_number: Some("9876543210".into()),
            pickup_date: Some(pickup.into()),
            return_date: Some(ret.into()),
            pickup_time: Some("10:00".into()),
            return_time: Some("10:00".into()),
        }
    }

    pub(crate) fn pending_request() -> BookingRequest {
        request_for("2024-03-15", "2024-03-16")
    }
}
