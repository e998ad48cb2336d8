//! Booking DTOs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::services::{MyBookings, QuoteRequest, RenterBooking, StatusCounts};
use crate::domain::booking::{Booking, BookingRequest, DailyRate, PriceQuote};
use crate::interfaces::http::modules::listings::ListingDto;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub listing_id: String,
    pub user_id: String,
    pub owner_id: String,
    pub full_name: String,
    pub mobile_number: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_time: String,
    pub return_time: String,
    /// pending, approved or rejected
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            listing_id: b.listing_id,
            user_id: b.user_id,
            owner_id: b.owner_id,
            full_name: b.full_name,
            mobile_number: b.mobile_number,
            pickup_date: b.pickup_date,
            return_date: b.return_date,
            pickup_time: b.pickup_time,
            return_time: b.return_time,
            status: b.status.as_str().to_string(),
            created_at: b.created_at,
        }
    }
}

/// Booking form. Every field is required; blanks are rejected by the
/// booking rules with a single message rather than per field. Field names
/// are accepted in snake_case or camelCase.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateBookingRequest {
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(alias = "mobileNumber")]
    pub mobile_number: Option<String>,
    /// YYYY-MM-DD
    #[serde(alias = "pickupDate")]
    pub pickup_date: Option<String>,
    /// YYYY-MM-DD
    #[serde(alias = "returnDate")]
    pub return_date: Option<String>,
    /// HH:MM
    #[serde(alias = "pickupTime")]
    pub pickup_time: Option<String>,
    /// HH:MM
    #[serde(alias = "returnTime")]
    pub return_time: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            full_name: r.full_name,
            mobile_number: r.mobile_number,
            pickup_date: r.pickup_date,
            return_date: r.return_date,
            pickup_time: r.pickup_time,
            return_time: r.return_time,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PriceQuoteDto {
    pub rental_days: f64,
    pub price_per_day: f64,
    pub subtotal: f64,
    pub gst_amount: f64,
    pub total_amount: f64,
}

impl From<PriceQuote> for PriceQuoteDto {
    fn from(q: PriceQuote) -> Self {
        Self {
            rental_days: q.rental_days,
            price_per_day: q.price_per_day,
            subtotal: q.subtotal,
            gst_amount: q.gst_amount,
            total_amount: q.total_amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RenterBookingDto {
    pub booking: BookingDto,
    pub listing: ListingDto,
    /// pending, approved, rejected or completed
    pub display_status: String,
    pub end_at: Option<NaiveDateTime>,
    pub pricing: Option<PriceQuoteDto>,
}

impl From<RenterBooking> for RenterBookingDto {
    fn from(r: RenterBooking) -> Self {
        Self {
            display_status: r.display_status.as_str().to_string(),
            end_at: r.end_at,
            pricing: r.pricing.map(Into::into),
            booking: r.booking.into(),
            listing: r.listing.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCountsDto {
    pub all: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
}

impl From<StatusCounts> for StatusCountsDto {
    fn from(c: StatusCounts) -> Self {
        Self {
            all: c.all,
            pending: c.pending,
            approved: c.approved,
            rejected: c.rejected,
            completed: c.completed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyBookingsResponse {
    pub bookings: Vec<RenterBookingDto>,
    pub selected_status: String,
    pub counts: StatusCountsDto,
}

impl From<MyBookings> for MyBookingsResponse {
    fn from(m: MyBookings) -> Self {
        Self {
            selected_status: m.selected.as_str().to_string(),
            bookings: m.bookings.into_iter().map(Into::into).collect(),
            counts: m.counts.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct MyBookingsQuery {
    /// all, pending, approved, rejected or completed; anything else means all
    pub status: Option<String>,
}

/// Daily rate as a number or as text such as "₹1,500"
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RateInput {
    Amount(f64),
    Text(String),
}

impl From<RateInput> for DailyRate {
    fn from(r: RateInput) -> Self {
        match r {
            RateInput::Amount(v) => DailyRate::Amount(v),
            RateInput::Text(s) => DailyRate::Text(s),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequestDto {
    pub price: RateInput,
    #[validate(length(min = 1, message = "pickup_date is required"))]
    pub pickup_date: String,
    pub pickup_time: Option<String>,
    #[validate(length(min = 1, message = "return_date is required"))]
    pub return_date: String,
    pub return_time: Option<String>,
}

impl From<QuoteRequestDto> for QuoteRequest {
    fn from(r: QuoteRequestDto) -> Self {
        Self {
            rate: r.price.into(),
            pickup_date: r.pickup_date,
            pickup_time: r.pickup_time,
            return_date: r.return_date,
            return_time: r.return_time,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_accepts_number_or_text() {
        let n: QuoteRequestDto = serde_json::from_str(
            r#"{"price": 1500, "pickup_date": "2024-01-01", "return_date": "2024-01-02"}"#,
        )
        .unwrap();
        assert_eq!(DailyRate::from(n.price), DailyRate::Amount(1500.0));

        let t: QuoteRequestDto = serde_json::from_str(
            r#"{"price": "₹1,500", "pickup_date": "2024-01-01", "return_date": "2024-01-02"}"#,
        )
        .unwrap();
        assert_eq!(DailyRate::from(t.price), DailyRate::Text("₹1,500".into()));
    }

    #[test]
    fn booking_form_tolerates_missing_fields() {
        let r: CreateBookingRequest = serde_json::from_str(r#"{"full_name": "Asha"}"#).unwrap();
        let request = BookingRequest::from(r);
        assert_eq!(request.full_name.as_deref(), Some("Asha"));
        assert!(request.pickup_date.is_none());
    }

    #[test]
    fn booking_form_accepts_camel_case_names() {
        let r: CreateBookingRequest = serde_json::from_str(
            r#"{"fullName": "Asha Rao", "mobileNumber": "9876543210",
                "pickupDate": "2024-03-15", "returnDate": "2024-03-16",
                "pickupTime": "10:00", "returnTime": "18:30"}"#,
        )
        .unwrap();
        let request = BookingRequest::from(r);
        assert_eq!(request.full_name.as_deref(), Some("Asha Rao"));
        assert_eq!(request.mobile_number.as_deref(), Some("9876543210"));
        assert_eq!(request.pickup_date.as_deref(), Some("2024-03-15"));
        assert_eq!(request.return_date.as_deref(), Some("2024-03-16"));
        assert_eq!(request.pickup_time.as_deref(), Some("10:00"));
        assert_eq!(request.return_time.as_deref(), Some("18:30"));
    }
}
