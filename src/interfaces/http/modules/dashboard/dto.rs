//! Dashboard DTOs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::{OwnerBooking, OwnerDashboard, StatusUpdate};
use crate::domain::booking::{PricingSkip, SkippedBooking};
use crate::interfaces::http::modules::bookings::BookingDto;
use crate::interfaces::http::modules::listings::ListingDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerBookingDto {
    pub booking: BookingDto,
    pub listing: ListingDto,
    pub is_approved_locked: bool,
    pub end_at: Option<NaiveDateTime>,
}

impl From<OwnerBooking> for OwnerBookingDto {
    fn from(b: OwnerBooking) -> Self {
        Self {
            booking: b.booking.into(),
            listing: b.listing.into(),
            is_approved_locked: b.is_approved_locked,
            end_at: b.end_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SkippedBookingDto {
    pub booking_id: String,
    /// non_numeric_price, invalid_subtotal or invalid_total
    pub reason: String,
}

impl From<SkippedBooking> for SkippedBookingDto {
    fn from(s: SkippedBooking) -> Self {
        let reason = match s.reason {
            PricingSkip::NonNumericPrice => "non_numeric_price",
            PricingSkip::InvalidSubtotal => "invalid_subtotal",
            PricingSkip::InvalidTotal => "invalid_total",
        };
        Self {
            booking_id: s.booking_id,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub listings: Vec<ListingDto>,
    pub booking_requests: Vec<OwnerBookingDto>,
    pub total_bookings: usize,
    pub approved_bookings: usize,
    /// Two decimals, e.g. "1770.00"
    pub total_income: String,
    pub income_skipped: Vec<SkippedBookingDto>,
}

impl From<OwnerDashboard> for DashboardResponse {
    fn from(d: OwnerDashboard) -> Self {
        Self {
            total_income: d.income.display_total(),
            income_skipped: d.income.skipped.into_iter().map(Into::into).collect(),
            listings: d.listings.into_iter().map(Into::into).collect(),
            booking_requests: d.booking_requests.into_iter().map(Into::into).collect(),
            total_bookings: d.total_bookings,
            approved_bookings: d.approved_bookings,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[serde(alias = "bookingId", default)]
    pub booking_id: String,
    /// approved or rejected
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateStatusResponse {
    pub booking_id: String,
    pub new_status: String,
    pub changed: bool,
    pub message: String,
}

impl From<StatusUpdate> for UpdateStatusResponse {
    fn from(u: StatusUpdate) -> Self {
        Self {
            booking_id: u.booking_id,
            new_status: u.new_status.as_str().to_string(),
            changed: u.changed,
            message: u.message.to_string(),
        }
    }
}
