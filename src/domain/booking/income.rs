//! Owner income
//!
//! Sums the priced totals of an owner's approved bookings. Bookings that
//! cannot be priced contribute nothing and are reported back to the caller.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::model::{BookingStatus, BookingWithListing};
use super::pricing::{quote, DailyRate, PricingSkip};

/// A booking left out of the income total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBooking {
    pub booking_id: String,
    pub reason: PricingSkip,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeSummary {
    /// Rounded to two decimal places
    pub total_income: Decimal,
    /// Approved bookings that were priced
    pub counted: usize,
    pub skipped: Vec<SkippedBooking>,
}

impl IncomeSummary {
    /// Total formatted with exactly two decimals, e.g. "1770.00".
    pub fn display_total(&self) -> String {
        format!("{:.2}", self.total_income)
    }
}

/// Aggregate income over `bookings`. Only approved bookings whose listing
/// still exists and carries a price are considered.
pub fn aggregate_income<'a, I>(bookings: I) -> IncomeSummary
where
    I: IntoIterator<Item = &'a BookingWithListing>,
{
    let mut running = 0.0_f64;
    let mut summary = IncomeSummary::default();

    for entry in bookings {
        if entry.booking.status != BookingStatus::Approved {
            continue;
        }
        let Some(price) = entry.listing.as_ref().and_then(|l| l.price) else {
            continue;
        };

        match quote(&DailyRate::Amount(price), &entry.booking.window()) {
            Ok(q) => {
                running += q.total_amount;
                summary.counted += 1;
            }
            Err(reason) => summary.skipped.push(SkippedBooking {
                booking_id: entry.booking.id.clone(),
                reason,
            }),
        }
    }

    summary.total_income = to_money(running);
    summary
}

fn to_money(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// ── Tests ──────────────────────────────────────────────────────
