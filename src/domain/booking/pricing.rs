//! Rental pricing
//!
//! Bills in half-day steps: any positive duration up to 12 hours is half a
//! day, up to 24 hours a full day, and so on, always rounding up. When the
//! time-of-day fields cannot produce a positive duration the quote falls back
//! to whole calendar days, minimum one.

use serde::Serialize;
use thiserror::Error;

use super::window::RentalWindow;

/// GST applied on top of the subtotal
pub const GST_RATE: f64 = 0.18;

const HOURS_PER_HALF_DAY: f64 = 12.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Per-day rate as stored or as typed by a user.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyRate {
    Amount(f64),
    /// Free text such as "₹1,500"; everything except digits and '.' is dropped.
    Text(String),
}

impl DailyRate {
    /// The rate as a finite number, or `None` if it does not parse.
    ///
    /// Text that is empty after stripping counts as 0.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            Self::Amount(v) => *v,
            Self::Text(raw) => {
                let cleaned: String = raw
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                if cleaned.is_empty() {
                    0.0
                } else {
                    cleaned.parse::<f64>().ok()?
                }
            }
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for DailyRate {
    fn from(v: f64) -> Self {
        Self::Amount(v)
    }
}

impl From<&str> for DailyRate {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Why a booking could not be priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingSkip {
    #[error("non-numeric price")]
    NonNumericPrice,
    #[error("invalid base amount")]
    InvalidSubtotal,
    #[error("invalid total amount")]
    InvalidTotal,
}

/// Cost breakdown for one booking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub rental_days: f64,
    pub price_per_day: f64,
    pub subtotal: f64,
    pub gst_amount: f64,
    pub total_amount: f64,
}

/// Billable days for a window, in half-day steps.
pub fn rental_days(window: &RentalWindow<'_>) -> f64 {
    if let (Some(start), Some(end)) = (window.start(), window.end()) {
        let ms = (end - start).num_milliseconds();
        if ms > 0 {
            let hours = ms as f64 / MS_PER_HOUR;
            let half_day_units = (hours / HOURS_PER_HALF_DAY).ceil();
            return (half_day_units * 0.5).max(0.5);
        }
    }
    let days = (window.return_date - window.pickup_date).num_days();
    days.max(1) as f64
}

/// Price a window at `rate`.
pub fn quote(rate: &DailyRate, window: &RentalWindow<'_>) -> Result<PriceQuote, PricingSkip> {
    let price_per_day = rate.parse().ok_or(PricingSkip::NonNumericPrice)?;
    let rental_days = rental_days(window);

    let subtotal = price_per_day * rental_days;
    if !subtotal.is_finite() {
        return Err(PricingSkip::InvalidSubtotal);
    }
    let gst_amount = round_half_up(subtotal * GST_RATE);
    let total_amount = subtotal + gst_amount;
    if !total_amount.is_finite() {
        return Err(PricingSkip::InvalidTotal);
    }

    Ok(PriceQuote {
        rental_days,
        price_per_day,
        subtotal,
        gst_amount,
        total_amount,
    })
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

// ── Tests ──────────────────────────────────────────────────────
