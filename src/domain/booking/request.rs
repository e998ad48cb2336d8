//! Booking request validation

use chrono::{DateTime, NaiveDate};

use super::model::BookingDetails;
use crate::domain::{DomainError, DomainResult};

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required.";
pub const MSG_PICKUP_IN_PAST: &str = "Pickup date cannot be in the past.";
pub const MSG_RETURN_NOT_AFTER_PICKUP: &str = "Return date must be after pickup date.";
pub const MSG_INVALID_DATE: &str = "Invalid date. Use the YYYY-MM-DD format.";

/// Raw renter input for a new booking, before any checks.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub pickup_date: Option<String>,
    pub return_date: Option<String>,
    pub pickup_time: Option<String>,
    pub return_time: Option<String>,
}

impl BookingRequest {
    /// Presence check, then date checks against `today`.
    ///
    /// Times are only checked for presence and stored as given.
    pub fn validate(self, today: NaiveDate) -> DomainResult<BookingDetails> {
        let (
            Some(full_name),
            Some(mobile_number),
            Some(pickup_date),
            Some(return_date),
            Some(pickup_time),
            Some(return_time),
        ) = (
            present(self.full_name),
            present(self.mobile_number),
            present(self.pickup_date),
            present(self.return_date),
            present(self.pickup_time),
            present(self.return_time),
        )
        else {
            return Err(DomainError::Validation(MSG_FIELDS_REQUIRED.into()));
        };

        let pickup_date = parse_date(&pickup_date)?;
        let return_date = parse_date(&return_date)?;

        if pickup_date < today {
            return Err(DomainError::Validation(MSG_PICKUP_IN_PAST.into()));
        }
        if return_date <= pickup_date {
            return Err(DomainError::Validation(MSG_RETURN_NOT_AFTER_PICKUP.into()));
        }

        Ok(BookingDetails {
            full_name,
            mobile_number,
            pickup_date,
            return_date,
            pickup_time,
            return_time,
        })
    }
}

fn present(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| DomainError::Validation(MSG_INVALID_DATE.into()))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::model::tests::date;

    fn request(pickup: &str, ret: &str) -> BookingRequest {
        BookingRequest {
            full_name: Some("Asha Rao".into()),
            mobile_number: Some("9876543210".into()),
            pickup_date: Some(pickup.into()),
            return_date: Some(ret.into()),
            pickup_time: Some("09:00".into()),
            return_time: Some("18:00".into()),
        }
    }

    fn validation_message(result: DomainResult<BookingDetails>) -> String {
        match result {
            Err(DomainError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_request_produces_details() {
        let details = request("2024-03-01", "2024-03-03")
            .validate(date("2024-03-01"))
            .unwrap();
        assert_eq!(details.pickup_date, date("2024-03-01"));
        assert_eq!(details.return_date, date("2024-03-03"));
        assert_eq!(details.pickup_time, "09:00");
    }

    #[test]
    fn missing_or_blank_field_is_rejected() {
        let mut r = request("2024-03-01", "2024-03-03");
        r.mobile_number = None;
        assert_eq!(validation_message(r.validate(date("2024-03-01"))), MSG_FIELDS_REQUIRED);

        let mut r = request("2024-03-01", "2024-03-03");
        r.return_time = Some("   ".into());
        assert_eq!(validation_message(r.validate(date("2024-03-01"))), MSG_FIELDS_REQUIRED);
    }

    #[test]
    fn pickup_before_today_is_rejected() {
        let r = request("2024-02-29", "2024-03-03");
        assert_eq!(validation_message(r.validate(date("2024-03-01"))), MSG_PICKUP_IN_PAST);
    }

    #[test]
    fn same_day_return_is_rejected() {
        let r = request("2024-03-01", "2024-03-01");
        assert_eq!(
            validation_message(r.validate(date("2024-03-01"))),
            MSG_RETURN_NOT_AFTER_PICKUP
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let r = request("01/03/2024", "2024-03-03");
        assert_eq!(validation_message(r.validate(date("2024-03-01"))), MSG_INVALID_DATE);
    }

    #[test]
    fn rfc3339_dates_use_their_date_part() {
        assert_eq!(
            parse_date("2024-03-01T00:00:00Z").unwrap(),
            date("2024-03-01")
        );
    }
}
