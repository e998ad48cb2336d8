//! Rental window resolution.
//!
//! Turns a calendar date plus an optional "HH:MM" string into a concrete
//! local instant. Each component is read as its leading integer; an empty or
//! missing component counts as 0, a component without digits makes the
//! instant indeterminate (`None`). Out-of-range values roll over into the
//! neighbouring day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Which side of the rental window a date/time pair describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdge {
    /// Pickup. Defaults to 00:00:00.000 when no time is given.
    Start,
    /// Return. Defaults to 23:59:59.999 when no time is given.
    End,
}

/// Resolve `date` + `time` into an instant.
pub fn resolve_instant(
    date: NaiveDate,
    time: Option<&str>,
    edge: WindowEdge,
) -> Option<NaiveDateTime> {
    match time.filter(|t| !t.is_empty()) {
        Some(t) => {
            let (hours, minutes) = parse_time_of_day(t)?;
            date.and_time(NaiveTime::MIN)
                .checked_add_signed(TimeDelta::try_hours(hours)?)?
                .checked_add_signed(TimeDelta::try_minutes(minutes)?)
        }
        None => match edge {
            WindowEdge::Start => Some(date.and_time(NaiveTime::MIN)),
            WindowEdge::End => date.and_hms_milli_opt(23, 59, 59, 999),
        },
    }
}

/// Split "HH:MM" into hour and minute counts. Seconds, if any, are ignored.
pub fn parse_time_of_day(s: &str) -> Option<(i64, i64)> {
    let mut parts = s.split(':');
    let hours = parse_component(parts.next().unwrap_or(""))?;
    let minutes = parse_component(parts.next().unwrap_or(""))?;
    Some((hours, minutes))
}

fn parse_component(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return Some(0);
    }
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Pickup/return dates and times of one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalWindow<'a> {
    pub pickup_date: NaiveDate,
    pub pickup_time: Option<&'a str>,
    pub return_date: NaiveDate,
    pub return_time: Option<&'a str>,
}

impl RentalWindow<'_> {
    pub fn start(&self) -> Option<NaiveDateTime> {
        resolve_instant(self.pickup_date, self.pickup_time, WindowEdge::Start)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        resolve_instant(self.return_date, self.return_time, WindowEdge::End)
    }

    /// True only when the end is known and `now` is at or past it.
    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        matches!(self.end(), Some(end) if now >= end)
    }
}

// ── Tests ──────────────────────────────────────────────────────
