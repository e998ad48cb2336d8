//! Owner-driven status transitions.
//!
//! `pending` may move once to `approved` or `rejected`; both are terminal.
//! Re-submitting the current status is a no-op. An approved booking refuses
//! any other target outright; otherwise a request for `pending` is refused
//! as such.

use super::model::BookingStatus;
use crate::domain::{DomainError, DomainResult};

pub const MSG_INVALID_STATUS: &str =
    "Invalid status value. Must be one of: pending, approved, rejected";
pub const MSG_ALREADY_DECIDED: &str = "You can update status only one time.";
pub const MSG_BACK_TO_PENDING: &str =
    "Setting status back to pending is not allowed. Choose Approved or Rejected.";
pub const MSG_STATUS_UNCHANGED: &str = "Status unchanged.";

/// Outcome of a status update request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Nothing to write
    Unchanged(BookingStatus),
    Applied {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Decide what a requested status does to a booking currently in `current`.
pub fn plan_status_change(current: BookingStatus, requested: &str) -> DomainResult<StatusChange> {
    let target = BookingStatus::parse(requested)
        .ok_or_else(|| DomainError::Validation(MSG_INVALID_STATUS.into()))?;

    if current == BookingStatus::Approved && target != current {
        return Err(DomainError::PolicyViolation(MSG_ALREADY_DECIDED.into()));
    }
    if target == BookingStatus::Pending {
        return Err(DomainError::PolicyViolation(MSG_BACK_TO_PENDING.into()));
    }
    if target == current {
        return Ok(StatusChange::Unchanged(current));
    }
    // rejected -> approved
    if current != BookingStatus::Pending {
        return Err(DomainError::PolicyViolation(MSG_ALREADY_DECIDED.into()));
    }
    Ok(StatusChange::Applied {
        from: current,
        to: target,
    })
}

// ── Tests ──────────────────────────────────────────────────────
