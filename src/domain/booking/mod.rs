//! Booking aggregate
//!
//! The booking entity plus the rules around it: rental window resolution,
//! pricing, eligibility for new requests, owner status transitions and
//! income aggregation.

pub mod eligibility;
pub mod income;
pub mod model;
pub mod pricing;
pub mod repository;
pub mod request;
pub mod status;
pub mod window;

pub use eligibility::{ensure_not_own_listing, BookingEligibility};
pub use income::{aggregate_income, IncomeSummary, SkippedBooking};
pub use model::{Booking, BookingDetails, BookingStatus, BookingWithListing, DisplayStatus};
pub use pricing::{quote, rental_days, DailyRate, PriceQuote, PricingSkip, GST_RATE};
pub use repository::BookingRepository;
pub use request::BookingRequest;
pub use status::{plan_status_change, StatusChange};
pub use window::{resolve_instant, RentalWindow, WindowEdge};
