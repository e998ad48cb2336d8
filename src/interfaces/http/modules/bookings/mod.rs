//! Bookings module: booking requests, renter history, cancellation, quotes

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
