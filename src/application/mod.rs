pub mod identity;
pub mod ports;
pub mod services;

// Re-export key types for convenience
pub use identity::{AuthResult, UserService};
pub use ports::{DisabledGeocoder, Geocoder, SharedGeocoder};
pub use services::{BookingService, DashboardService, ListingService};
