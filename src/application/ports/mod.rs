//! Application ports (hexagonal architecture boundaries)
//!
//! Outbound services the application layer calls but does not implement.

pub mod geocoding;

pub use geocoding::{DisabledGeocoder, Geocoder, SharedGeocoder};
