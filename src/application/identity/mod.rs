//! Identity module: user accounts and authentication
//!
//! Contains the `UserService` which handles signup, login and profile
//! lookup.

pub mod service;

pub use service::{AuthResult, UserService};
