//! # CarCruise
//!
//! Car rental booking service: listings with reviews, renter booking
//! requests with pricing, and an owner dashboard that approves requests and
//! totals income.
//!
//! ## Architecture
//!
//! - **domain**: entities, booking rules (windows, pricing, status changes)
//!   and repository ports
//! - **application**: use-case services and outbound ports (geocoding)
//! - **infrastructure**: SeaORM and in-memory storage, crypto, Nominatim,
//!   shutdown handling
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: process lifecycle shared by the binary and tests

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::create_api_router;
pub use server::{ServerHandle, ServerOptions};
