//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod geocoding;
pub mod server;
pub mod storage;

pub use database::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};
pub use geocoding::{NominatimConfig, NominatimGeocoder};
pub use server::{ShutdownCoordinator, ShutdownSignal};
pub use storage::InMemoryRepositoryProvider;
