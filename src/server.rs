//! Server runtime.
//!
//! [`ServerHandle`] owns the whole process lifecycle: storage, services,
//! the HTTP API, the metrics recorder and graceful shutdown. The binary is a
//! thin wrapper around it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::application::{
    BookingService, DashboardService, DisabledGeocoder, ListingService, SharedGeocoder,
    UserService,
};
use crate::config::{AppConfig, StorageDriver};
use crate::domain::RepositoryProvider;
use crate::infrastructure::{
    init_database, run_migrations, InMemoryRepositoryProvider, NominatimGeocoder,
    SeaOrmRepositoryProvider, ShutdownCoordinator, ShutdownSignal,
};
use crate::interfaces::http::modules::health::HealthState;
use crate::interfaces::http::{create_api_router, ApiServices};
use crate::shared::{InfraError, SharedClock, SystemClock};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Apply pending migrations on startup (default: true)
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running CarCruise service.
///
/// ```rust,no_run
/// use carcruise::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with
    pub config: AppConfig,
    /// Address the API is actually bound to
    pub local_addr: SocketAddr,

    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

/// The global recorder can only be installed once per process, so a second
/// `start` in the same process reuses the first handle.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    PROM_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("Failed to install Prometheus metrics recorder");
            info!("📊 Prometheus metrics recorder installed");
            handle
        })
        .clone()
}

impl ServerHandle {
    /// Open storage, wire the services and start serving the API.
    pub async fn start(opts: ServerOptions) -> Result<Self, InfraError> {
        let config = opts.config;
        info!(version = env!("CARGO_PKG_VERSION"), "Starting CarCruise service");

        let metrics_handle = prometheus_handle();

        if config.security.uses_default_secret() {
            warn!("security.jwt_secret is the built-in default; set a real secret before exposing the API");
        }
        let jwt_config = config.security.jwt();
        info!(
            expiration_hours = jwt_config.expiration_hours,
            "JWT configured"
        );

        // ── Storage ────────────────────────────────────────────
        let (repos, db): (Arc<dyn RepositoryProvider>, Option<DatabaseConnection>) =
            match config.database.driver {
                StorageDriver::Sqlite => {
                    let db = init_database(&config.database.connection()).await?;
                    if opts.auto_migrate {
                        run_migrations(&db).await?;
                    }
                    (Arc::new(SeaOrmRepositoryProvider::new(db.clone())), Some(db))
                }
                StorageDriver::Memory => {
                    warn!("Using in-memory storage; data is lost on exit");
                    (Arc::new(InMemoryRepositoryProvider::new()), None)
                }
            };

        // ── Services ───────────────────────────────────────────
        let geocoder: SharedGeocoder = if config.geocoding.enabled {
            info!(base_url = %config.geocoding.base_url, "Geocoding enabled");
            Arc::new(NominatimGeocoder::new(config.geocoding.nominatim())?)
        } else {
            info!("Geocoding disabled");
            Arc::new(DisabledGeocoder)
        };
        let clock: SharedClock = Arc::new(SystemClock);

        let services = ApiServices {
            users: Arc::new(UserService::new(
                repos.clone(),
                jwt_config.clone(),
                config.security.bcrypt_cost,
            )),
            listings: Arc::new(ListingService::new(repos.clone(), geocoder, clock.clone())),
            bookings: Arc::new(BookingService::new(repos.clone(), clock.clone())),
            dashboard: Arc::new(DashboardService::new(repos.clone(), clock)),
        };

        let health_state = HealthState {
            db: db.clone(),
            started_at: Arc::new(Instant::now()),
        };
        let router = create_api_router(services, jwt_config, health_state, metrics_handle);

        // ── HTTP server ────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                api_shutdown.notified().await;
                info!("🛑 REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!(error = %e, "REST API server error");
            }
        });

        info!("🚀 CarCruise service started");

        Ok(Self {
            repos,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM or SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Non-blocking; pair with [`ServerHandle::wait`].
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Block until shutdown is triggered (or the API stops on its own), let
    /// in-flight requests drain within the configured timeout, then close
    /// storage.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            mut api_task,
            ..
        } = self;
        let signal = shutdown.signal();

        let stopped_early = tokio::select! {
            _ = signal.notified() => None,
            result = &mut api_task => Some(result),
        };

        match stopped_early {
            Some(result) => {
                if let Err(e) = result {
                    error!(error = %e, "REST API task panicked");
                }
                warn!("REST API stopped before shutdown was requested");
                signal.trigger();
            }
            None => {
                let drained = shutdown
                    .shutdown_with_cleanup(async {
                        if let Err(e) = (&mut api_task).await {
                            error!(error = %e, "REST API task panicked");
                        }
                    })
                    .await;
                if !drained {
                    api_task.abort();
                }
            }
        }

        if let Some(db) = db {
            match db.close().await {
                Ok(()) => info!("✅ Database connection closed"),
                Err(e) => warn!(error = %e, "Error closing database connection"),
            }
        }

        info!("👋 CarCruise service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down CarCruise service");
        self.trigger_shutdown();
        self.wait().await;
    }
}

// ── Tracing ────────────────────────────────────────────────────────

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn memory_options() -> ServerOptions {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.driver = StorageDriver::Memory;
        config.geocoding.enabled = false;
        config.security.bcrypt_cost = 4;
        ServerOptions {
            config,
            auto_migrate: false,
        }
    }

    #[tokio::test]
    async fn memory_server_serves_health_and_shuts_down() {
        let handle = ServerHandle::start(memory_options()).await.unwrap();
        assert!(handle.is_running());

        let url = format!("http://{}/health", handle.local_addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert!(resp.status().is_success());
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["storage"]["status"], "memory");

        tokio::time::timeout(Duration::from_secs(10), handle.shutdown())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sqlite_memory_database_is_migrated_on_start() {
        let mut opts = memory_options();
        opts.config.database.driver = StorageDriver::Sqlite;
        opts.config.database.url = "sqlite::memory:".into();
        opts.auto_migrate = true;

        let handle = ServerHandle::start(opts).await.unwrap();
        assert!(handle.repos.users().find_by_username("nobody").await.unwrap().is_none());

        tokio::time::timeout(Duration::from_secs(10), handle.shutdown())
            .await
            .unwrap();
    }
}
