//! CarCruise booking service
//!
//! Reads configuration from a TOML file (default
//! `~/.config/carcruise/config.toml`) and serves the REST API until SIGTERM
//! or Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use carcruise::config::{default_config_path, AppConfig, CONFIG_ENV_VAR};
use carcruise::server::{init_tracing, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(name = "carcruise-service", version, about = "CarCruise car rental booking service")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Override the API listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Configuration ──────────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut config = match AppConfig::load(&config_path) {
        Ok(mut cfg) => {
            if let Some(level) = &cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            if cli.check {
                eprintln!("Configuration error: {e}");
                std::process::exit(1);
            }
            let mut cfg = AppConfig::default();
            if let Some(level) = &cli.log_level {
                cfg.logging.level = level.clone();
            }
            init_tracing(&cfg);
            error!("Failed to load config: {}. Using defaults.", e);
            cfg
        }
    };

    if let Some(port) = cli.port {
        info!("CLI override: server.port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        config.validate()?;
        println!("Configuration OK: {}", config_path.display());
        println!("  listen     = {}", config.server.address());
        println!("  storage    = {:?}", config.database.driver);
        println!("  database   = {}", config.database.url);
        println!("  geocoding  = {}", if config.geocoding.enabled { "nominatim" } else { "disabled" });
        println!("  log level  = {} ({})", config.logging.level, config.logging.format);
        return Ok(());
    }

    // ── Run ────────────────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully");
    handle.wait().await;

    Ok(())
}
