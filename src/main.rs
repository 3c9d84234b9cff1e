//! Metering point service
//!
//! ```sh
//! # Run with default config (~/.config/metering-point/config.toml)
//! metering-point-service
//!
//! # Custom config path and port
//! metering-point-service --config /etc/metering-point/config.toml --port 8081
//!
//! # Validate config without starting
//! metering-point-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use metering_point::config::{default_config_path, AppConfig, CONFIG_ENV};
use metering_point::server::{init_tracing, ServerHandle, ServerOptions};

/// Registry of electricity metering points.
#[derive(Parser, Debug)]
#[command(
    name = "metering-point-service",
    version,
    about = "Metering point registry with a market-process REST API",
    long_about = "Registers metering points and runs their business processes \
                  (create, connect, disconnect, reconnect, close down, master data \
                  and energy supplier changes).\n\n\
                  Default config: ~/.config/metering-point/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.check {
        return match load_error {
            None => {
                println!("✅ Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.server.address());
                println!("   Database    : {}", config.database.url);
                println!("   Log level   : {} ({})", config.logging.level, config.logging.format);
                println!("   Event bus   : {} messages", config.events.capacity);
                Ok(())
            }
            Some(e) => {
                eprintln!("❌ {}", e);
                Err(e.into())
            }
        };
    }

    init_tracing(&config.logging);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config: {}", e);
            error!("Using default configuration.");
        }
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
