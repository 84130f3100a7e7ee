use std::process::ExitCode;

use tracing::{error, info};

use chanboard::admin::ensure_bootstrap_admin;
use chanboard::web::WebServer;
use chanboard::{Config, Database};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = chanboard::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        chanboard::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    info!("chanboard {}", env!("CARGO_PKG_VERSION"));

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, path = %config.database.path, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = ensure_bootstrap_admin(
        &db,
        &config.admin.bootstrap_username,
        &config.admin.bootstrap_password,
    )
    .await
    {
        error!(error = %e, "Failed to create bootstrap administrator");
        return ExitCode::FAILURE;
    }

    let server = match WebServer::new(config, db) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Failed to configure web server");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!(error = %e, "Web server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
