//! Configuration module for chanboard.

use serde::Deserialize;
use std::path::Path;

use crate::{ChanError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limit for the admin login endpoint (requests per minute).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
    /// Rate limit for general API endpoints (requests per minute).
    #[serde(default = "default_api_rate_limit")]
    pub api_rate_limit: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_login_rate_limit() -> u32 {
    5
}

fn default_api_rate_limit() -> u32 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            login_rate_limit: default_login_rate_limit(),
            api_rate_limit: default_api_rate_limit(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/chanboard.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/chanboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Site information.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Name of the site, used until overridden in the settings table.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Poster name used when the name field is left empty.
    #[serde(default = "default_poster_name")]
    pub default_name: String,
}

fn default_site_name() -> String {
    "chanboard".to_string()
}

fn default_poster_name() -> String {
    "Anonymous".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            default_name: default_poster_name(),
        }
    }
}

/// Posting rules.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Maximum message length in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Minimum seconds between two posts from the same IP.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Threads shown per board index page.
    #[serde(default = "default_threads_per_page")]
    pub threads_per_page: u32,
    /// Replies previewed under each thread on the index page.
    #[serde(default = "default_preview_replies")]
    pub preview_replies: u32,
    /// Live threads kept per board before the oldest are pruned.
    #[serde(default = "default_max_threads_per_board")]
    pub max_threads_per_board: u32,
    /// Replies after which a thread no longer bumps.
    #[serde(default = "default_bump_limit")]
    pub bump_limit: u32,
}

fn default_max_message_length() -> usize {
    4000
}

fn default_cooldown_secs() -> u64 {
    30
}

fn default_threads_per_page() -> u32 {
    10
}

fn default_preview_replies() -> u32 {
    3
}

fn default_max_threads_per_board() -> u32 {
    150
}

fn default_bump_limit() -> u32 {
    300
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            max_message_length: default_max_message_length(),
            cooldown_secs: default_cooldown_secs(),
            threads_per_page: default_threads_per_page(),
            preview_replies: default_preview_replies(),
            max_threads_per_board: default_max_threads_per_board(),
            bump_limit: default_bump_limit(),
        }
    }
}

/// Admin panel configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Lifetime of an admin session in hours.
    #[serde(default = "default_session_duration")]
    pub session_duration_hours: u64,
    /// Username of the admin account created on first start.
    #[serde(default = "default_bootstrap_username")]
    pub bootstrap_username: String,
    /// Password of the admin account created on first start.
    ///
    /// When empty, no account is created.
    #[serde(default)]
    pub bootstrap_password: String,
}

fn default_session_duration() -> u64 {
    12
}

fn default_bootstrap_username() -> String {
    "admin".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            session_duration_hours: default_session_duration(),
            bootstrap_username: default_bootstrap_username(),
            bootstrap_password: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Posting rules.
    #[serde(default)]
    pub posting: PostingConfig,
    /// Admin panel configuration.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ChanError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ChanError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CHANBOARD_ADMIN_PASSWORD`: password for the bootstrap admin account
    /// - `CHANBOARD_DATABASE`: database file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var("CHANBOARD_ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.admin.bootstrap_password = password;
            }
        }
        if let Ok(path) = std::env::var("CHANBOARD_DATABASE") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.posting.threads_per_page == 0 {
            return Err(ChanError::Config(
                "posting.threads_per_page must be at least 1".to_string(),
            ));
        }
        if self.posting.max_message_length == 0 {
            return Err(ChanError::Config(
                "posting.max_message_length must be at least 1".to_string(),
            ));
        }
        if self.admin.session_duration_hours == 0 {
            return Err(ChanError::Config(
                "admin.session_duration_hours must be at least 1".to_string(),
            ));
        }
        if self.posting.max_threads_per_board > 0
            && self.posting.max_threads_per_board < self.posting.threads_per_page
        {
            return Err(ChanError::Config(
                "posting.max_threads_per_board must not be smaller than threads_per_page"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.server.login_rate_limit, 5);
        assert_eq!(config.server.api_rate_limit, 120);

        assert_eq!(config.database.path, "data/chanboard.db");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/chanboard.log");

        assert_eq!(config.site.name, "chanboard");
        assert_eq!(config.site.default_name, "Anonymous");

        assert_eq!(config.posting.max_message_length, 4000);
        assert_eq!(config.posting.cooldown_secs, 30);
        assert_eq!(config.posting.threads_per_page, 10);
        assert_eq!(config.posting.preview_replies, 3);
        assert_eq!(config.posting.max_threads_per_board, 150);
        assert_eq!(config.posting.bump_limit, 300);

        assert_eq!(config.admin.session_duration_hours, 12);
        assert_eq!(config.admin.bootstrap_username, "admin");
        assert!(config.admin.bootstrap_password.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:5173"]
login_rate_limit = 10
api_rate_limit = 600

[database]
path = "custom/board.db"

[logging]
level = "debug"
file = "custom/logs/app.log"

[site]
name = "My Chan"
default_name = "Nameless"

[posting]
max_message_length = 2000
cooldown_secs = 10
threads_per_page = 15
preview_replies = 5
max_threads_per_board = 100
bump_limit = 250

[admin]
session_duration_hours = 24
bootstrap_username = "root"
bootstrap_password = "changeme123"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.server.login_rate_limit, 10);
        assert_eq!(config.server.api_rate_limit, 600);

        assert_eq!(config.database.path, "custom/board.db");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");

        assert_eq!(config.site.name, "My Chan");
        assert_eq!(config.site.default_name, "Nameless");

        assert_eq!(config.posting.max_message_length, 2000);
        assert_eq!(config.posting.cooldown_secs, 10);
        assert_eq!(config.posting.threads_per_page, 15);
        assert_eq!(config.posting.preview_replies, 5);
        assert_eq!(config.posting.max_threads_per_board, 100);
        assert_eq!(config.posting.bump_limit, 250);

        assert_eq!(config.admin.session_duration_hours, 24);
        assert_eq!(config.admin.bootstrap_username, "root");
        assert_eq!(config.admin.bootstrap_password, "changeme123");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000

[posting]
cooldown_secs = 0
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.posting.cooldown_secs, 0);

        // Defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.posting.threads_per_page, 10);
        assert_eq!(config.database.path, "data/chanboard.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.name, "chanboard");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        match result {
            Err(ChanError::Config(msg)) => assert!(msg.contains("config parse error")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(ChanError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[site]\nname = \"File Chan\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.site.name, "File Chan");
    }

    #[test]
    fn test_apply_env_overrides_admin_password() {
        let original = std::env::var("CHANBOARD_ADMIN_PASSWORD").ok();

        std::env::set_var("CHANBOARD_ADMIN_PASSWORD", "env-password");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.admin.bootstrap_password, "env-password");

        std::env::set_var("CHANBOARD_ADMIN_PASSWORD", "");
        let mut config = Config::default();
        config.admin.bootstrap_password = "from-file".to_string();
        config.apply_env_overrides();
        assert_eq!(config.admin.bootstrap_password, "from-file");

        match original {
            Some(val) => std::env::set_var("CHANBOARD_ADMIN_PASSWORD", val),
            None => std::env::remove_var("CHANBOARD_ADMIN_PASSWORD"),
        }
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_threads_per_page() {
        let mut config = Config::default();
        config.posting.threads_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_session_duration() {
        let mut config = Config::default();
        config.admin.session_duration_hours = 0;
        assert!(config.validate().is_err());
    }
}
