//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::moderation::BanRepository;
use crate::{ChanError, Config, Database, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Interval between background cleanup runs.
const CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Web server for the API.
pub struct WebServer {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server bound to `server.host:server.port`.
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| ChanError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            state: Arc::new(AppState::new(db, config)),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the hourly cleanup task.
    ///
    /// Removes expired sessions, marks elapsed bans inactive and drops
    /// idle rate limiter entries.
    fn start_cleanup_task(state: Arc<AppState>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                match state.sessions().cleanup_expired().await {
                    Ok(0) => tracing::debug!("No expired sessions to clean up"),
                    Ok(count) => tracing::info!(deleted_count = count, "Cleaned up expired sessions"),
                    Err(e) => tracing::warn!(error = %e, "Failed to clean up sessions"),
                }

                match BanRepository::new(state.db.pool()).expire_stale().await {
                    Ok(0) => tracing::debug!("No stale bans"),
                    Ok(count) => tracing::info!(expired_count = count, "Expired stale bans"),
                    Err(e) => tracing::warn!(error = %e, "Failed to expire bans"),
                }

                state.rate_limits.cleanup();
            }
        });
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router)> {
        let router = create_router(self.state.clone()).layer(CompressionLayer::new());
        let listener = TcpListener::bind(self.addr).await?;

        Self::start_cleanup_task(self.state);
        tracing::info!("Cleanup task started (runs every hour)");

        Ok((listener, router))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful in tests when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let db = Database::open_in_memory().await.unwrap();
        let server = WebServer::new(test_config(), db).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let db = Database::open_in_memory().await.unwrap();
        let mut config = test_config();
        config.server.host = "not a host".to_string();
        assert!(matches!(
            WebServer::new(config, db),
            Err(ChanError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let db = Database::open_in_memory().await.unwrap();
        let server = WebServer::new(test_config(), db).unwrap();
        let addr = server.run_with_addr().await.unwrap();

        let stream = tokio::net::TcpStream::connect(addr).await;
        assert!(stream.is_ok());
    }
}
