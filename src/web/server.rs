//! Web server for COBBS.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::Database;

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Interval between expired-session sweeps.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Web server for the community board.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Configured upload size cap in bytes, if any.
    max_upload_size: Option<u64>,
}

impl WebServer {
    /// Create a new web server from configuration and an open database.
    pub fn new(config: &Config, db: Database) -> crate::Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                crate::CobbsError::Config(format!("invalid web server address: {e}"))
            })?;

        let app_state = AppState::from_config(config, db)?;
        tracing::info!("Upload storage initialized at: {}", config.uploads.dir);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            max_upload_size: config.uploads.max_upload_size_bytes(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the session cleanup background task.
    ///
    /// Sweeps expired sessions out of the store once an hour.
    fn start_session_cleanup_task(sessions: Arc<SessionStore>) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let removed = sessions.cleanup();
                if removed > 0 {
                    tracing::info!(removed_count = removed, "Cleaned up expired sessions");
                } else {
                    tracing::debug!("No expired sessions to clean up");
                }
            }
        });
    }

    fn build_router(&self) -> axum::Router {
        create_router(self.app_state.clone(), self.max_upload_size)
            .merge(create_health_router())
            .layer(CompressionLayer::new())
    }

    /// Run the web server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let sessions = self.app_state.sessions.clone();
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_session_cleanup_task(sessions);
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr, std::io::Error> {
        let sessions = self.app_state.sessions.clone();
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_session_cleanup_task(sessions);
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
