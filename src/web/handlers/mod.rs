//! Request handlers for the COBBS web layer.

pub mod auth;
pub mod posts;
pub mod uploads;

pub use auth::{login, logout, signup};
pub use posts::{
    create_complaint, create_help, create_lost_found, list_complaints, list_help, list_lost_found,
};
pub use uploads::download_upload;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::upload::{UploadPolicy, UploadStorage};
use crate::web::dto::{ApiResponse, StatusResponse};
use crate::Database;

/// Thread-safe database handle shared across handlers.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: SharedDatabase,
    /// Server-side session store.
    pub sessions: Arc<SessionStore>,
    /// Upload storage directory.
    pub storage: UploadStorage,
    /// Upload acceptance policy.
    pub policy: UploadPolicy,
    /// Board name shown at the entry endpoint.
    pub board_name: String,
    /// Board description shown at the entry endpoint.
    pub board_description: String,
    /// Secret surfaced to the cookie-signing layer in front of this service.
    pub session_secret: String,
}

impl AppState {
    /// Assemble the application state from configuration.
    pub fn from_config(config: &Config, db: Database) -> crate::Result<Self> {
        let storage = UploadStorage::new(&config.uploads.dir)?;
        let policy = UploadPolicy::from_config(&config.uploads);
        let sessions = Arc::new(SessionStore::new(config.session.ttl_secs));
        let session_secret = config.session.resolve_secret();

        Ok(Self {
            db: Arc::new(db),
            sessions,
            storage,
            policy,
            board_name: config.board.name.clone(),
            board_description: config.board.description.clone(),
            session_secret,
        })
    }
}

/// GET / - Service identity.
///
/// The entry page proper is rendered by the front-end; this endpoint
/// identifies the service and doubles as the redirect target of the
/// session gate.
pub async fn service_status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatusResponse>> {
    Json(ApiResponse::new(StatusResponse {
        name: state.board_name.clone(),
        description: state.board_description.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
