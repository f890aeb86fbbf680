//! HTTP API server

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::SessionManager;
use crate::config::Config;
use crate::error::Result;
use crate::store::{CredentialStore, MemoryStore, PostgresStore};

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub sessions: SessionManager,
}

/// Wire up the credential store and session manager from config
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let store: Arc<dyn CredentialStore> = match &config.database {
        Some(database) => {
            tracing::info!(host = %database.host, dbname = %database.dbname, "connecting to PostgreSQL");
            Arc::new(PostgresStore::connect(database).await?)
        }
        None => {
            tracing::warn!("no [database] configured - using in-memory store, data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let sessions = SessionManager::new(store, &config.auth);
    Ok(Arc::new(AppState { config, sessions }))
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(config).await?;
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        // Auth routes
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/auth/me", get(routes::me))
        // User administration
        .route("/api/users", get(routes::list_users))
        .route("/api/users", post(routes::create_user))
        .route("/api/users/{id}/role", put(routes::update_role))
        .route("/api/users/{id}/active", put(routes::set_active))
        .route("/api/users/{id}", delete(routes::delete_user))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
