//! HTTP and WebSocket surface of the daemon.
//!
//! One axum router carries the engine facade routes and the session
//! WebSocket endpoint, with request tracing and permissive CORS for the
//! local browser client.

pub mod handlers;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::engine::EngineClient;
use crate::session::SessionRegistry;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Daemon configuration.
    pub config: Arc<Config>,
    /// Engine CLI client.
    pub engine: EngineClient,
    /// Registry of live sessions.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Creates the application state from configuration and an engine
    /// client.
    pub fn new(config: Config, engine: EngineClient) -> Self {
        let sessions = Arc::new(SessionRegistry::new(config.session.max_sessions));
        Self {
            config: Arc::new(config),
            engine,
            sessions,
        }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    Router::new()
        .route("/ps-all", get(handlers::list_containers))
        .route("/images", get(handlers::list_images))
        .route("/run", post(handlers::run_containers))
        .route("/pull", get(handlers::pull_image))
        .route("/rmi", get(handlers::remove_image))
        .route("/stop", get(handlers::stop_container))
        .route("/start", get(handlers::start_container))
        .route("/rm", get(handlers::remove_container))
        .route("/container-details", get(handlers::container_details))
        .route("/rename-container", post(handlers::rename_container))
        .route("/container-stats", post(handlers::container_stats))
        .route("/ws", get(ws::session_ws))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
