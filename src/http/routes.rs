use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session control
        .route("/session/start", post(handlers::start_session))
        .route("/session/stop", post(handlers::stop_session))
        // Session queries
        .route("/session/status", get(handlers::session_status))
        .route("/session/transcript", get(handlers::session_transcript))
        .route("/session/suggestions", get(handlers::session_suggestions))
        .route("/session/export", get(handlers::export_session))
        // Upload audio boundary
        .route("/session/audio", post(handlers::ingest_audio))
        // Provider selection
        .route("/providers", post(handlers::update_providers))
        // The browser shell calls from its own origin; requests are traced
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
