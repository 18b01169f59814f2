use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Telephony webhook: answers a call with connect-stream markup
        .route(
            "/call/incoming",
            get(handlers::incoming_call).post(handlers::incoming_call),
        )
        // One upgraded socket = one call = one session
        .route("/media-stream", get(handlers::media_stream))
        // Outbound screening call
        .route("/calls/dial", post(handlers::dial))
        // Session queries
        .route("/sessions", get(handlers::list_sessions))
        .route(
            "/sessions/:stream_sid/status",
            get(handlers::session_status),
        )
        .route(
            "/sessions/:stream_sid/transcript",
            get(handlers::session_transcript),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
