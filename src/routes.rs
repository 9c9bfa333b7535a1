// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{history, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the quiz and history sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (quiz engine, config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/generate", post(quiz::generate_quiz))
        .route("/submit", post(quiz::submit_quiz))
        .route("/topics", get(quiz::list_topics))
        .route(
            "/history/{user_id}",
            get(history::list_history).delete(history::clear_history),
        )
        .route(
            "/history/{user_id}/{quiz_id}",
            delete(history::delete_history_entry),
        );

    Router::new()
        .route("/api/health", get(quiz::health))
        .nest("/api/quiz", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
