//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // FAQ entries
        .route(
            "/faq",
            get(handlers::faq::list_entries)
                .post(handlers::faq::create_entry)
                .delete(handlers::faq::delete_all),
        )
        .route("/faq/bulk", post(handlers::faq::create_bulk))
        .route(
            "/faq/{id}",
            get(handlers::faq::get_entry)
                .put(handlers::faq::update_entry)
                .delete(handlers::faq::delete_entry),
        )
        // Conversations
        .route("/chat/start", post(handlers::chat::start_conversation))
        .route(
            "/chat/{session_id}",
            get(handlers::chat::get_transcript).post(handlers::chat::continue_conversation),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
