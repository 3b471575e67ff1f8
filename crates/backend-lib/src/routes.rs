// ============================
// crates/backend-lib/src/routes.rs
// ============================
//! HTTP router.
use crate::handlers::{health::health, login::login};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
