//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let auth_state = Arc::new(AuthState {
        jwt_secret: state.config.jwt_secret.clone(),
        jwt_expiry_hours: state.config.jwt_expiry_hours,
    });

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    // Protected routes (require a bearer token)
    let protected_routes = Router::new()
        .route("/", get(handlers::index::index))
        .route("/upload", post(handlers::upload::upload))
        .route("/history", get(handlers::history::list_history))
        .route("/history/{id}", delete(handlers::history::delete_history_entry))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
