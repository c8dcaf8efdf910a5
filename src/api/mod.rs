//! API module
//!
//! HTTP API endpoints and middleware.

pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub use routes::{create_router, public_router};
pub use state::AppState;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Session checks only guard the protected routes; login stays public
    let protected_routes = create_router().layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::session_middleware,
    ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health_check))
        .nest("/api/v1", public_router().merge(protected_routes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::logging_middleware)),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
