//! HTTP API layer for agora.
//!
//! - **Endpoints**: JSON endpoints under `/api`
//! - **Extractors**: authentication and pagination parameters
//! - **Middleware**: bearer token authentication and shared state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;

pub use endpoints::router;
pub use middleware::AppState;

/// The `/api` router with authentication applied, ready to serve.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state)
}
