//! Axum router assembly.

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use casting_app::ports::{ActorRepository, MovieRepository, TokenVerifier};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Every matched resource route passes through the authorization gate before
/// its handler runs; `/health` is let through. Unknown paths and unsupported methods answer with the error
/// envelope. Includes a permissive CORS layer and a [`TraceLayer`] that logs
/// each HTTP request/response using the `tracing` ecosystem.
pub fn build<V, AR, MR>(state: AppState<V, AR, MR>) -> Router
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .merge(crate::api::routes::<V, AR, MR>())
        // only reaches the routes registered above; the gate never sees it
        .method_not_allowed_fallback(method_not_allowed)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_permission::<V, AR, MR>,
        ))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        "The requested URL was not found on the server.",
    )
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
