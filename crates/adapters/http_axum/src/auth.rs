//! Authorization gate middleware.
//!
//! Installed with `route_layer`, so it only runs once a route has matched and
//! before the handler is dispatched. The matched route template and method
//! are resolved against the endpoint table; the required permission for that
//! `(ResourceKind, Operation)` pair must be granted by the bearer token.
//! Verified [`Claims`](casting_domain::auth::Claims) are stored in the request
//! extensions for downstream handlers.

use axum::extract::{MatchedPath, Request, State};
use axum::http::Method;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use casting_app::ports::{ActorRepository, MovieRepository, TokenVerifier};
use casting_domain::auth::{AuthError, Operation, ResourceKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Route template of item endpoints, relative to the collection.
const ITEM_SEGMENT: &str = "{id}";

/// Resource collection a route template belongs to, if any.
fn resource_kind(route: &str) -> Option<ResourceKind> {
    route
        .trim_start_matches('/')
        .split('/')
        .next()
        .and_then(ResourceKind::from_plural)
}

/// Resolve a matched route template and method to the protected endpoint.
///
/// `HEAD` is answered by the `GET` handler, so it needs the same permission.
/// Returns `None` for routes outside the table (e.g. `/health`) and for
/// methods the table does not list.
#[must_use]
pub fn endpoint(method: &Method, route: &str) -> Option<(ResourceKind, Operation)> {
    let kind = resource_kind(route)?;
    let mut segments = route.trim_start_matches('/').split('/').skip(1);
    let read = method == Method::GET || method == Method::HEAD;

    let operation = match (segments.next(), segments.next()) {
        (None, _) if read => Operation::List,
        (None, _) if method == Method::POST => Operation::Create,
        (Some(ITEM_SEGMENT), None) if read => Operation::Get,
        (Some(ITEM_SEGMENT), None) if method == Method::PATCH => Operation::Update,
        (Some(ITEM_SEGMENT), None) if method == Method::DELETE => Operation::Delete,
        _ => return None,
    };
    Some((kind, operation))
}

/// Middleware enforcing the endpoint's required permission.
///
/// Routes outside the resource collections pass through untouched.
///
/// # Errors
///
/// Returns the translated [`AuthError`] when the request is not authorized,
/// and 405 for a resource route the endpoint table does not list.
pub async fn require_permission<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let Some(route) = request.extensions().get::<MatchedPath>() else {
        return Ok(next.run(request).await);
    };
    if resource_kind(route.as_str()).is_none() {
        return Ok(next.run(request).await);
    }
    // resource routes outside the table are refused
    let (kind, operation) =
        endpoint(request.method(), route.as_str()).ok_or_else(ApiError::method_not_allowed)?;

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| {
            value.to_str().map_err(|_| {
                AuthError::MalformedHeader("Authorization header must be valid ASCII.")
            })
        })
        .transpose()?;

    let claims = state.authorizer.authorize(header, kind, operation)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
