//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod actors;
#[allow(clippy::missing_errors_doc)]
pub mod movies;

use std::str::FromStr;

use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use casting_app::ports::{ActorRepository, MovieRepository, TokenVerifier};
use casting_domain::error::{CastingError, NotFoundError};
use casting_domain::resource::Resource;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the resource sub-router.
pub fn routes<V, AR, MR>() -> Router<AppState<V, AR, MR>>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    Router::new()
        // Actors
        .route(
            "/actors",
            get(actors::list::<V, AR, MR>).post(actors::create::<V, AR, MR>),
        )
        .route(
            "/actors/{id}",
            get(actors::get::<V, AR, MR>)
                .patch(actors::update::<V, AR, MR>)
                .delete(actors::delete::<V, AR, MR>),
        )
        // Movies
        .route(
            "/movies",
            get(movies::list::<V, AR, MR>).post(movies::create::<V, AR, MR>),
        )
        .route(
            "/movies/{id}",
            get(movies::get::<V, AR, MR>)
                .patch(movies::update::<V, AR, MR>)
                .delete(movies::delete::<V, AR, MR>),
        )
}

/// Success wrapper: `{success: true, status_code: 200, ...body}`.
#[derive(Debug, Serialize)]
pub struct Envelope<B> {
    success: bool,
    status_code: u16,
    #[serde(flatten)]
    body: B,
}

impl<B: Serialize> Envelope<B> {
    pub fn ok(body: B) -> Self {
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            body,
        }
    }
}

impl<B: Serialize> IntoResponse for Envelope<B> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body of a create response.
#[derive(Debug, Serialize)]
pub struct Created<I> {
    pub created_id: I,
}

/// Body of a delete response.
#[derive(Debug, Serialize)]
pub struct Deleted<I> {
    pub deleted_id: I,
}

/// Any JSON value as request body, rejected with the uniform envelope.
pub struct JsonBody(pub Value);

impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Parse a path identifier; a non-numeric id addresses nothing.
fn parse_id<T>(raw: &str) -> Result<T::Id, ApiError>
where
    T: Resource,
    T::Id: FromStr,
{
    raw.parse().map_err(|_| {
        CastingError::from(NotFoundError {
            entity: T::NAME,
            id: raw.to_string(),
        })
        .into()
    })
}
