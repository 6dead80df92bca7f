//! JSON REST handlers for movies.

use axum::extract::{Path, State};
use serde::Serialize;

use casting_app::ports::{ActorRepository, MovieRepository, TokenVerifier};
use casting_domain::id::MovieId;
use casting_domain::movie::Movie;

use super::{Created, Deleted, Envelope, JsonBody, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Body of the list response.
#[derive(Debug, Serialize)]
pub struct MovieList {
    pub movies: Vec<Movie>,
}

/// Body of the get and update responses.
#[derive(Debug, Serialize)]
pub struct MovieItem {
    pub movie: Movie,
}

/// `GET /movies`
pub async fn list<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
) -> Result<Envelope<MovieList>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let movies = state.movie_service.list().await?;
    Ok(Envelope::ok(MovieList { movies }))
}

/// `GET /movies/{id}`
pub async fn get<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    Path(id): Path<String>,
) -> Result<Envelope<MovieItem>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let id = parse_id::<Movie>(&id)?;
    let movie = state.movie_service.get(id).await?;
    Ok(Envelope::ok(MovieItem { movie }))
}

/// `POST /movies`
pub async fn create<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Created<MovieId>>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let movie = state.movie_service.create(&body).await?;
    Ok(Envelope::ok(Created {
        created_id: movie.id,
    }))
}

/// `PATCH /movies/{id}`
pub async fn update<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<MovieItem>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let id = parse_id::<Movie>(&id)?;
    let movie = state.movie_service.update(id, &body).await?;
    Ok(Envelope::ok(MovieItem { movie }))
}

/// `DELETE /movies/{id}`
pub async fn delete<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    Path(id): Path<String>,
) -> Result<Envelope<Deleted<MovieId>>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let id = parse_id::<Movie>(&id)?;
    let deleted_id = state.movie_service.delete(id).await?;
    Ok(Envelope::ok(Deleted { deleted_id }))
}
