//! JSON REST handlers for actors.

use axum::extract::{Path, State};
use serde::Serialize;

use casting_app::ports::{ActorRepository, MovieRepository, TokenVerifier};
use casting_domain::actor::Actor;
use casting_domain::id::ActorId;

use super::{Created, Deleted, Envelope, JsonBody, parse_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Body of the list response.
#[derive(Debug, Serialize)]
pub struct ActorList {
    pub actors: Vec<Actor>,
}

/// Body of the get and update responses.
#[derive(Debug, Serialize)]
pub struct ActorItem {
    pub actor: Actor,
}

/// `GET /actors`
pub async fn list<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
) -> Result<Envelope<ActorList>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let actors = state.actor_service.list().await?;
    Ok(Envelope::ok(ActorList { actors }))
}

/// `GET /actors/{id}`
pub async fn get<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    Path(id): Path<String>,
) -> Result<Envelope<ActorItem>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let id = parse_id::<Actor>(&id)?;
    let actor = state.actor_service.get(id).await?;
    Ok(Envelope::ok(ActorItem { actor }))
}

/// `POST /actors`
pub async fn create<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<Created<ActorId>>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let actor = state.actor_service.create(&body).await?;
    Ok(Envelope::ok(Created {
        created_id: actor.id,
    }))
}

/// `PATCH /actors/{id}`
pub async fn update<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Envelope<ActorItem>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let id = parse_id::<Actor>(&id)?;
    let actor = state.actor_service.update(id, &body).await?;
    Ok(Envelope::ok(ActorItem { actor }))
}

/// `DELETE /actors/{id}`
pub async fn delete<V, AR, MR>(
    State(state): State<AppState<V, AR, MR>>,
    Path(id): Path<String>,
) -> Result<Envelope<Deleted<ActorId>>, ApiError>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    let id = parse_id::<Actor>(&id)?;
    let deleted_id = state.actor_service.delete(id).await?;
    Ok(Envelope::ok(Deleted { deleted_id }))
}
