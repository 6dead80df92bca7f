//! Shared application state for axum handlers.

use std::sync::Arc;

use casting_app::ports::{ActorRepository, MovieRepository, TokenVerifier};
use casting_app::services::{ActorService, Authorizer, MovieService};

/// Application state shared across all axum handlers.
///
/// Generic over the token verifier and the two repository types to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<V, AR, MR> {
    /// Authorization gate.
    pub authorizer: Arc<Authorizer<V>>,
    /// Actor CRUD service.
    pub actor_service: Arc<ActorService<AR>>,
    /// Movie CRUD service.
    pub movie_service: Arc<MovieService<MR>>,
}

impl<V, AR, MR> Clone for AppState<V, AR, MR> {
    fn clone(&self) -> Self {
        Self {
            authorizer: Arc::clone(&self.authorizer),
            actor_service: Arc::clone(&self.actor_service),
            movie_service: Arc::clone(&self.movie_service),
        }
    }
}

impl<V, AR, MR> AppState<V, AR, MR>
where
    V: TokenVerifier + Send + Sync + 'static,
    AR: ActorRepository + Send + Sync + 'static,
    MR: MovieRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        authorizer: Authorizer<V>,
        actor_service: ActorService<AR>,
        movie_service: MovieService<MR>,
    ) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
            actor_service: Arc::new(actor_service),
            movie_service: Arc::new(movie_service),
        }
    }
}
