//! Resource service: the five CRUD use-cases, shared by actors and movies.

use std::marker::PhantomData;

use serde_json::Value;

use casting_domain::actor::Actor;
use casting_domain::error::{CastingError, NotFoundError};
use casting_domain::movie::Movie;
use casting_domain::resource::Resource;

use crate::ports::Repository;

/// Application service for CRUD operations on one resource kind.
///
/// Holds no state between calls beyond the injected repository. Validation is
/// fully resolved before any mutating repository call is issued.
pub struct ResourceService<T, R> {
    repo: R,
    _kind: PhantomData<fn() -> T>,
}

/// Service over actors.
pub type ActorService<R> = ResourceService<Actor, R>;

/// Service over movies.
pub type MovieService<R> = ResourceService<Movie, R>;

fn not_found<T: Resource>(id: T::Id) -> CastingError {
    NotFoundError {
        entity: T::NAME,
        id: id.to_string(),
    }
    .into()
}

impl<T: Resource, R: Repository<T>> ResourceService<T, R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _kind: PhantomData,
        }
    }

    /// List every record of the kind.
    ///
    /// # Errors
    ///
    /// Returns a persistence error propagated from the repository.
    #[tracing::instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn list(&self) -> Result<Vec<T>, CastingError> {
        self.repo.get_all().await
    }

    /// Look up a record by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`CastingError::NotFound`] when no record with `id` exists,
    /// or a persistence error from the repository.
    #[tracing::instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn get(&self, id: T::Id) -> Result<T, CastingError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found::<T>(id))
    }

    /// Validate `body` in create mode and persist the result.
    ///
    /// # Errors
    ///
    /// Returns [`CastingError::Validation`] if the body is rejected, or a
    /// persistence error from the repository.
    #[tracing::instrument(skip(self, body), fields(kind = %T::KIND))]
    pub async fn create(&self, body: &Value) -> Result<T, CastingError> {
        let draft = T::draft_from_body(body)?;
        let created = self.repo.create(draft).await?;
        tracing::info!(id = %created.id(), "{} created", T::NAME);
        Ok(created)
    }

    /// Apply the fields present in `body` to the record `id`.
    ///
    /// The record is looked up first, then the body is validated in
    /// partial-update mode; only then is the write issued.
    ///
    /// # Errors
    ///
    /// Returns [`CastingError::NotFound`] when the record does not exist (or
    /// vanished before the write), [`CastingError::Validation`] if the body is
    /// rejected, or a persistence error from the repository.
    #[tracing::instrument(skip(self, body), fields(kind = %T::KIND))]
    pub async fn update(&self, id: T::Id, body: &Value) -> Result<T, CastingError> {
        let mut record = self.get(id).await?;
        let patch = T::patch_from_body(body)?;
        record.apply(patch);

        if !self.repo.update(&record).await? {
            return Err(not_found::<T>(id));
        }
        tracing::info!(%id, "{} updated", T::NAME);
        Ok(record)
    }

    /// Delete the record `id`, returning the deleted identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CastingError::NotFound`] when the record does not exist, or
    /// a persistence error from the repository.
    #[tracing::instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn delete(&self, id: T::Id) -> Result<T::Id, CastingError> {
        let record = self.get(id).await?;

        if !self.repo.delete(record.id()).await? {
            return Err(not_found::<T>(id));
        }
        tracing::info!(%id, "{} deleted", T::NAME);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casting_domain::actor::{Gender, NewActor};
    use casting_domain::error::{PersistenceError, PersistenceFault};
    use casting_domain::id::{ActorId, MovieId};
    use casting_domain::movie::NewMovie;
    use casting_domain::validation::ValidationError;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct InMemoryActorRepo {
        store: Mutex<BTreeMap<ActorId, Actor>>,
        writes: AtomicUsize,
    }

    impl InMemoryActorRepo {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl Repository<Actor> for InMemoryActorRepo {
        fn create(
            &self,
            draft: NewActor,
        ) -> impl Future<Output = Result<Actor, CastingError>> + Send {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut store = self.store.lock().unwrap();
            let next = store.keys().last().map_or(1, |id| id.get() + 1);
            let actor = draft.into_actor(ActorId::new(next));
            store.insert(actor.id, actor.clone());
            async { Ok(actor) }
        }

        fn get_by_id(
            &self,
            id: ActorId,
        ) -> impl Future<Output = Result<Option<Actor>, CastingError>> + Send {
            let result = self.store.lock().unwrap().get(&id).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Actor>, CastingError>> + Send {
            let result: Vec<Actor> = self.store.lock().unwrap().values().cloned().collect();
            async { Ok(result) }
        }

        fn update(&self, actor: &Actor) -> impl Future<Output = Result<bool, CastingError>> + Send {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut store = self.store.lock().unwrap();
            let found = store.contains_key(&actor.id);
            if found {
                store.insert(actor.id, actor.clone());
            }
            async move { Ok(found) }
        }

        fn delete(&self, id: ActorId) -> impl Future<Output = Result<bool, CastingError>> + Send {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let found = self.store.lock().unwrap().remove(&id).is_some();
            async move { Ok(found) }
        }
    }

    /// Every call fails as an internal store fault.
    struct BrokenMovieRepo;

    fn broken() -> CastingError {
        PersistenceError::internal(std::io::Error::other("disk on fire")).into()
    }

    impl Repository<Movie> for BrokenMovieRepo {
        async fn create(&self, _draft: NewMovie) -> Result<Movie, CastingError> {
            Err(broken())
        }
        async fn get_by_id(&self, _id: MovieId) -> Result<Option<Movie>, CastingError> {
            Err(broken())
        }
        async fn get_all(&self) -> Result<Vec<Movie>, CastingError> {
            Err(broken())
        }
        async fn update(&self, _movie: &Movie) -> Result<bool, CastingError> {
            Err(broken())
        }
        async fn delete(&self, _id: MovieId) -> Result<bool, CastingError> {
            Err(broken())
        }
    }

    fn make_service() -> ActorService<InMemoryActorRepo> {
        ActorService::new(InMemoryActorRepo::default())
    }

    async fn seeded() -> (ActorService<InMemoryActorRepo>, ActorId) {
        let svc = make_service();
        let actor = svc
            .create(&json!({"name": "Leonardo DiCaprio", "age": 46, "gender": "Male"}))
            .await
            .unwrap();
        (svc, actor.id)
    }

    #[tokio::test]
    async fn should_create_actor_that_resolves_by_id() {
        let (svc, id) = seeded().await;

        let fetched = svc.get(id).await.unwrap();
        assert_eq!(
            fetched,
            NewActor {
                name: "Leonardo DiCaprio".to_string(),
                age: 46,
                gender: Gender::Male,
            }
            .into_actor(id)
        );
    }

    #[tokio::test]
    async fn should_not_write_when_create_body_is_invalid() {
        let svc = make_service();
        let result = svc.create(&json!({"name": "Jackie Chan", "age": -67})).await;

        assert!(matches!(
            result,
            Err(CastingError::Validation(ValidationError::MissingField { field: "gender" }))
        ));
        assert_eq!(svc.repo.writes(), 0);
    }

    #[tokio::test]
    async fn should_return_not_found_when_actor_missing() {
        let svc = make_service();
        let result = svc.get(ActorId::new(99_999)).await;
        assert!(matches!(result, Err(CastingError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_all_actors() {
        let (svc, _) = seeded().await;
        svc.create(&json!({"name": "Kate Winslet", "age": 45, "gender": "Female"}))
            .await
            .unwrap();

        let all = svc.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn should_leave_absent_fields_untouched_when_updating() {
        let (svc, id) = seeded().await;

        let updated = svc.update(id, &json!({"name": "X"})).await.unwrap();
        assert_eq!(updated.name, "X");
        assert_eq!(updated.age, 46);
        assert_eq!(updated.gender, Gender::Male);
        assert_eq!(svc.get(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn should_yield_same_representation_when_patch_is_repeated() {
        let (svc, id) = seeded().await;
        let body = json!({"age": 47, "gender": "Male"});

        let first = svc.update(id, &body).await.unwrap();
        let second = svc.update(id, &body).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn should_not_write_when_patch_is_out_of_range() {
        let (svc, id) = seeded().await;
        let writes = svc.repo.writes();

        let result = svc.update(id, &json!({"age": -5})).await;
        assert!(matches!(
            result,
            Err(CastingError::Validation(ValidationError::OutOfRange { field: "age", .. }))
        ));
        assert_eq!(svc.repo.writes(), writes);
        assert_eq!(svc.get(id).await.unwrap().age, 46);
    }

    #[tokio::test]
    async fn should_report_not_found_before_validating_patch() {
        let svc = make_service();
        let result = svc.update(ActorId::new(7), &json!({"age": "old"})).await;
        assert!(matches!(result, Err(CastingError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_after_delete() {
        let (svc, id) = seeded().await;

        assert_eq!(svc.delete(id).await.unwrap(), id);
        assert!(matches!(svc.get(id).await, Err(CastingError::NotFound(_))));
        assert!(matches!(svc.delete(id).await, Err(CastingError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_propagate_persistence_errors() {
        let svc = MovieService::new(BrokenMovieRepo);

        let result = svc.list().await;
        assert!(matches!(
            result,
            Err(CastingError::Persistence(PersistenceError {
                fault: PersistenceFault::Internal,
                ..
            }))
        ));

        let result = svc
            .create(&json!({"title": "Dune", "release_year": 2021}))
            .await;
        assert!(matches!(result, Err(CastingError::Persistence(_))));
    }
}
