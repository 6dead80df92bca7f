//! Storage port: repository traits for persistence.

use std::future::Future;

use casting_domain::actor::Actor;
use casting_domain::error::CastingError;
use casting_domain::movie::Movie;
use casting_domain::resource::Resource;

/// CRUD access to every persisted `T`.
///
/// The repository assigns identifiers and is the only owner of persisted
/// state. `update` and `delete` return `Ok(false)` when no row with the
/// identifier exists anymore.
pub trait Repository<T: Resource> {
    /// Persist a new record and return it with its assigned identifier.
    fn create(&self, draft: T::Draft) -> impl Future<Output = Result<T, CastingError>> + Send;

    fn get_by_id(&self, id: T::Id) -> impl Future<Output = Result<Option<T>, CastingError>> + Send;

    /// Every record, ordered by identifier.
    fn get_all(&self) -> impl Future<Output = Result<Vec<T>, CastingError>> + Send;

    fn update(&self, record: &T) -> impl Future<Output = Result<bool, CastingError>> + Send;

    fn delete(&self, id: T::Id) -> impl Future<Output = Result<bool, CastingError>> + Send;
}

/// Repository of actors.
pub trait ActorRepository: Repository<Actor> {}

impl<R: Repository<Actor>> ActorRepository for R {}

/// Repository of movies.
pub trait MovieRepository: Repository<Movie> {}

impl<R: Repository<Movie>> MovieRepository for R {}
