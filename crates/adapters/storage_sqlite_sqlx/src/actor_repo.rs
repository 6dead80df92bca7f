//! `SQLite` implementation of `Repository<Actor>`.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use casting_app::ports::Repository;
use casting_domain::actor::{Actor, Gender, NewActor};
use casting_domain::error::CastingError;
use casting_domain::id::ActorId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Actor`].
struct Wrapper(Actor);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Actor> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let age: i32 = row.try_get("age")?;
        let gender: String = row.try_get("gender")?;

        let gender: Gender = gender
            .parse()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Actor {
            id: ActorId::new(id),
            name,
            age,
            gender,
        }))
    }
}

const INSERT: &str = "INSERT INTO actors (name, age, gender) VALUES (?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT id, name, age, gender FROM actors WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, name, age, gender FROM actors ORDER BY id";
const UPDATE: &str = "UPDATE actors SET name = ?, age = ?, gender = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM actors WHERE id = ?";

/// `SQLite`-backed actor repository.
pub struct SqliteActorRepository {
    pool: SqlitePool,
}

impl SqliteActorRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository<Actor> for SqliteActorRepository {
    fn create(&self, draft: NewActor) -> impl Future<Output = Result<Actor, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&draft.name)
                .bind(draft.age)
                .bind(draft.gender.as_str())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(draft.into_actor(ActorId::new(result.last_insert_rowid())))
        }
    }

    fn get_by_id(
        &self,
        id: ActorId,
    ) -> impl Future<Output = Result<Option<Actor>, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Actor>, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, actor: &Actor) -> impl Future<Output = Result<bool, CastingError>> + Send {
        let pool = self.pool.clone();
        let actor = actor.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&actor.name)
                .bind(actor.age)
                .bind(actor.gender.as_str())
                .bind(actor.id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn delete(&self, id: ActorId) -> impl Future<Output = Result<bool, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(DELETE_BY_ID)
                .bind(id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }
}
