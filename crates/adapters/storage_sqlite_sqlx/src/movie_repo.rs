//! `SQLite` implementation of `Repository<Movie>`.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use casting_app::ports::Repository;
use casting_domain::error::CastingError;
use casting_domain::id::MovieId;
use casting_domain::movie::{Movie, NewMovie};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Movie`].
struct Wrapper(Movie);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Movie {
            id: MovieId::new(row.try_get("id")?),
            title: row.try_get("title")?,
            release_year: row.try_get("release_year")?,
        }))
    }
}

const INSERT: &str = "INSERT INTO movies (title, release_year) VALUES (?, ?)";
const SELECT_BY_ID: &str = "SELECT id, title, release_year FROM movies WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, title, release_year FROM movies ORDER BY id";
const UPDATE: &str = "UPDATE movies SET title = ?, release_year = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM movies WHERE id = ?";

/// `SQLite`-backed movie repository.
pub struct SqliteMovieRepository {
    pool: SqlitePool,
}

impl SqliteMovieRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository<Movie> for SqliteMovieRepository {
    fn create(&self, draft: NewMovie) -> impl Future<Output = Result<Movie, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(&draft.title)
                .bind(draft.release_year)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(draft.into_movie(MovieId::new(result.last_insert_rowid())))
        }
    }

    fn get_by_id(
        &self,
        id: MovieId,
    ) -> impl Future<Output = Result<Option<Movie>, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Movie>, CastingError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, movie: &Movie) -> impl Future<Output = Result<bool, CastingError>> + Send {
        let pool = self.pool.clone();
        let movie = movie.clone();
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&movie.title)
                .bind(movie.release_year)
                .bind(movie.id.get())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(result.rows_affected() > 0)
        }
    }

    fn delete(&self, id: MovieId) -> impl Future<Output = Result<bool, CastingError>> + Send {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteMovieRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteMovieRepository::new(db.pool().clone())
    }

    fn dune() -> NewMovie {
        NewMovie {
            title: "Dune".to_string(),
            release_year: 2021,
        }
    }

    #[tokio::test]
    async fn should_create_and_retrieve_movie() {
        let repo = setup().await;
        let created = repo.create(dune()).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.release_year, 2021);
    }

    #[tokio::test]
    async fn should_update_and_delete_movie() {
        let repo = setup().await;
        let mut movie = repo.create(dune()).await.unwrap();

        movie.title = "Dune: Part One".to_string();
        assert!(repo.update(&movie).await.unwrap());
        assert_eq!(repo.get_all().await.unwrap(), vec![movie.clone()]);

        assert!(repo.delete(movie.id).await.unwrap());
        assert!(repo.get_by_id(movie.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_not_reuse_ids_after_delete() {
        let repo = setup().await;
        let first = repo.create(dune()).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(dune()).await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
