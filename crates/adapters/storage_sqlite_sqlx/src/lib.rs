//! # casting-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `Repository<Actor>` and `Repository<Movie>` port traits
//!   defined in `casting-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Classify database failures as caller-induced (constraint violations) or
//!   internal
//!
//! ## Dependency rule
//! Depends on `casting-app` (for port traits) and `casting-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod actor_repo;
mod error;
mod movie_repo;
mod pool;

pub use actor_repo::SqliteActorRepository;
pub use error::StorageError;
pub use movie_repo::SqliteMovieRepository;
pub use pool::{Config, Database};
