//! # casting-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** for actors and movies (`/actors`, `/movies`, …)
//! - Run the **authorization gate** before any handler is dispatched: the
//!   matched route is looked up in the `(resource kind, operation)` table and
//!   the bearer token must grant the corresponding permission
//! - Map HTTP requests into application service calls (driving adapter)
//! - Translate every failure into the uniform error envelope
//!   `{success: false, error, message, description, code?}`
//!
//! ## Dependency rule
//! Depends on `casting-app` (for port traits and services) and `casting-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
