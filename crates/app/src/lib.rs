//! # casting-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Repository<T>`: CRUD for one resource kind (actors, movies)
//!   - `TokenVerifier`: decode and verify a bearer token into claims
//! - Define **driving/inbound ports** as use-case structs:
//!   - `Authorizer`: parse the `Authorization` header, verify, check scope
//!   - `ResourceService<T, R>`: list, get, create, update, delete
//! - Orchestrate domain objects without knowing *how* persistence or token
//!   cryptography works
//!
//! ## Dependency rule
//! Depends on `casting-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
