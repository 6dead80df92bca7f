//! # casting-domain
//!
//! Pure domain model for the casting agency API.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and the error taxonomy
//! - Define **Actors** and **Movies**, the two independent resource kinds
//! - Define the **permission table** mapping `(resource kind, operation)` to the
//!   scope string a bearer token must carry
//! - Define the **request validator** that turns raw JSON bodies into typed
//!   drafts and patches, with type checks strictly preceding range checks
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod auth;
pub mod error;
pub mod id;
pub mod resource;
pub mod validation;

pub mod actor;
pub mod movie;
