//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod authorizer;
pub mod resource_service;

pub use authorizer::Authorizer;
pub use resource_service::{ActorService, MovieService, ResourceService};
