//! The shape shared by every resource kind.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde_json::Value;

use crate::auth::ResourceKind;
use crate::validation::ValidationError;

/// A persisted record exposed through the five CRUD operations.
///
/// `Draft` is the validated input of a create (no identifier yet) and `Patch`
/// the validated input of a partial update (every field optional).
pub trait Resource: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static;
    type Draft: fmt::Debug + Send + 'static;
    type Patch: fmt::Debug + Send + 'static;

    /// Collection this resource belongs to.
    const KIND: ResourceKind;
    /// Human-readable name used in error descriptions.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;

    /// Validate a create body.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn draft_from_body(body: &Value) -> Result<Self::Draft, ValidationError>;

    /// Validate a partial-update body.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn patch_from_body(body: &Value) -> Result<Self::Patch, ValidationError>;

    /// Overwrite the fields present in `patch`.
    fn apply(&mut self, patch: Self::Patch);
}
