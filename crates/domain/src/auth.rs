//! Permissions, decoded claims, and authorization failures.
//!
//! Every endpoint requires exactly one permission, derived from the
//! `(ResourceKind, Operation)` pair through [`Permission::required`]. A request
//! is allowed when that exact string is a member of the token's granted
//! scopes. There is no hierarchy or wildcard matching.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two resource collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Actors,
    Movies,
}

impl ResourceKind {
    pub const ALL: [Self; 2] = [Self::Actors, Self::Movies];

    /// Collection name, used in paths, scopes, and list envelopes.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Actors => "actors",
            Self::Movies => "movies",
        }
    }

    /// Member name, used in single-item envelopes.
    #[must_use]
    pub const fn singular(self) -> &'static str {
        match self {
            Self::Actors => "actor",
            Self::Movies => "movie",
        }
    }

    /// Resolve a collection name such as `"actors"`.
    #[must_use]
    pub fn from_plural(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.plural() == value)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// The five operations every resource kind supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Get,
        Self::Create,
        Self::Update,
        Self::Delete,
    ];

    /// The verb prefix of the scope guarding this operation.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::List | Self::Get => "get",
            Self::Create => "post",
            Self::Update => "patch",
            Self::Delete => "delete",
        }
    }
}

/// A single scope string such as `get:actors`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// The permission an endpoint requires.
    #[must_use]
    pub fn required(kind: ResourceKind, operation: Operation) -> Self {
        Self(format!("{}:{}", operation.verb(), kind.plural()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The verified content of a bearer token that matters to this service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    /// Token subject (`sub`), when present.
    pub subject: Option<String>,
    /// Granted scopes.
    pub permissions: BTreeSet<Permission>,
}

impl Claims {
    #[must_use]
    pub fn new<I, P>(subject: Option<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self {
            subject,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact membership test.
    #[must_use]
    pub fn grants(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }
}

/// Why a syntactically present token was refused by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// `exp` is in the past.
    Expired,
    /// Issuer, audience, or `nbf` did not match expectations.
    InvalidClaims,
    /// Bad signature or an undecodable token.
    Invalid,
}

impl TokenRejection {
    /// Machine-readable code surfaced in the error envelope.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Expired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Invalid => "invalid_token",
        }
    }
}

/// Authorization failures, in the order the gate detects them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,

    #[error("{0}")]
    MalformedHeader(&'static str),

    #[error("{reason}")]
    InvalidToken {
        rejection: TokenRejection,
        reason: String,
    },

    #[error("Permissions not included in token.")]
    MissingPermissions,

    #[error("Permission {required} not granted.")]
    InsufficientScope { required: Permission },
}

impl AuthError {
    /// Machine-readable code surfaced in the error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "authorization_header_missing",
            Self::MalformedHeader(_) => "invalid_header",
            Self::InvalidToken { rejection, .. } => rejection.code(),
            Self::MissingPermissions => "invalid_claims",
            Self::InsufficientScope { .. } => "unauthorized",
        }
    }
}
