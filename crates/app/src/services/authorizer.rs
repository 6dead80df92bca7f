//! Authorizer: the single gate every resource operation passes through.

use casting_domain::auth::{AuthError, Claims, Operation, Permission, ResourceKind};

use crate::ports::TokenVerifier;

/// Turns an `Authorization` header into verified claims holding a required
/// permission.
pub struct Authorizer<V> {
    verifier: V,
}

impl<V: TokenVerifier> Authorizer<V> {
    /// Create a new authorizer backed by the given verifier.
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Authorize `operation` on `kind` for the raw header value.
    ///
    /// # Errors
    ///
    /// See [`Authorizer::authorize_permission`].
    pub fn authorize(
        &self,
        header: Option<&str>,
        kind: ResourceKind,
        operation: Operation,
    ) -> Result<Claims, AuthError> {
        self.authorize_permission(header, &Permission::required(kind, operation))
    }

    /// Verify the bearer token and check that it grants `required`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingHeader`] when `header` is `None`
    /// - [`AuthError::MalformedHeader`] when it is not `Bearer <token>`
    /// - whatever the verifier reports for a bad token
    /// - [`AuthError::InsufficientScope`] when `required` is not granted
    pub fn authorize_permission(
        &self,
        header: Option<&str>,
        required: &Permission,
    ) -> Result<Claims, AuthError> {
        let token = bearer_token(header)?;
        let claims = self.verifier.verify(token)?;

        if !claims.grants(required) {
            tracing::info!(subject = ?claims.subject, %required, "permission denied");
            return Err(AuthError::InsufficientScope {
                required: required.clone(),
            });
        }

        tracing::debug!(subject = ?claims.subject, %required, "request authorized");
        Ok(claims)
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// # Errors
///
/// Returns [`AuthError::MissingHeader`] or [`AuthError::MalformedHeader`].
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::MalformedHeader("Authorization header must start with \"Bearer\"."),
        ),
        (None, _, _) => Err(AuthError::MalformedHeader(
            "Authorization header must start with \"Bearer\".",
        )),
        (Some(_), None, _) => Err(AuthError::MalformedHeader("Token not found.")),
        (Some(_), Some(_), Some(_)) => Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token.",
        )),
        (Some(_), Some(token), None) => Ok(token),
    }
}
