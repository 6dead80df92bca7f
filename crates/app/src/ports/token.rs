//! Token port: bearer credential verification.

use casting_domain::auth::{AuthError, Claims};

/// Verifies a raw bearer token and extracts its claims.
///
/// Implementations check signature, issuer, audience and expiry and return
/// [`AuthError::InvalidToken`] on failure, or
/// [`AuthError::MissingPermissions`] when the token carries no scope claim.
pub trait TokenVerifier {
    /// # Errors
    ///
    /// Returns an [`AuthError`] describing why the token was refused.
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}
