use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use casting_app::ports::TokenVerifier;
use casting_domain::auth::{AuthError, Claims, TokenRejection};

use crate::error::KeyError;

/// Key material used to check token signatures.
#[derive(Debug, Clone)]
pub enum VerificationKey {
    /// Shared secret for `HS256`.
    SharedSecret(Vec<u8>),
    /// PEM-encoded RSA public key for `RS256`.
    RsaPublicPem(Vec<u8>),
}

/// Verification settings.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub key: VerificationKey,
    /// Expected `iss`; not checked when `None`.
    pub issuer: Option<String>,
    /// Expected `aud`; not checked when `None`.
    pub audience: Option<String>,
    /// Clock skew tolerated on `exp` and `nbf`, in seconds.
    pub leeway_secs: u64,
}

/// Claim payload as issued by the identity provider.
///
/// `permissions` follows the RBAC array convention, `scope` the OAuth2
/// space-separated string.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
    #[serde(default)]
    scope: Option<String>,
}

/// [`TokenVerifier`] backed by `jsonwebtoken`.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

impl JwtVerifier {
    /// Build a verifier from the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the secret is empty or the PEM cannot be parsed.
    pub fn new(config: &JwtConfig) -> Result<Self, KeyError> {
        let (algorithm, key) = match &config.key {
            VerificationKey::SharedSecret(secret) => {
                if secret.is_empty() {
                    return Err(KeyError::EmptySecret);
                }
                (Algorithm::HS256, DecodingKey::from_secret(secret))
            }
            VerificationKey::RsaPublicPem(pem) => (
                Algorithm::RS256,
                DecodingKey::from_rsa_pem(pem).map_err(KeyError::InvalidRsaKey)?,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_secs;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data =
            decode::<TokenClaims>(token, &self.key, &self.validation).map_err(|err| {
                tracing::debug!(error = %err, "token rejected");
                rejection(err.kind())
            })?;

        let TokenClaims {
            sub,
            permissions,
            scope,
        } = data.claims;

        match (permissions, scope) {
            (Some(permissions), _) => Ok(Claims::new(sub, permissions)),
            (None, Some(scope)) => Ok(Claims::new(
                sub,
                scope.split_whitespace().map(str::to_owned),
            )),
            (None, None) => Err(AuthError::MissingPermissions),
        }
    }
}

fn rejection(kind: &ErrorKind) -> AuthError {
    let (rejection, reason) = match kind {
        ErrorKind::ExpiredSignature => (TokenRejection::Expired, "Token expired."),
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => (
            TokenRejection::InvalidClaims,
            "Incorrect claims. Please, check the audience and issuer.",
        ),
        _ => (
            TokenRejection::Invalid,
            "Unable to parse authentication token.",
        ),
    };
    AuthError::InvalidToken {
        rejection,
        reason: reason.to_string(),
    }
}
