/// Failure to build a verifier from the configured key material.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("shared secret must not be empty")]
    EmptySecret,
    #[error("invalid RSA public key: {0}")]
    InvalidRsaKey(#[source] jsonwebtoken::errors::Error),
}
