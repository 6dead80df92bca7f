//! JWT adapter for the token verifier port.
//!
//! Verifies `HS256` or `RS256` bearer tokens with `jsonwebtoken` and turns
//! their permission claims into domain [`Claims`](casting_domain::auth::Claims).

mod error;
mod verifier;

pub use error::KeyError;
pub use verifier::{JwtConfig, JwtVerifier, VerificationKey};
