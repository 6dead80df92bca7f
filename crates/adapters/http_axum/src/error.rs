//! HTTP error response mapping.
//!
//! Every failure leaves the service through [`ApiError`], which renders the
//! uniform envelope:
//!
//! ```json
//! {"success": false, "error": 404, "message": "Not Found", "description": "..."}
//! ```
//!
//! Authorization failures additionally carry a machine-readable `code`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use casting_domain::auth::AuthError;
use casting_domain::error::{CastingError, PersistenceFault};

const INTERNAL_DESCRIPTION: &str = "The server encountered an internal error.";
const REJECTED_DESCRIPTION: &str = "The request could not be stored.";

/// JSON error body returned by every endpoint.
#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: u16,
    message: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

/// A failure translated to a status code and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    description: String,
    code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            description: description.into(),
            code: None,
        }
    }

    /// The 405 answer for a known path under an unsupported method.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            "The method is not allowed for the requested URL.",
        )
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Category text for the status, e.g. `"Unprocessable Entity"`.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown Error")
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        self.code
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingHeader | AuthError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
        AuthError::MalformedHeader(_) | AuthError::MissingPermissions => StatusCode::BAD_REQUEST,
        AuthError::InsufficientScope { .. } => StatusCode::FORBIDDEN,
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self {
            status: auth_status(&err),
            description: err.to_string(),
            code: Some(err.code()),
        }
    }
}

impl From<CastingError> for ApiError {
    fn from(err: CastingError) -> Self {
        match err {
            CastingError::Auth(err) => err.into(),
            CastingError::Validation(err) => {
                let status = if err.is_range_violation() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else {
                    StatusCode::BAD_REQUEST
                };
                Self::new(status, err.to_string())
            }
            CastingError::NotFound(err) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            CastingError::Persistence(err) => match err.fault {
                PersistenceFault::Rejected => {
                    tracing::warn!(error = %err.source, "store rejected write");
                    Self::new(StatusCode::BAD_REQUEST, REJECTED_DESCRIPTION)
                }
                PersistenceFault::Internal => {
                    tracing::error!(error = %err.source, "persistence error");
                    Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DESCRIPTION)
                }
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.status.as_u16(),
            message: self.message(),
            description: &self.description,
            code: self.code,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casting_domain::auth::{Permission, TokenRejection};
    use casting_domain::error::{NotFoundError, PersistenceError};
    use casting_domain::validation::ValidationError;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn should_map_auth_errors_to_their_status() {
        let cases = [
            (AuthError::MissingHeader, StatusCode::UNAUTHORIZED),
            (AuthError::MalformedHeader("Token not found."), StatusCode::BAD_REQUEST),
            (
                AuthError::InvalidToken {
                    rejection: TokenRejection::Expired,
                    reason: "Token expired.".to_string(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::MissingPermissions, StatusCode::BAD_REQUEST),
            (
                AuthError::InsufficientScope {
                    required: Permission::from("post:actors"),
                },
                StatusCode::FORBIDDEN,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn should_split_validation_errors_between_400_and_422() {
        let type_error: ApiError = CastingError::from(ValidationError::TypeMismatch {
            field: "age",
            expected: "an integer",
        })
        .into();
        assert_eq!(type_error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(type_error.message(), "Bad Request");

        let range_error: ApiError = CastingError::from(ValidationError::OutOfRange {
            field: "age",
            reason: "must be greater than 0",
        })
        .into();
        assert_eq!(range_error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(range_error.message(), "Unprocessable Entity");
    }

    #[test]
    fn should_hide_persistence_detail() {
        let internal: ApiError =
            CastingError::from(PersistenceError::internal(std::io::Error::other("secret dsn")))
                .into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!internal.description().contains("secret"));

        let rejected: ApiError =
            CastingError::from(PersistenceError::rejected(std::io::Error::other("CHECK failed")))
                .into();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_render_envelope_without_code_for_non_auth_errors() {
        let err: ApiError = CastingError::from(NotFoundError {
            entity: "Movie",
            id: "4".to_string(),
        })
        .into();

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": 404,
                "message": "Not Found",
                "description": "Movie with id 4 not found",
            })
        );
    }

    #[tokio::test]
    async fn should_render_code_for_auth_errors() {
        let (status, body) = render(AuthError::MissingHeader.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized");
        assert_eq!(body["code"], "authorization_header_missing");
        assert_eq!(body["success"], false);
    }
}
