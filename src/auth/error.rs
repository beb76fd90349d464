// Authentication error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::response::ApiResponse;

/// Error taxonomy for the authentication surface
///
/// Missing or expired credentials answer 401; a token that is present but
/// fails signature or claim checks answers 403. Store and signing failures
/// answer a generic 500 with the underlying cause logged server-side only.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Request validation failed")]
    ValidationError(validator::ValidationErrors),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Too many attempts, please try again later")]
    RateLimited,

    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(errors)
    }
}

/// Flatten validator output into {field: [messages]} for the envelope
fn validation_detail(errors: &validator::ValidationErrors) -> Value {
    let map: serde_json::Map<String, Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<Value> = errs
                .iter()
                .map(|e| {
                    Value::String(
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    )
                })
                .collect();
            (field.to_string(), Value::Array(messages))
        })
        .collect();
    Value::Object(map)
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::WrongPassword => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::FORBIDDEN,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code carried in the envelope's `error` field
    fn error_code(&self) -> &'static str {
        match self {
            AuthError::ValidationError(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::WrongPassword => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::ExpiredToken => "TOKEN_EXPIRED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::AccountNotFound => "NOT_FOUND",
            AuthError::EmailAlreadyExists => "CONFLICT",
            AuthError::RateLimited => "RATE_LIMITED",
            AuthError::PasswordHashError => "INTERNAL_ERROR",
            AuthError::TokenGenerationError(_) => "INTERNAL_ERROR",
            AuthError::DatabaseError(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-safe message; internal failures collapse to a generic one
    fn client_message(&self) -> String {
        match self {
            AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_)
            | AuthError::DatabaseError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
            }
            AuthError::InvalidCredentials | AuthError::WrongPassword => {
                warn!("Rejected credentials");
            }
            AuthError::MissingToken => {
                warn!("Missing token in request");
            }
            AuthError::ExpiredToken => {
                warn!("Expired token attempt");
            }
            AuthError::InvalidToken => {
                warn!("Invalid token attempt");
            }
            AuthError::AccountNotFound => {
                debug!("Account not found");
            }
            AuthError::EmailAlreadyExists => {
                warn!("Duplicate email registration attempt");
            }
            AuthError::RateLimited => {
                warn!("Rate limit exceeded");
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
            }
            AuthError::TokenGenerationError(msg) => {
                error!("Token generation error: {}", msg);
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
            }
        }

        let mut body = match &self {
            AuthError::ValidationError(errors) => {
                ApiResponse::failure_with_errors(self.client_message(), validation_detail(errors))
            }
            _ => ApiResponse::failure(self.client_message()),
        };
        body.error = Some(self.error_code().to_string());

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(custom = "crate::validation::validate_trimmed_name")]
        name: String,
    }

    #[test]
    fn test_status_codes_follow_the_contract() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::AccountNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AuthError::DatabaseError("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_never_reaches_the_client() {
        let err = AuthError::DatabaseError("connection refused at 10.0.0.5".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_validation_detail_names_the_field() {
        let errors = Probe { name: "A".to_string() }.validate().unwrap_err();
        let detail = validation_detail(&errors);
        assert!(detail.get("name").is_some());
    }

    #[test]
    fn test_expired_token_message_is_exact() {
        assert_eq!(AuthError::ExpiredToken.client_message(), "Token expired");
    }
}
