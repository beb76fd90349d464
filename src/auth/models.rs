// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User database model
///
/// `password_hash` and `token_version` never leave the auth module;
/// everything client-facing goes through [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub email_verified: bool,
    pub token_version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom = "crate::validation::validate_password_complexity")]
    pub password: String,
    #[validate(custom = "crate::validation::validate_trimmed_name")]
    pub name: String,
    pub phone: Option<String>,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Token refresh request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Distinguishes an omitted JSON field (None) from an explicit null
/// (Some(None)); an omitted field leaves the column unchanged, an explicit
/// null clears it.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Profile update request DTO; all fields optional, partial update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(custom = "crate::validation::validate_trimmed_name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
}

/// Password change request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(custom = "crate::validation::validate_password_complexity")]
    pub new_password: String,
}

/// Token verification request DTO; the token may also arrive as a bearer header
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

/// Authentication response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of verifying an access token, derived purely from its claims
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenVerification {
    pub valid: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_omitted() {
        let omitted: UpdateProfileRequest = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(omitted.phone, None);

        let cleared: UpdateProfileRequest =
            serde_json::from_str(r#"{"phone":null}"#).unwrap();
        assert_eq!(cleared.phone, Some(None));

        let set: UpdateProfileRequest =
            serde_json::from_str(r#"{"phone":"+15551234567"}"#).unwrap();
        assert_eq!(set.phone, Some(Some("+15551234567".to_string())));
    }

    #[test]
    fn test_one_char_name_fails_validation() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_user_response_has_no_digest() {
        let user = User {
            id: 1,
            email: "a@b.com".to_string(),
            name: "Alice".to_string(),
            phone: None,
            password_hash: "secret-digest".to_string(),
            email_verified: false,
            token_version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let body = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(body.get("password_hash").is_none());
        assert!(body.get("token_version").is_none());
        assert_eq!(body["email"], "a@b.com");
    }
}
