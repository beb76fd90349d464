// JWT token generation and validation service
// Access and refresh tokens are signed with distinct secrets

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// Issuer tag embedded in and required of every token
pub const ISSUER: &str = "planner-api";
/// Audience tag embedded in and required of every token
pub const AUDIENCE: &str = "planner-app";

const ACCESS_TOKEN_DURATION: i64 = 900; // 15 minutes
const REFRESH_TOKEN_DURATION: i64 = 604_800; // 7 days

/// Claims carried by an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i32, // user id
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Claims carried by a refresh token; `token_version` must match the
/// account's stored version to be accepted
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i32,
    pub token_version: i32,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Token service for JWT operations
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a new TokenService from the two signing secrets
    ///
    /// Expiry is exact: no leeway window is applied during validation.
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Generate an access token (15 minutes)
    pub fn generate_access_token(
        &self,
        user_id: i32,
        email: &str,
        name: &str,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id,
            email: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + ACCESS_TOKEN_DURATION,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Generate a refresh token (7 days) carrying the account's token version
    pub fn generate_refresh_token(
        &self,
        user_id: i32,
        token_version: i32,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: user_id,
            token_version,
            iat: now,
            exp: now + REFRESH_TOKEN_DURATION,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Generate both access and refresh tokens for an account
    pub fn generate_token_pair(
        &self,
        user_id: i32,
        email: &str,
        name: &str,
        token_version: i32,
    ) -> Result<(String, String), AuthError> {
        let access_token = self.generate_access_token(user_id, email, name)?;
        let refresh_token = self.generate_refresh_token(user_id, token_version)?;
        Ok((access_token, refresh_token))
    }

    /// Validate an access token: signature, expiry, issuer and audience
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, AuthError> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }

    /// Validate a refresh token: signature, expiry, issuer and audience
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(map_jwt_error)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    }
}
