// Authentication service - business logic layer
// One method per use-case; transport concerns stay in the handlers

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::{ValidationError, ValidationErrors};

use crate::auth::{
    error::AuthError,
    models::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, TokenVerification,
        UpdateProfileRequest, User, UserResponse,
    },
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};

/// Authentication service coordinating hasher, token service and account store
pub struct AuthService {
    users: UserRepository,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(users: UserRepository, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    fn auth_response(&self, user: User) -> Result<AuthResponse, AuthError> {
        let (access_token, refresh_token) =
            self.tokens
                .generate_token_pair(user.id, &user.email, &user.name, user.token_version)?;
        Ok(AuthResponse {
            user: user.into(),
            access_token,
            refresh_token,
        })
    }

    /// Register a new account and issue its first token pair
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        // Pre-check gives fast feedback; the unique constraint on email
        // closes the race when two registrations slip past it together
        if self.users.email_exists(&request.email).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .users
            .create_user(
                &request.email,
                request.name.trim(),
                request.phone.as_deref(),
                &password_hash,
            )
            .await?;

        info!("Registered account {}", user.id);
        self.auth_response(user)
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password fail identically so responses cannot
    /// be used to enumerate accounts.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Login for account {}", user.id);
        self.auth_response(user)
    }

    /// Exchange a refresh token for a new token pair, rotating the version
    ///
    /// Only a refresh token carrying the account's current version is
    /// accepted; the version is then incremented, so a replayed token fails
    /// on its next presentation.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.tokens.validate_refresh_token(refresh_token)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if claims.token_version != user.token_version {
            warn!("Stale refresh token presented for account {}", user.id);
            return Err(AuthError::InvalidToken);
        }

        let new_version = self.users.bump_token_version(user.id).await?;
        let access_token = self
            .tokens
            .generate_access_token(user.id, &user.email, &user.name)?;
        let new_refresh_token = self.tokens.generate_refresh_token(user.id, new_version)?;

        debug!("Rotated refresh token for account {}", user.id);
        Ok(AuthResponse {
            user: user.into(),
            access_token,
            refresh_token: new_refresh_token,
        })
    }

    /// Acknowledge a logout
    ///
    /// Access tokens are stateless and expire on their own; there is no
    /// server-side session to tear down, which also makes logout idempotent.
    pub fn logout(&self, user_id: i32) {
        info!("Logout for account {}", user_id);
    }

    /// Fetch the account behind an authenticated identity
    pub async fn get_profile(&self, user_id: i32) -> Result<UserResponse, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        Ok(user.into())
    }

    /// Partially update name and phone
    ///
    /// Omitted fields keep their stored values; an explicit `phone: null`
    /// clears the column.
    pub async fn update_profile(
        &self,
        user_id: i32,
        request: UpdateProfileRequest,
    ) -> Result<UserResponse, AuthError> {
        let existing = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.name);
        let phone = match &request.phone {
            None => existing.phone.as_deref(),
            Some(None) => None,
            Some(Some(phone)) => Some(phone.as_str()),
        };

        let updated = self
            .users
            .update_profile(user_id, name, phone)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        debug!("Updated profile for account {}", user_id);
        Ok(updated.into())
    }

    /// Replace the account's password after verifying the current one
    ///
    /// Every rejection happens before the stored digest is touched.
    pub async fn change_password(
        &self,
        user_id: i32,
        request: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        if request.new_password == request.current_password {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("password_unchanged");
            err.message = Some("New password must differ from the current password".into());
            errors.add("new_password", err);
            return Err(AuthError::ValidationError(errors));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !PasswordService::verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::WrongPassword);
        }

        let password_hash = PasswordService::hash_password(&request.new_password)?;
        self.users.update_password(user.id, &password_hash).await?;

        info!("Password changed for account {}", user.id);
        Ok(())
    }

    /// Report the validity window of an access token from its claims alone
    pub fn verify_token(&self, token: &str) -> Result<TokenVerification, AuthError> {
        let claims = self.tokens.validate_access_token(token)?;

        let issued_at =
            DateTime::<Utc>::from_timestamp(claims.iat, 0).ok_or(AuthError::InvalidToken)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(AuthError::InvalidToken)?;

        Ok(TokenVerification {
            valid: true,
            issued_at,
            expires_at,
        })
    }
}
