// HTTP handlers for authentication endpoints
// Each handler: rate limit (credential endpoints) -> validate -> service -> envelope

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        AuthResponse, ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest,
        TokenVerification, UpdateProfileRequest, UserResponse, VerifyRequest,
    },
};
use crate::response::ApiResponse;
use crate::AppState;

/// Client key for attempt limiting: first X-Forwarded-For hop when present
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn check_rate_limit(state: &AppState, headers: &HeaderMap) -> Result<(), AuthError> {
    let key = client_key(headers);
    if state.limiter.check(&key) {
        Ok(())
    } else {
        Err(AuthError::RateLimited)
    }
}

/// Register a new account
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered, token pair issued", body = AuthResponse),
        (status = 400, description = "Invalid input data"),
        (status = 409, description = "Email already exists"),
        (status = 429, description = "Too many attempts"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AuthError> {
    check_rate_limit(&state, &headers)?;
    request.validate()?;

    tracing::debug!("Registering account for {}", request.email);
    let response = state.auth.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data_with_message(
            response,
            "Account registered successfully",
        )),
    ))
}

/// Log in with email and password
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted, token pair issued", body = AuthResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Invalid email or password"),
        (status = 429, description = "Too many attempts"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AuthError> {
    check_rate_limit(&state, &headers)?;
    request.validate()?;

    let response = state.auth.login(request).await?;
    Ok(Json(ApiResponse::data_with_message(response, "Login successful")))
}

/// Exchange a refresh token for a new token pair
/// POST /auth/refresh
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = AuthResponse),
        (status = 401, description = "Refresh token missing or expired"),
        (status = 403, description = "Refresh token invalid or superseded"),
        (status = 404, description = "Account no longer exists"),
        (status = 429, description = "Too many attempts"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<ApiResponse<AuthResponse>>, AuthError> {
    check_rate_limit(&state, &headers)?;

    // A request without a refresh token is unauthenticated, not malformed
    let refresh_token = body
        .map(|Json(request)| request.refresh_token)
        .ok_or(AuthError::MissingToken)?;

    let response = state.auth.refresh(&refresh_token).await?;
    Ok(Json(ApiResponse::data_with_message(response, "Tokens refreshed")))
}

/// Acknowledge a logout (stateless, idempotent)
/// POST /auth/logout
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout acknowledged"),
        (status = 401, description = "Missing or expired token"),
        (status = 403, description = "Invalid token")
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<ApiResponse<()>> {
    state.auth.logout(user.user_id);
    Json(ApiResponse::message("Logged out successfully"))
}

/// Fetch the authenticated account's profile
/// GET /auth/profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Account profile", body = UserResponse),
        (status = 401, description = "Missing or expired token"),
        (status = 403, description = "Invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "auth"
)]
pub async fn profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<UserResponse>>, AuthError> {
    let profile = state.auth.get_profile(user.user_id).await?;
    Ok(Json(ApiResponse::data(profile)))
}

/// Partially update the authenticated account's name and phone
/// PUT /auth/update-profile
#[utoipa::path(
    put,
    path = "/auth/update-profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account profile", body = UserResponse),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or expired token"),
        (status = 403, description = "Invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "auth"
)]
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AuthError> {
    request.validate()?;

    let profile = state.auth.update_profile(user.user_id, request).await?;
    Ok(Json(ApiResponse::data_with_message(profile, "Profile updated")))
}

/// Change the authenticated account's password
/// PUT /auth/change-password
#[utoipa::path(
    put,
    path = "/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "New password rejected"),
        (status = 401, description = "Current password incorrect, or missing/expired token"),
        (status = 403, description = "Invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    tag = "auth"
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AuthError> {
    request.validate()?;

    state.auth.change_password(user.user_id, request).await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

/// Report an access token's validity window
/// POST /auth/verify — token from the bearer header or the request body
#[utoipa::path(
    post,
    path = "/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Token is valid", body = TokenVerification),
        (status = 401, description = "Token missing or expired"),
        (status = 403, description = "Invalid token")
    ),
    tag = "auth"
)]
pub async fn verify_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<VerifyRequest>>,
) -> Result<Json<ApiResponse<TokenVerification>>, AuthError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer
        .or_else(|| body.and_then(|Json(request)| request.token))
        .ok_or(AuthError::MissingToken)?;

    let verification = state.auth.verify_token(&token)?;
    Ok(Json(ApiResponse::data(verification)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_key_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers), "203.0.113.7");
    }

    #[test]
    fn test_client_key_falls_back_without_header() {
        assert_eq!(client_key(&HeaderMap::new()), "unknown");
    }
}
