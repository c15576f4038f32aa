//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{
        LoginRequest, LoginResponse, PasswordResetConfirm, PasswordResetRequest, UserInfo,
    },
};

use super::AuthenticatedUser;

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(response))
}

/// Close the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.auth.logout(&claims).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get current user information
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserInfo>> {
    let user = state.services.auth.me(&claims).await?;
    Ok(Json(user))
}

/// Ask for a password reset link by email
#[utoipa::path(
    post,
    path = "/auth/password-reset",
    tag = "auth",
    request_body = PasswordResetRequest,
    responses(
        (status = 202, description = "Link sent if the address is known"),
        (status = 400, description = "Invalid email")
    )
)]
pub async fn request_password_reset(
    State(state): State<crate::AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> AppResult<StatusCode> {
    request.validate()?;
    state
        .services
        .auth
        .request_password_reset(&request.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/auth/password-reset/confirm",
    tag = "auth",
    request_body = PasswordResetConfirm,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid or expired token, or weak password")
    )
)]
pub async fn confirm_password_reset(
    State(state): State<crate::AppState>,
    Json(request): Json<PasswordResetConfirm>,
) -> AppResult<StatusCode> {
    request.validate()?;
    state
        .services
        .auth
        .confirm_password_reset(&request.token, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
