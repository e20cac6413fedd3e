//! Registration, login and password-reset handlers

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::state::AppState;
use crate::api::types::{ApiJson, ApiResponse, ApiResult, created, ok_message, ok_with};
use crate::auth::{AuthSession, Registration};

/// User Registration Request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[schema(example = "Ada")]
    pub firstname: String,
    #[schema(example = "Obi")]
    pub lastname: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "secret123")]
    pub password: String,
    #[schema(example = "08031234567")]
    pub phone: String,
    #[schema(example = "1990-01-01")]
    pub dob: Option<String>,
    #[schema(example = "Female")]
    pub gender: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Registration {
            firstname: r.firstname,
            lastname: r.lastname,
            email: r.email,
            password: r.password,
            phone: r.phone,
            dob: r.dob,
            gender: r.gender,
        }
    }
}

/// User Login Request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Email address or phone number
    #[schema(example = "ada@example.com")]
    pub identifier: String,
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    #[schema(example = "ada@example.com")]
    pub identifier: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct VerifyCodeRequest {
    #[schema(example = "ada@example.com")]
    pub identifier: String,
    #[schema(example = "482913")]
    pub code: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[schema(example = "ada@example.com")]
    pub identifier: String,
    #[schema(example = "482913")]
    pub code: String,
    #[schema(example = "newsecret123")]
    pub new_password: String,
}

/// Register a new user
///
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<AuthSession>),
        (status = 400, description = "Missing fields or email/phone already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<AuthSession> {
    let session = state.auth.register(req.into()).await?;
    created("User registered successfully", session)
}

/// Login with email or phone
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthSession>),
        (status = 400, description = "User not found or invalid password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<AuthSession> {
    let session = state.auth.login(&req.identifier, &req.password).await?;
    ok_with("Login successful", session)
}

/// Issue a password reset code
///
/// POST /auth/forgot-password
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset code issued"),
        (status = 400, description = "Missing identifier"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<()> {
    let emailed = state.auth.forgot_password(&req.identifier).await?;
    ok_message(if emailed {
        "Reset code sent to your email."
    } else {
        "Reset code sent successfully."
    })
}

/// Check a reset code without consuming it
///
/// POST /auth/verify-code
#[utoipa::path(
    post,
    path = "/auth/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Code verified"),
        (status = 400, description = "Invalid or expired code"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VerifyCodeRequest>,
) -> ApiResult<()> {
    state.auth.verify_code(&req.identifier, &req.code).await?;
    ok_message("Code verified successfully")
}

/// Set a new password using a reset code
///
/// POST /auth/reset-password
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Invalid or expired code, or weak password"),
        (status = 404, description = "User not found")
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    state
        .auth
        .reset_password(&req.identifier, &req.code, &req.new_password)
        .await?;
    ok_message("Password reset successful")
}
