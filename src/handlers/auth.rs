use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
    validate_login_request, validate_register_request,
};
use crate::models::user::permission_tokens;
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new account",
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let email = payload.email.trim().to_lowercase();

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let now = chrono::Utc::now();
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        name: Set(payload.name.trim().to_string()),
        password: Set(Some(hash)),
        image: Set(None),
        role: Set(user::DEFAULT_ROLE.to_string()),
        permissions: Set(serde_json::json!([])),
        words_created: Set(0),
        words_edited: Set(0),
        words_deleted: Set(0),
        last_contribution: Set(None),
        assigned_by: Set(None),
        assigned_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let user = new_user.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Registration race: unique constraint caught on insert");
            AppError::EmailTaken
        }
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in with email and password",
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Bad credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let email = payload.email.trim().to_lowercase();

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // Federated accounts have no local password and cannot log in here.
    let stored = user.password.as_deref().ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, stored)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let permissions = permission_tokens(&user.permissions);

    let token = jwt::sign(
        user.id,
        &user.email,
        &user.name,
        &user.role,
        permissions.clone(),
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        name: user.name,
        email: user.email,
        role: user.role,
        permissions,
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Return the current token identity",
    responses(
        (status = 200, description = "Token identity", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.user_id,
        name: auth_user.name,
        email: auth_user.email,
        role: auth_user.role.as_str().to_string(),
        permissions: auth_user.permissions,
    })
}
