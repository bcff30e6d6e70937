use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{user, word};
use crate::entity::word::WordStatus;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::{
    Contributions, ProfileResponse, StatsResponse, UpdateProfileRequest, UpdateRoleRequest,
    UserSummary, validate_update_profile,
};
use crate::permissions::{self, Action, Role};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    operation_id = "getProfile",
    summary = "Get the caller's profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let model = find_user(&state.db, auth_user.user_id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/api/users/profile",
    tag = "Users",
    operation_id = "updateProfile",
    summary = "Update the caller's display name",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn update_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    validate_update_profile(&payload)?;

    let existing = find_user(&state.db, auth_user.user_id).await?;
    let mut active: user::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users with contribution counters",
    description = "Admin dashboard contributor listing. Requires the view-analytics permission.",
    responses(
        (status = 200, description = "Users with counters", body = Vec<UserSummary>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    auth_user.require(Action::ViewAnalytics)?;

    let rows = user::Entity::find()
        .order_by_desc(user::Column::WordsCreated)
        .order_by_asc(user::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(UserSummary::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/api/users",
    tag = "Users",
    operation_id = "updateUserRole",
    summary = "Change a user's role",
    description = "Requires the manage-users permission. An actor may not grant a role exceeding their own; only a superadmin may grant admin or superadmin.",
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSummary),
        (status = 400, description = "Unknown role (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Role ceiling exceeded (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Target user not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(target = %payload.user_id))]
pub async fn update_role(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> Result<Json<UserSummary>, AppError> {
    auth_user.require(Action::ManageUsers)?;

    let target_role = Role::parse(&payload.role)
        .ok_or_else(|| AppError::Validation(format!("Unknown role '{}'", payload.role)))?;

    let existing = find_user(&state.db, payload.user_id).await?;
    let current_role = Role::parse(&existing.role).unwrap_or(Role::User);

    if !permissions::can_assign(auth_user.role, current_role, target_role) {
        return Err(AppError::PermissionDenied);
    }
    let mut active: user::ActiveModel = existing.into();
    let now = chrono::Utc::now();
    active.role = Set(target_role.as_str().to_string());
    active.assigned_by = Set(Some(auth_user.user_id));
    active.assigned_at = Set(Some(now));
    active.updated_at = Set(now);

    let model = active.update(&state.db).await?;
    Ok(Json(UserSummary::from(model)))
}

#[utoipa::path(
    get,
    path = "/api/users/stats",
    tag = "Users",
    operation_id = "dashboardStats",
    summary = "Dashboard aggregate counts",
    responses(
        (status = 200, description = "Totals and the caller's own counters", body = StatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    auth_user.require(Action::ViewAnalytics)?;

    let total_words = word::Entity::find().count(&state.db).await?;
    let total_users = user::Entity::find().count(&state.db).await?;
    let pending_approvals = word::Entity::find()
        .filter(word::Column::Status.eq(WordStatus::Pending.as_str()))
        .count(&state.db)
        .await?;

    let me = find_user(&state.db, auth_user.user_id).await?;

    Ok(Json(StatsResponse {
        total_words,
        total_users,
        pending_approvals,
        contributions: Contributions {
            words_created: me.words_created,
            words_edited: me.words_edited,
            words_deleted: me.words_deleted,
            last_contribution: me.last_contribution,
        },
    }))
}

async fn find_user<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
