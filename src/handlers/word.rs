use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rand::Rng;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::contributions::{self, Contribution};
use crate::entity::word::{self, WordStatus};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::json::AppJson;
use crate::models::word::*;
use crate::permissions::{self, Action};
use crate::query::{self, PageWindow};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/words",
    tag = "Words",
    operation_id = "searchWords",
    summary = "Search entries with pagination",
    description = "Searches by prefix across word/romanized/english, or fetches an explicit id set. Anonymous and user-role callers only ever see approved entries; elevated roles may filter by status.",
    request_body = SearchWordsRequest,
    responses(
        (status = 200, description = "Page of matching entries", body = SearchWordsResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer, payload))]
pub async fn search_words(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SearchWordsRequest>,
) -> Result<Json<SearchWordsResponse>, AppError> {
    let window = PageWindow::new(payload.page, payload.limit);
    let ids = payload.ids.unwrap_or_default();
    let filter = query::word_filter(
        payload.search.as_deref(),
        &ids,
        payload.status.as_deref(),
        viewer.role(),
    )?;

    let select = word::Entity::find().filter(filter);

    let total = select
        .clone()
        .paginate(&state.db, window.limit)
        .num_items()
        .await?;

    let rows = query::ordered(select)
        .offset(Some(window.offset()))
        .limit(Some(window.limit))
        .all(&state.db)
        .await?;

    Ok(Json(SearchWordsResponse {
        results: rows.into_iter().map(WordResponse::from).collect(),
        total,
        page: window.page,
        limit: window.limit,
        pages: window.pages(total),
    }))
}

/// Suggestion list size bounds.
const SUGGESTIONS_DEFAULT: i64 = 8;
const SUGGESTIONS_MAX: i64 = 50;

#[utoipa::path(
    get,
    path = "/api/words/suggestions",
    tag = "Words",
    operation_id = "wordSuggestions",
    summary = "Typeahead suggestions",
    params(SuggestionsQuery),
    responses(
        (status = 200, description = "Matching approved entries", body = Vec<WordResponse>),
        (status = 400, description = "Missing or blank query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, params))]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionsQuery>,
) -> Result<Json<Vec<WordResponse>>, AppError> {
    let term = params.q.as_deref().map(str::trim).unwrap_or("");
    if term.is_empty() {
        return Err(AppError::Validation("Query parameter 'q' is required".into()));
    }
    let limit = params
        .limit
        .unwrap_or(SUGGESTIONS_DEFAULT)
        .clamp(1, SUGGESTIONS_MAX) as u64;

    // Suggestions are public: always restricted to approved entries.
    let filter = query::word_filter(Some(term), &[], None, None)?;

    let rows = query::ordered(word::Entity::find().filter(filter))
        .limit(Some(limit))
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(WordResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/words/random",
    tag = "Words",
    operation_id = "randomWord",
    summary = "Fetch one random approved entry",
    responses(
        (status = 200, description = "Random entry, or null when the dictionary is empty", body = RandomWordResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn random_word(
    State(state): State<AppState>,
) -> Result<Json<RandomWordResponse>, AppError> {
    let approved = word::Entity::find()
        .filter(word::Column::Status.eq(WordStatus::Approved.as_str()));

    let count = approved.clone().count(&state.db).await?;
    if count == 0 {
        return Ok(Json(RandomWordResponse { word: None }));
    }

    let index = rand::rng().random_range(0..count);
    let row = query::ordered(approved)
        .offset(Some(index))
        .limit(Some(1))
        .one(&state.db)
        .await?;

    Ok(Json(RandomWordResponse {
        word: row.map(WordResponse::from),
    }))
}

#[utoipa::path(
    get,
    path = "/api/words/{id}",
    tag = "Words",
    operation_id = "getWord",
    summary = "Get an entry by id",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry details", body = WordResponse),
        (status = 404, description = "Entry not found, or not visible to this viewer (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, viewer), fields(id = %id))]
pub async fn get_word(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WordResponse>, AppError> {
    let model = find_word(&state.db, id).await?;

    // Unapproved entries are indistinguishable from absent ones for
    // non-elevated viewers.
    let elevated = viewer.role().is_some_and(|r| r.is_elevated());
    if !elevated && model.status != WordStatus::Approved.as_str() {
        return Err(AppError::NotFound("Word not found".into()));
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/api/word/create",
    tag = "Words",
    operation_id = "createWord",
    summary = "Create a new entry",
    description = "Requires create permission. Admin-authored entries are approved immediately; editor-authored entries await approval.",
    request_body = CreateWordRequest,
    responses(
        (status = 201, description = "Entry created", body = WordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(word = %payload.word))]
pub async fn create_word(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateWordRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require(Action::CreateWord)?;
    validate_create_word(&payload)?;

    let status = permissions::initial_status(auth_user.role);
    let now = chrono::Utc::now();
    let approved = status == WordStatus::Approved;

    let new_word = word::ActiveModel {
        id: Set(Uuid::new_v4()),
        word: Set(payload.word.trim().to_string()),
        romanized: Set(payload.romanized),
        phonetic: Set(payload.phonetic),
        english: Set(payload.english),
        definitions: Set(definitions_to_json(&payload.definitions)?),
        status: Set(status.as_str().to_string()),
        created_by: Set(Some(auth_user.user_id)),
        updated_by: Set(Some(auth_user.user_id)),
        approved_by: Set(approved.then_some(auth_user.user_id)),
        approved_at: Set(approved.then_some(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_word.insert(&state.db).await?;

    contributions::record(&state.db, auth_user.user_id, Contribution::Created).await;

    Ok((StatusCode::CREATED, Json(WordResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/api/word/update",
    tag = "Words",
    operation_id = "updateWord",
    summary = "Update an entry",
    description = "Partial update. Editors may only update entries they created; changing the status (approval) is admin/superadmin only.",
    params(WordIdQuery),
    request_body = UpdateWordRequest,
    responses(
        (status = 200, description = "Entry updated", body = WordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %params.id))]
pub async fn update_word(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WordIdQuery>,
    AppJson(payload): AppJson<UpdateWordRequest>,
) -> Result<Json<WordResponse>, AppError> {
    auth_user.require(Action::EditWord)?;
    validate_update_word(&payload)?;

    let existing = find_word(&state.db, params.id).await?;

    if !permissions::can_edit_entry(auth_user.role, auth_user.user_id, existing.created_by) {
        return Err(AppError::PermissionDenied);
    }
    if payload.status.is_some() {
        auth_user.require(Action::ApproveWord)?;
    }

    if payload == UpdateWordRequest::default() {
        return Ok(Json(existing.into()));
    }

    let created_by = existing.created_by;
    let mut active: word::ActiveModel = existing.into();

    if let Some(ref headword) = payload.word {
        active.word = Set(headword.trim().to_string());
    }
    if let Some(romanized) = payload.romanized {
        active.romanized = Set(romanized);
    }
    if let Some(phonetic) = payload.phonetic {
        active.phonetic = Set(phonetic);
    }
    if let Some(english) = payload.english {
        active.english = Set(english);
    }
    if let Some(ref defs) = payload.definitions {
        active.definitions = Set(definitions_to_json(defs)?);
    }

    let now = chrono::Utc::now();
    if let Some(ref status) = payload.status {
        let status = WordStatus::parse(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status '{status}'")))?;
        active.status = Set(status.as_str().to_string());
        if status == WordStatus::Approved {
            active.approved_by = Set(Some(auth_user.user_id));
            active.approved_at = Set(Some(now));
        }
    }
    active.updated_by = Set(Some(auth_user.user_id));
    active.updated_at = Set(now);

    let model = active.update(&state.db).await?;

    if contributions::edit_counts(auth_user.role, auth_user.user_id, created_by) {
        contributions::record(&state.db, auth_user.user_id, Contribution::Edited).await;
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/word/delete",
    tag = "Words",
    operation_id = "deleteWord",
    summary = "Delete an entry",
    params(WordIdQuery),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %params.id))]
pub async fn delete_word(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WordIdQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require(Action::DeleteWord)?;

    let existing = find_word(&state.db, params.id).await?;
    word::Entity::delete_by_id(existing.id).exec(&state.db).await?;

    contributions::record(&state.db, auth_user.user_id, Contribution::Deleted).await;

    Ok(Json(MessageResponse {
        message: "Word deleted successfully".into(),
    }))
}

async fn find_word<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<word::Model, AppError> {
    word::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Word not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
    use crate::permissions::Role;
    use std::sync::Arc;

    fn test_state(db: DatabaseConnection) -> AppState {
        AppState {
            db,
            config: Arc::new(AppConfig {
                server: ServerConfig {
                    host: "127.0.0.1".into(),
                    port: 0,
                    cors: CorsConfig {
                        allow_origins: vec![],
                        max_age: 0,
                    },
                },
                database: DatabaseConfig { url: String::new() },
                auth: AuthConfig {
                    jwt_secret: "test-secret".into(),
                    token_ttl_days: 7,
                },
                bootstrap: None,
            }),
        }
    }

    fn admin() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            name: "Admin".into(),
            role: Role::Admin,
            permissions: vec![],
        }
    }

    fn empty_word_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<word::Model, _, _>([vec![]])
            .into_connection()
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_not_found() {
        let result = delete_word(
            admin(),
            State(test_state(empty_word_db())),
            Query(WordIdQuery { id: Uuid::new_v4() }),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let result = update_word(
            admin(),
            State(test_state(empty_word_db())),
            Query(WordIdQuery { id: Uuid::new_v4() }),
            AppJson(UpdateWordRequest::default()),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
