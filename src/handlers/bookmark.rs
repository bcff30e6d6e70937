use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{bookmark, word};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::bookmark::{
    BookmarkListResponse, BookmarkRequest, SyncBookmarksRequest, SyncBookmarksResponse,
    validate_sync_request,
};
use crate::models::word::{MessageResponse, WordResponse};
use crate::query;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/bookmarks",
    tag = "Bookmarks",
    operation_id = "listBookmarks",
    summary = "List the caller's bookmarked entries",
    responses(
        (status = 200, description = "Bookmarked entries, headword order", body = BookmarkListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_bookmarks(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<BookmarkListResponse>, AppError> {
    let word_ids: Vec<Uuid> = bookmark::Entity::find()
        .filter(bookmark::Column::UserId.eq(auth_user.user_id))
        .select_only()
        .column(bookmark::Column::WordId)
        .into_tuple::<Uuid>()
        .all(&state.db)
        .await?;

    if word_ids.is_empty() {
        return Ok(Json(BookmarkListResponse { results: vec![] }));
    }

    // Same visibility rules as search: a bookmarked entry that has since
    // been unpublished disappears from the listing for non-elevated callers.
    let filter = query::word_filter(None, &word_ids, None, Some(auth_user.role))?;
    let rows = query::ordered(word::Entity::find().filter(filter))
        .all(&state.db)
        .await?;

    Ok(Json(BookmarkListResponse {
        results: rows.into_iter().map(WordResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/bookmarks/add",
    tag = "Bookmarks",
    operation_id = "addBookmark",
    summary = "Bookmark an entry",
    description = "Idempotent: bookmarking an already-bookmarked entry reports a benign duplicate, not an error.",
    request_body = BookmarkRequest,
    responses(
        (status = 200, description = "Bookmark added (or already present)", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Entry not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn add_bookmark(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BookmarkRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    word::Entity::find_by_id(payload.word_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Word not found".into()))?;

    let message = if insert_bookmark(&state.db, auth_user.user_id, payload.word_id).await? {
        "Bookmark added"
    } else {
        "Bookmark already exists"
    };

    Ok(Json(MessageResponse {
        message: message.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/bookmarks/remove",
    tag = "Bookmarks",
    operation_id = "removeBookmark",
    summary = "Remove a bookmark",
    description = "Idempotent: removing an absent bookmark succeeds.",
    request_body = BookmarkRequest,
    responses(
        (status = 200, description = "Bookmark removed", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn remove_bookmark(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<BookmarkRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    bookmark::Entity::delete_by_id((auth_user.user_id, payload.word_id))
        .exec(&state.db)
        .await?;

    Ok(Json(MessageResponse {
        message: "Bookmark removed".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/bookmarks/sync",
    tag = "Bookmarks",
    operation_id = "syncBookmarks",
    summary = "Reconcile locally held bookmarks into the durable set",
    description = "Called once after an anonymous session signs in: every locally held word id is added idempotently; ids already bookmarked (or unknown) are skipped.",
    request_body = SyncBookmarksRequest,
    responses(
        (status = 200, description = "Reconciliation summary", body = SyncBookmarksResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn sync_bookmarks(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SyncBookmarksRequest>,
) -> Result<Json<SyncBookmarksResponse>, AppError> {
    validate_sync_request(&payload)?;

    // Ids that don't resolve to an entry are dropped silently; the local
    // set may reference entries deleted since it was built.
    let known: Vec<Uuid> = word::Entity::find()
        .filter(word::Column::Id.is_in(payload.word_ids.clone()))
        .select_only()
        .column(word::Column::Id)
        .into_tuple::<Uuid>()
        .all(&state.db)
        .await?;

    let mut added = 0usize;
    let mut skipped = payload.word_ids.len() - known.len();

    for word_id in known {
        if insert_bookmark(&state.db, auth_user.user_id, word_id).await? {
            added += 1;
        } else {
            skipped += 1;
        }
    }

    Ok(Json(SyncBookmarksResponse { added, skipped }))
}

/// Insert a bookmark; `Ok(false)` when the pair already exists.
async fn insert_bookmark<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    word_id: Uuid,
) -> Result<bool, AppError> {
    let model = bookmark::ActiveModel {
        user_id: Set(user_id),
        word_id: Set(word_id),
        created_at: Set(chrono::Utc::now()),
    };

    match bookmark::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::columns([
                bookmark::Column::UserId,
                bookmark::Column::WordId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await
    {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e.into()),
    }
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

    fn test_user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "sita@example.com".into(),
            name: "Sita".into(),
            role,
            permissions: vec![],
        }
    }

    fn approved_word(id: Uuid) -> word::Model {
        let now = chrono::Utc::now();
        word::Model {
            id,
            word: "घर".into(),
            romanized: Some("ghar".into()),
            phonetic: None,
            english: Some("house".into()),
            definitions: serde_json::json!([]),
            status: "approved".into(),
            created_by: None,
            updated_by: None,
            approved_by: None,
            approved_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_add_reports_existing_without_inserting() {
        let word_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![approved_word(word_id)],
                vec![approved_word(word_id)],
            ])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let state = test_state(db);

        let first = add_bookmark(
            test_user(Role::User),
            State(state.clone()),
            AppJson(BookmarkRequest { word_id }),
        )
        .await
        .unwrap();
        assert_eq!(first.0.message, "Bookmark added");

        let second = add_bookmark(
            test_user(Role::User),
            State(state),
            AppJson(BookmarkRequest { word_id }),
        )
        .await
        .unwrap();
        assert_eq!(second.0.message, "Bookmark already exists");
    }

    #[tokio::test]
    async fn add_requires_an_existing_word() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<word::Model, _, _>([vec![]])
            .into_connection();

        let result = add_bookmark(
            test_user(Role::User),
            State(test_state(db)),
            AppJson(BookmarkRequest {
                word_id: Uuid::new_v4(),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
