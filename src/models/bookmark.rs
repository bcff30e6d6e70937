use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

use super::word::WordResponse;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BookmarkRequest {
    pub word_id: Uuid,
}

/// Body of `POST /bookmarks/sync`: word ids held client-side before the
/// session became authenticated, to be reconciled into durable bookmarks.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SyncBookmarksRequest {
    pub word_ids: Vec<Uuid>,
}

pub const MAX_SYNC_IDS: usize = 500;

pub fn validate_sync_request(payload: &SyncBookmarksRequest) -> Result<(), AppError> {
    if payload.word_ids.is_empty() {
        return Err(AppError::Validation("word_ids must not be empty".into()));
    }
    if payload.word_ids.len() > MAX_SYNC_IDS {
        return Err(AppError::Validation(format!(
            "At most {MAX_SYNC_IDS} ids per sync"
        )));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BookmarkListResponse {
    pub results: Vec<WordResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SyncBookmarksResponse {
    /// Newly created bookmarks.
    pub added: usize,
    /// Ids that were already bookmarked.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_request_bounds() {
        let empty = SyncBookmarksRequest { word_ids: vec![] };
        assert!(validate_sync_request(&empty).is_err());

        let ok = SyncBookmarksRequest {
            word_ids: vec![Uuid::new_v4()],
        };
        assert!(validate_sync_request(&ok).is_ok());

        let too_many = SyncBookmarksRequest {
            word_ids: (0..=MAX_SYNC_IDS).map(|_| Uuid::new_v4()).collect(),
        };
        assert!(validate_sync_request(&too_many).is_err());
    }
}
