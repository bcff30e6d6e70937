use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::user;
use crate::error::AppError;

use super::shared::validate_name;

/// Contribution counters, nested back into one object on the wire.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Contributions {
    pub words_created: i64,
    pub words_edited: i64,
    pub words_deleted: i64,
    pub last_contribution: Option<DateTime<Utc>>,
}

/// Parse the explicit capability tokens stored on a user row.
pub fn permission_tokens(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// A user's own profile; never includes the password hash.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    #[schema(example = "editor")]
    pub role: String,
    pub permissions: Vec<String>,
    pub contributions: Contributions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for ProfileResponse {
    fn from(u: user::Model) -> Self {
        let permissions = permission_tokens(&u.permissions);
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            image: u.image,
            role: u.role,
            permissions,
            contributions: Contributions {
                words_created: u.words_created,
                words_edited: u.words_edited,
                words_deleted: u.words_deleted,
                last_contribution: u.last_contribution,
            },
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "Sita Sharma")]
    pub name: String,
}

pub fn validate_update_profile(payload: &UpdateProfileRequest) -> Result<(), AppError> {
    validate_name(&payload.name)
}

/// Body of `PATCH /users`: role assignment.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateRoleRequest {
    pub user_id: Uuid,
    #[schema(example = "editor")]
    pub role: String,
}

/// One row of the contributor listing on the admin dashboard.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[schema(example = "editor")]
    pub role: String,
    pub contributions: Contributions,
}

impl From<user::Model> for UserSummary {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            contributions: Contributions {
                words_created: u.words_created,
                words_edited: u.words_edited,
                words_deleted: u.words_deleted,
                last_contribution: u.last_contribution,
            },
        }
    }
}

/// Dashboard aggregate.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StatsResponse {
    pub total_words: u64,
    pub total_users: u64,
    pub pending_approvals: u64,
    /// The requesting user's own counters.
    pub contributions: Contributions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_tokens_tolerate_bad_shapes() {
        assert_eq!(
            permission_tokens(&serde_json::json!(["create_words", "edit_words"])),
            vec!["create_words".to_string(), "edit_words".to_string()]
        );
        assert!(permission_tokens(&serde_json::json!("not-a-list")).is_empty());
        assert!(permission_tokens(&serde_json::json!(null)).is_empty());
    }

    #[test]
    fn profile_update_requires_name() {
        assert!(
            validate_update_profile(&UpdateProfileRequest { name: "  ".into() }).is_err()
        );
        assert!(
            validate_update_profile(&UpdateProfileRequest {
                name: "Sita".into()
            })
            .is_ok()
        );
    }
}
