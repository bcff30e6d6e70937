use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "user";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Argon2 hash; absent for federated sign-in accounts.
    pub password: Option<String>,
    pub image: Option<String>,

    /// One of: user, editor, admin, superadmin.
    pub role: String,

    /// Explicit capability tokens layered on top of the role defaults,
    /// as a JSON string array.
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: serde_json::Value,

    // Contribution counters; only ever incremented.
    pub words_created: i64,
    pub words_edited: i64,
    pub words_deleted: i64,
    pub last_contribution: Option<DateTimeUtc>,

    // Role-change audit trail.
    pub assigned_by: Option<Uuid>,
    pub assigned_at: Option<DateTimeUtc>,

    #[sea_orm(has_many)]
    pub bookmarks: HasMany<super::bookmark::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
