use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation state of a dictionary entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl WordStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "word")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Source-language headword (Devanagari).
    pub word: String,
    pub romanized: Option<String>,
    pub phonetic: Option<String>,
    /// English gloss.
    pub english: Option<String>,

    /// Nested definitions as a JSON array; typed as
    /// `Vec<models::word::Definition>` at the API boundary.
    #[sea_orm(column_type = "JsonBinary")]
    pub definitions: serde_json::Value,

    /// One of: draft, pending, approved, rejected.
    #[sea_orm(indexed)]
    pub status: String,

    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
