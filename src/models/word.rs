use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::word;
use crate::error::AppError;

use super::shared::{double_option, validate_headword};

/// Parallel Nepali/English sequences: index i of each side is a translation
/// pair. Unequal lengths are allowed; unpaired tail entries render
/// meaning-only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SensePair {
    #[serde(default)]
    pub nepali: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
}

/// One grammatical/semantic sense-group within an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Definition {
    #[serde(default)]
    #[schema(example = "noun")]
    pub grammar: String,
    #[serde(default)]
    pub etymology: String,
    #[serde(default)]
    pub senses: SensePair,
    #[serde(default)]
    pub examples: SensePair,
    /// Free-text tokens, each optionally resolvable to another entry by
    /// exact headword match on the client side.
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// Serialize definitions into the JSON column representation.
pub fn definitions_to_json(defs: &[Definition]) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(defs).map_err(|e| AppError::Internal(e.to_string()))
}

/// Deserialize the stored JSON column back into typed definitions.
/// Legacy rows with unexpected shapes come back empty rather than failing
/// the whole request.
pub fn definitions_from_json(value: &serde_json::Value) -> Vec<Definition> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub const MAX_DEFINITIONS: usize = 50;

pub fn validate_definitions(defs: &[Definition]) -> Result<(), AppError> {
    if defs.len() > MAX_DEFINITIONS {
        return Err(AppError::Validation(format!(
            "At most {MAX_DEFINITIONS} definitions per entry"
        )));
    }
    for def in defs {
        if def.grammar.chars().count() > 64 {
            return Err(AppError::Validation(
                "Grammar tag must be at most 64 characters".into(),
            ));
        }
    }
    Ok(())
}

/// Body of `POST /api/words` (search).
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct SearchWordsRequest {
    /// Free-text term, prefix-matched against word/romanized/english.
    pub search: Option<String>,
    /// Explicit id set; takes precedence over `search`.
    pub ids: Option<Vec<Uuid>>,
    /// Status filter (elevated roles only); `"all"` disables filtering.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SearchWordsResponse {
    pub results: Vec<WordResponse>,
    /// Matching documents ignoring pagination.
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    /// ceil(total / limit).
    pub pages: u64,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct SuggestionsQuery {
    /// Search term (required, non-blank).
    pub q: Option<String>,
    /// Max suggestions, default 8, clamped to [1, 50].
    pub limit: Option<i64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateWordRequest {
    #[schema(example = "घर")]
    pub word: String,
    #[schema(example = "ghar")]
    pub romanized: Option<String>,
    pub phonetic: Option<String>,
    #[schema(example = "house")]
    pub english: Option<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

pub fn validate_create_word(payload: &CreateWordRequest) -> Result<(), AppError> {
    validate_headword(&payload.word)?;
    validate_definitions(&payload.definitions)?;
    Ok(())
}

/// Partial update; absent fields are left unchanged, `null` clears a
/// nullable text field.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateWordRequest {
    pub word: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub romanized: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phonetic: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub english: Option<Option<String>>,
    pub definitions: Option<Vec<Definition>>,
    /// New moderation status; admin/superadmin only.
    pub status: Option<String>,
}

pub fn validate_update_word(payload: &UpdateWordRequest) -> Result<(), AppError> {
    if let Some(ref word) = payload.word {
        validate_headword(word)?;
    }
    if let Some(ref defs) = payload.definitions {
        validate_definitions(defs)?;
    }
    Ok(())
}

/// Query string for `PUT /word/update` and `DELETE /word/delete`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct WordIdQuery {
    pub id: Uuid,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct WordResponse {
    pub id: Uuid,
    #[schema(example = "घर")]
    pub word: String,
    pub romanized: Option<String>,
    pub phonetic: Option<String>,
    pub english: Option<String>,
    pub definitions: Vec<Definition>,
    #[schema(example = "approved")]
    pub status: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<word::Model> for WordResponse {
    fn from(m: word::Model) -> Self {
        let definitions = definitions_from_json(&m.definitions);
        Self {
            id: m.id,
            word: m.word,
            romanized: m.romanized,
            phonetic: m.phonetic,
            english: m.english,
            definitions,
            status: m.status,
            created_by: m.created_by,
            updated_by: m.updated_by,
            approved_by: m.approved_by,
            approved_at: m.approved_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RandomWordResponse {
    pub word: Option<WordResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Word deleted successfully")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_json_round_trip() {
        let defs = vec![Definition {
            grammar: "noun".into(),
            etymology: "Sanskrit गृह".into(),
            senses: SensePair {
                nepali: vec!["बस्ने ठाउँ".into()],
                english: vec!["dwelling".into(), "household".into()],
            },
            examples: SensePair::default(),
            synonyms: vec!["निवास".into()],
            antonyms: vec![],
        }];

        let value = definitions_to_json(&defs).unwrap();
        assert_eq!(definitions_from_json(&value), defs);
    }

    #[test]
    fn unpaired_sense_tails_are_preserved() {
        // Two english senses against one nepali sense is valid data.
        let value = serde_json::json!([{
            "senses": { "nepali": ["क"], "english": ["a", "b"] }
        }]);
        let defs = definitions_from_json(&value);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].senses.nepali.len(), 1);
        assert_eq!(defs[0].senses.english.len(), 2);
    }

    #[test]
    fn malformed_definitions_column_degrades_to_empty() {
        assert!(definitions_from_json(&serde_json::json!({"not": "an array"})).is_empty());
        assert!(definitions_from_json(&serde_json::json!(null)).is_empty());
    }

    #[test]
    fn create_requires_headword() {
        let payload = CreateWordRequest {
            word: "   ".into(),
            romanized: None,
            phonetic: None,
            english: None,
            definitions: vec![],
        };
        assert!(validate_create_word(&payload).is_err());
    }

    #[test]
    fn too_many_definitions_rejected() {
        let payload = CreateWordRequest {
            word: "घर".into(),
            romanized: None,
            phonetic: None,
            english: None,
            definitions: vec![Definition::default(); MAX_DEFINITIONS + 1],
        };
        assert!(validate_create_word(&payload).is_err());
    }

    #[test]
    fn update_is_empty_by_default() {
        let payload: UpdateWordRequest = serde_json::from_str("{}").unwrap();
        assert!(payload == UpdateWordRequest::default());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let payload: UpdateWordRequest =
            serde_json::from_str(r#"{"romanized": null, "english": "house"}"#).unwrap();
        assert_eq!(payload.romanized, Some(None));
        assert_eq!(payload.english, Some(Some("house".into())));
        assert_eq!(payload.phonetic, None);
    }
}
