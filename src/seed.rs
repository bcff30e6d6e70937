use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::entity::{user, word};
use crate::permissions::Role;
use crate::utils::hash;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for the listing query:
    // SELECT ... FROM word WHERE status = ? ORDER BY word, id
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_word_status_word")
        .table(word::Entity)
        .col(word::Column::Status)
        .col(word::Column::Word)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_word_status_word exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_word_status_word: {}", e);
        }
    }

    Ok(())
}

/// Create the bootstrap superadmin account when configured and absent.
///
/// Roles are only ever granted by admins, so a fresh deployment needs one
/// account seeded outside that loop.
pub async fn seed_superadmin(db: &DatabaseConnection, config: &AppConfig) -> Result<(), DbErr> {
    let Some(ref bootstrap) = config.bootstrap else {
        return Ok(());
    };

    let email = bootstrap.superadmin_email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let hash = hash::hash_password(&bootstrap.superadmin_password)
        .map_err(|e| DbErr::Custom(format!("Bootstrap password hash error: {e}")))?;

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.clone()),
        name: Set(bootstrap.superadmin_name.trim().to_string()),
        password: Set(Some(hash)),
        image: Set(None),
        role: Set(Role::Superadmin.as_str().to_string()),
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

    match user::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
    {
        Ok(_) => {
            info!("Seeded bootstrap superadmin {}", email);
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}
