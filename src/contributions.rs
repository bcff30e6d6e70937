//! Per-user contribution bookkeeping.
//!
//! Counters are incremented with a single atomic `UPDATE ... SET c = c + 1`
//! after a successful entry mutation. The counter write is best-effort: a
//! failure is logged and the request still succeeds, so counters may lag
//! the store under write failures.

use sea_orm::prelude::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, QueryFilter, UpdateMany};
use uuid::Uuid;

use crate::entity::user;
use crate::permissions::Role;

/// A counted mutating action attributed to a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contribution {
    Created,
    Edited,
    Deleted,
}

impl Contribution {
    fn column(self) -> user::Column {
        match self {
            Self::Created => user::Column::WordsCreated,
            Self::Edited => user::Column::WordsEdited,
            Self::Deleted => user::Column::WordsDeleted,
        }
    }
}

/// Whether an edit counts as a contribution. Self-edits by the entry's own
/// creator do not count unless the actor is admin or superadmin.
pub fn edit_counts(actor_role: Role, actor_id: Uuid, created_by: Option<Uuid>) -> bool {
    actor_role >= Role::Admin || created_by != Some(actor_id)
}

/// The single-statement counter update.
fn increment(user_id: Uuid, kind: Contribution) -> UpdateMany<user::Entity> {
    let col = kind.column();
    user::Entity::update_many()
        .filter(user::Column::Id.eq(user_id))
        .col_expr(col, Expr::col(col).add(1))
        .col_expr(
            user::Column::LastContribution,
            Expr::value(chrono::Utc::now()),
        )
}

/// Increment a contribution counter and stamp `last_contribution`.
pub async fn record<C: ConnectionTrait>(db: &C, user_id: Uuid, kind: Contribution) {
    if let Err(e) = increment(user_id, kind).exec(db).await {
        tracing::warn!(
            "Failed to record {:?} contribution for user {}: {}",
            kind,
            user_id,
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbBackend, DbErr, MockDatabase, QueryTrait};

    #[test]
    fn increment_is_a_single_atomic_update() {
        let sql = increment(Uuid::new_v4(), Contribution::Created)
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.starts_with("UPDATE"));
        // Read-modify-write in SQL, not in the application.
        assert!(sql.contains(r#""words_created" + 1"#), "{sql}");
        assert!(sql.contains("last_contribution"));
        assert!(!sql.contains("words_edited"));
    }

    #[test]
    fn each_kind_targets_its_own_column() {
        for (kind, col) in [
            (Contribution::Created, "words_created"),
            (Contribution::Edited, "words_edited"),
            (Contribution::Deleted, "words_deleted"),
        ] {
            let sql = increment(Uuid::new_v4(), kind)
                .build(DbBackend::Postgres)
                .to_string();
            assert!(sql.contains(&format!(r#""{col}" + 1"#)), "{sql}");
        }
    }

    #[tokio::test]
    async fn record_swallows_write_failures() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("connection lost".into())])
            .into_connection();
        // Must not propagate: the entry mutation already succeeded.
        record(&db, Uuid::new_v4(), Contribution::Edited).await;
    }

    #[test]
    fn self_edit_by_creator_does_not_count() {
        let me = Uuid::new_v4();
        assert!(!edit_counts(Role::Editor, me, Some(me)));
    }

    #[test]
    fn edit_of_someone_elses_entry_counts() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(edit_counts(Role::Editor, me, Some(other)));
        assert!(edit_counts(Role::Editor, me, None));
    }

    #[test]
    fn admin_self_edit_still_counts() {
        let me = Uuid::new_v4();
        assert!(edit_counts(Role::Admin, me, Some(me)));
        assert!(edit_counts(Role::Superadmin, me, Some(me)));
    }
}
