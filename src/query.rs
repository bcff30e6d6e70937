//! Search-request translation: free-text term, id set, and status filter
//! into a SeaORM `Condition`, plus the pagination window.

use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, QueryOrder, Select};
use uuid::Uuid;

use crate::entity::word::{self, WordStatus};
use crate::error::AppError;
use crate::models::shared::escape_like;
use crate::permissions::Role;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// A clamped pagination window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Page defaults to 1 and is floored at 1; limit defaults to 10 and is
    /// clamped into [1, 100]. Inputs are signed so that out-of-range caller
    /// values clamp instead of failing deserialization.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1) as u64;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as u64;
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    pub fn pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Build the filter for a word search.
///
/// A non-empty id set takes precedence over the search term. Non-elevated
/// viewers are always restricted to approved entries, even when they pass an
/// explicit status; elevated viewers may filter by any status or pass the
/// `"all"` sentinel to disable status filtering.
pub fn word_filter(
    search: Option<&str>,
    ids: &[Uuid],
    status: Option<&str>,
    viewer: Option<Role>,
) -> Result<Condition, AppError> {
    let mut cond = Condition::all();

    if !ids.is_empty() {
        cond = cond.add(word::Column::Id.is_in(ids.iter().copied()));
    } else if let Some(term) = search {
        let term = term.trim();
        if !term.is_empty() {
            let pattern = format!("{}%", escape_like(term).to_lowercase());
            cond = cond.add(
                Condition::any()
                    .add(prefix_match(word::Column::Word, &pattern))
                    .add(prefix_match(word::Column::Romanized, &pattern))
                    .add(prefix_match(word::Column::English, &pattern)),
            );
        }
    }

    let elevated = viewer.is_some_and(Role::is_elevated);
    if !elevated {
        cond = cond.add(word::Column::Status.eq(WordStatus::Approved.as_str()));
    } else if let Some(status) = status
        && status != "all"
    {
        let status = WordStatus::parse(status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status '{status}'")))?;
        cond = cond.add(word::Column::Status.eq(status.as_str()));
    }

    Ok(cond)
}

/// Case-insensitive prefix match against a single column.
fn prefix_match(col: word::Column, pattern: &str) -> SimpleExpr {
    // Scoped import: `ExprTrait::max` would shadow `Ord::max` in the
    // clamping code above.
    use sea_orm::ExprTrait;
    Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Deterministic result ordering: headword ascending, id as tiebreak so
/// repeated pages do not skip or duplicate rows.
pub fn ordered(select: Select<word::Entity>) -> Select<word::Entity> {
    select
        .order_by_asc(word::Column::Word)
        .order_by_asc(word::Column::Id)
}
