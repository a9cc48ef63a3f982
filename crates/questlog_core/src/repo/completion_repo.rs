//! Completion ledger repository.
//!
//! # Responsibility
//! - Append completion records and read them back by time window.
//! - Aggregate experience per user for progression and leaderboards.
//!
//! # Invariants
//! - Append-only: no update or delete statement touches `task_completions`.
//! - Aggregates are computed on read; no running total is stored.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::completion::CompletionRecord;
use crate::model::task::UserId;
use rusqlite::{params, Connection};
use std::collections::HashMap;

/// Repository interface for the completion ledger.
pub trait CompletionRepository {
    fn append_completion(&self, record: &CompletionRecord) -> RepoResult<()>;
    /// Returns one user's records with `completed_at >= since_ms`, oldest first.
    fn list_completions_since(
        &self,
        user_id: UserId,
        since_ms: i64,
    ) -> RepoResult<Vec<CompletionRecord>>;
    /// Sum of `xp_awarded` over the user's whole ledger.
    fn total_xp(&self, user_id: UserId) -> RepoResult<i64>;
    /// Per-user experience sums, optionally restricted to `completed_at >= since_ms`.
    fn xp_by_user(&self, since_ms: Option<i64>) -> RepoResult<HashMap<UserId, i64>>;
}

/// SQLite-backed completion ledger.
pub struct SqliteCompletionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompletionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CompletionRepository for SqliteCompletionRepository<'_> {
    fn append_completion(&self, record: &CompletionRecord) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO task_completions (
                task_id,
                user_id,
                xp_awarded,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                record.task_id.to_string(),
                record.user_id.to_string(),
                record.xp_awarded,
                record.completed_at,
            ],
        )?;
        Ok(())
    }

    fn list_completions_since(
        &self,
        user_id: UserId,
        since_ms: i64,
    ) -> RepoResult<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT task_id, user_id, xp_awarded, completed_at
             FROM task_completions
             WHERE user_id = ?1
               AND completed_at >= ?2
             ORDER BY completed_at ASC, id ASC;",
        )?;

        let mut rows = stmt.query(params![user_id.to_string(), since_ms])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let task_text: String = row.get("task_id")?;
            let user_text: String = row.get("user_id")?;
            let xp: i64 = row.get("xp_awarded")?;
            records.push(CompletionRecord {
                task_id: parse_uuid(&task_text, "task_completions.task_id")?,
                user_id: parse_uuid(&user_text, "task_completions.user_id")?,
                xp_awarded: u32::try_from(xp).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "invalid xp value `{xp}` in task_completions.xp_awarded"
                    ))
                })?,
                completed_at: row.get("completed_at")?,
            });
        }

        Ok(records)
    }

    fn total_xp(&self, user_id: UserId) -> RepoResult<i64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(xp_awarded), 0)
             FROM task_completions
             WHERE user_id = ?1;",
            [user_id.to_string()],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(total)
    }

    fn xp_by_user(&self, since_ms: Option<i64>) -> RepoResult<HashMap<UserId, i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, COALESCE(SUM(xp_awarded), 0) AS xp
             FROM task_completions
             WHERE (?1 IS NULL OR completed_at >= ?1)
             GROUP BY user_id;",
        )?;

        let mut rows = stmt.query([since_ms])?;
        let mut totals = HashMap::new();
        while let Some(row) = rows.next()? {
            let user_text: String = row.get("user_id")?;
            let user_id = parse_uuid(&user_text, "task_completions.user_id")?;
            totals.insert(user_id, row.get::<_, i64>("xp")?);
        }

        Ok(totals)
    }
}
