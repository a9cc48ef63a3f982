//! Completion ledger entry.
//!
//! # Invariants
//! - Records are append-only; no update or delete path exists.
//! - `xp_awarded` is fixed at completion time and never recalculated.
//! - Experience totals are always derived by summing records.

use crate::model::task::{TaskId, UserId};
use serde::{Deserialize, Serialize};

/// One instance of a task being finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub xp_awarded: u32,
    /// Unix epoch milliseconds.
    pub completed_at: i64,
}
