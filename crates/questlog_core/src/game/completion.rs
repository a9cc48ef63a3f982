//! Completion accounting rule.
//!
//! # Responsibility
//! - Decide whether a task completion is allowed right now.
//! - Fix the experience a completion is worth and the task transition it
//!   causes.
//!
//! # Invariants
//! - Pure decision: no I/O, no clock. Today's completion set is an input.
//! - A daily already present in today's set is rejected.
//! - A todo is accepted once and then deactivated; the caller stops offering
//!   inactive tasks, this rule does not re-check `active`.
//! - A habit is always accepted and never deactivated.

use crate::game::progression::xp_for_difficulty;
use crate::model::task::{Task, TaskCategory, TaskId};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Why a completion was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Daily task already has a completion since local midnight.
    AlreadyCompletedToday,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyCompletedToday => write!(f, "already completed today"),
        }
    }
}

/// State change the caller applies to the persisted task after accepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowupMutation {
    NoOp,
    DeactivateTask(TaskId),
}

/// Outcome of a completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Reject(RejectReason),
    Accept {
        xp_awarded: u32,
        followup: FollowupMutation,
    },
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }
}

/// Applies the completion policy to one task.
///
/// `completed_today` holds ids of tasks with a completion since local
/// midnight, rebuilt from the ledger on every read.
pub fn attempt_completion(task: &Task, completed_today: &HashSet<TaskId>) -> Decision {
    if task.category == TaskCategory::Daily && completed_today.contains(&task.id) {
        return Decision::Reject(RejectReason::AlreadyCompletedToday);
    }

    let followup = match task.category {
        TaskCategory::Todo => FollowupMutation::DeactivateTask(task.id),
        TaskCategory::Daily | TaskCategory::Habit => FollowupMutation::NoOp,
    };

    Decision::Accept {
        xp_awarded: xp_for_difficulty(task.difficulty),
        followup,
    }
}

/// Returns whether a task shows as done in today's view.
///
/// Only dailies carry a per-day done state.
pub fn is_done_today(task: &Task, completed_today: &HashSet<TaskId>) -> bool {
    task.category == TaskCategory::Daily && completed_today.contains(&task.id)
}
