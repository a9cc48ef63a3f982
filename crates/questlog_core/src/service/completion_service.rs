//! Task completion use-case service.
//!
//! # Responsibility
//! - Build today's completion set from the ledger.
//! - Run the completion rule and apply its outcome: append the ledger
//!   record, then the follow-up task mutation.
//! - Provide the "today" view and the current level state.
//!
//! # Invariants
//! - "Completed today" is derived from records since local midnight on
//!   every call; nothing is cached between calls.
//! - A rejected completion performs no write.
//! - The record is appended before the todo is archived; if archiving fails
//!   the earned XP is kept and the error is surfaced to the caller.
//!
//! Check-then-append is not atomic: two sessions completing the same daily
//! at the same moment can both succeed. Closing that gap needs a
//! transactional guarantee from the storage collaborator.

use crate::calendar::day_start_ms;
use crate::game::completion::{
    attempt_completion, is_done_today, Decision, FollowupMutation, RejectReason,
};
use crate::game::progression::{level_from_total, xp_for_difficulty, LevelState};
use crate::model::completion::CompletionRecord;
use crate::model::task::{Task, TaskCategory, TaskId, UserId};
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, TimeZone};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for completion use-cases.
#[derive(Debug)]
pub enum CompletionServiceError {
    /// Task does not exist or belongs to another user.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CompletionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CompletionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CompletionServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Result of a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A ledger record was appended.
    Completed {
        xp_awarded: u32,
        /// The task was a todo and is now inactive.
        archived: bool,
        /// Lifetime experience after this completion.
        total_xp: i64,
        level: LevelState,
    },
    /// The rule refused; nothing was written.
    Rejected(RejectReason),
    /// Archived tasks are not offered for completion.
    TaskInactive,
}

/// One row of the today view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayItem {
    pub task: Task,
    pub xp: u32,
    /// Daily already completed since local midnight.
    pub done: bool,
}

/// Active tasks offered for completion today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodayView {
    pub dailies: Vec<TodayItem>,
    pub todos: Vec<TodayItem>,
    pub habits: Vec<TodayItem>,
}

/// Completion service over a task repository and the completion ledger.
pub struct CompletionService<T: TaskRepository, C: CompletionRepository> {
    tasks: T,
    ledger: C,
}

impl<T: TaskRepository, C: CompletionRepository> CompletionService<T, C> {
    pub fn new(tasks: T, ledger: C) -> Self {
        Self { tasks, ledger }
    }

    /// Ids of tasks with at least one completion since local midnight.
    pub fn completed_today<Tz: TimeZone>(
        &self,
        user_id: UserId,
        now: &DateTime<Tz>,
    ) -> RepoResult<HashSet<TaskId>> {
        let since = day_start_ms(now);
        Ok(self
            .ledger
            .list_completions_since(user_id, since)?
            .into_iter()
            .map(|record| record.task_id)
            .collect())
    }

    /// Builds the today view over active tasks.
    pub fn today_view<Tz: TimeZone>(
        &self,
        user_id: UserId,
        now: &DateTime<Tz>,
    ) -> RepoResult<TodayView> {
        let completed_today = self.completed_today(user_id, now)?;
        let mut view = TodayView::default();

        for task in self.tasks.list_tasks(user_id, &TaskListQuery::active_only())? {
            let item = TodayItem {
                xp: xp_for_difficulty(task.difficulty),
                done: is_done_today(&task, &completed_today),
                task,
            };
            match item.task.category {
                TaskCategory::Daily => view.dailies.push(item),
                TaskCategory::Todo => view.todos.push(item),
                TaskCategory::Habit => view.habits.push(item),
            }
        }

        Ok(view)
    }

    /// Completes one task at `now`.
    ///
    /// # Contract
    /// - Rejections and inactive tasks are outcomes, not errors.
    /// - On acceptance the record is appended first, then a todo is archived.
    pub fn complete_task<Tz: TimeZone>(
        &self,
        user_id: UserId,
        task_id: TaskId,
        now: &DateTime<Tz>,
    ) -> Result<CompletionOutcome, CompletionServiceError> {
        let task = self
            .tasks
            .get_task(user_id, task_id)?
            .ok_or(CompletionServiceError::TaskNotFound(task_id))?;

        if !task.active {
            info!("event=task_complete module=service status=skipped reason=inactive");
            return Ok(CompletionOutcome::TaskInactive);
        }

        let completed_today = self.completed_today(user_id, now)?;
        let (xp_awarded, followup) = match attempt_completion(&task, &completed_today) {
            Decision::Reject(reason) => {
                info!(
                    "event=task_complete module=service status=rejected category={} reason=already_completed_today",
                    task.category
                );
                return Ok(CompletionOutcome::Rejected(reason));
            }
            Decision::Accept {
                xp_awarded,
                followup,
            } => (xp_awarded, followup),
        };

        self.ledger.append_completion(&CompletionRecord {
            task_id: task.id,
            user_id,
            xp_awarded,
            completed_at: now.timestamp_millis(),
        })?;

        let archived = match followup {
            FollowupMutation::NoOp => false,
            FollowupMutation::DeactivateTask(id) => {
                if let Err(err) = self.tasks.set_task_active(user_id, id, false) {
                    warn!(
                        "event=task_archive module=service status=error error_code=archive_after_complete_failed error={}",
                        err
                    );
                    return Err(err.into());
                }
                true
            }
        };

        let total_xp = self.ledger.total_xp(user_id)?;
        let level = level_from_total(total_xp);
        info!(
            "event=task_complete module=service status=ok category={} xp_awarded={} archived={} level={}",
            task.category, xp_awarded, archived, level.level
        );

        Ok(CompletionOutcome::Completed {
            xp_awarded,
            archived,
            total_xp,
            level,
        })
    }

    /// Lifetime experience and derived level state.
    pub fn progress(&self, user_id: UserId) -> RepoResult<(i64, LevelState)> {
        let total_xp = self.ledger.total_xp(user_id)?;
        Ok((total_xp, level_from_total(total_xp)))
    }
}
