//! Task management use-case service.
//!
//! # Responsibility
//! - Create, list, archive/unarchive and delete one user's tasks.
//! - Group task lists by category for display.
//!
//! # Invariants
//! - Every call is scoped by the explicit acting `user_id`.
//! - Service APIs never bypass repository validation.

use crate::model::task::{Difficulty, Task, TaskCategory, TaskId, UserId};
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Request model for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    pub title: String,
    pub category: TaskCategory,
    pub difficulty: Difficulty,
}

/// One user's tasks grouped by category, newest first within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    pub daily: Vec<Task>,
    pub todo: Vec<Task>,
    pub habit: Vec<Task>,
}

impl TaskBoard {
    fn push(&mut self, task: Task) {
        match task.category {
            TaskCategory::Daily => self.daily.push(task),
            TaskCategory::Todo => self.todo.push(task),
            TaskCategory::Habit => self.habit.push(task),
        }
    }

    pub fn len(&self) -> usize {
        self.daily.len() + self.todo.len() + self.habit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Use-case service wrapper for task management.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an active task owned by `user_id`.
    ///
    /// # Errors
    /// - `RepoError::Validation` when the trimmed title is empty.
    pub fn create_task(
        &self,
        user_id: UserId,
        request: &NewTaskRequest,
        now_ms: i64,
    ) -> RepoResult<Task> {
        let task = Task::new(
            user_id,
            request.title.as_str(),
            request.category,
            request.difficulty,
            now_ms,
        );
        self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok category={} difficulty={}",
            task.category, task.difficulty
        );
        Ok(task)
    }

    /// Gets one task owned by `user_id`.
    pub fn get_task(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(user_id, id)
    }

    /// Lists active and archived tasks grouped by category.
    pub fn task_board(&self, user_id: UserId) -> RepoResult<TaskBoard> {
        let mut board = TaskBoard::default();
        for task in self.repo.list_tasks(user_id, &TaskListQuery::default())? {
            board.push(task);
        }
        Ok(board)
    }

    /// Lists tasks using raw query options.
    pub fn list_tasks(&self, user_id: UserId, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(user_id, query)
    }

    /// Sets the active flag explicitly (archive = `false`).
    pub fn set_active(&self, user_id: UserId, id: TaskId, active: bool) -> RepoResult<()> {
        self.repo.set_task_active(user_id, id, active)?;
        info!("event=task_set_active module=service status=ok active={active}");
        Ok(())
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle_active(&self, user_id: UserId, id: TaskId) -> RepoResult<bool> {
        let task = self
            .repo
            .get_task(user_id, id)?
            .ok_or(RepoError::TaskNotFound(id))?;
        let active = !task.active;
        self.set_active(user_id, id, active)?;
        Ok(active)
    }

    /// Deletes a task. Its completion records stay in the ledger.
    pub fn delete_task(&self, user_id: UserId, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(user_id, id)?;
        info!("event=task_delete module=service status=ok");
        Ok(())
    }
}
