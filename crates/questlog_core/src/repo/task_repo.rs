//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over the `tasks` table.
//! - Parse category/difficulty text strictly on read.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Listing order is deterministic: `created_at DESC, id ASC`.

use super::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult};
use crate::model::task::{Difficulty, Task, TaskCategory, TaskId, UserId};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    type,
    difficulty,
    active,
    created_at
FROM tasks";

/// Query options for listing one user's tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// `Some(true)` for active only, `Some(false)` for archived only.
    pub active: Option<bool>,
    /// Category filter; empty means every category.
    pub categories: Vec<TaskCategory>,
}

impl TaskListQuery {
    /// Active tasks of every category.
    pub fn active_only() -> Self {
        Self {
            active: Some(true),
            categories: Vec::new(),
        }
    }
}

/// Repository interface for task operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn get_task(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, user_id: UserId, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn set_task_active(&self, user_id: UserId, id: TaskId, active: bool) -> RepoResult<()>;
    fn delete_task(&self, user_id: UserId, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                user_id,
                title,
                type,
                difficulty,
                active,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.title.as_str(),
                task.category.as_str(),
                task.difficulty.as_str(),
                bool_to_int(task.active),
                task.created_at,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, user_id: UserId, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1
               AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, user_id: UserId, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.to_string())];

        if let Some(active) = query.active {
            sql.push_str(" AND active = ?");
            bind_values.push(Value::Integer(bool_to_int(active)));
        }

        if !query.categories.is_empty() {
            let placeholders = vec!["?"; query.categories.len()].join(", ");
            sql.push_str(&format!(" AND type IN ({placeholders})"));
            for category in &query.categories {
                bind_values.push(Value::Text(category.as_str().to_string()));
            }
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn set_task_active(&self, user_id: UserId, id: TaskId, active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET active = ?1
             WHERE id = ?2
               AND user_id = ?3;",
            params![bool_to_int(active), id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn delete_task(&self, user_id: UserId, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks
             WHERE id = ?1
               AND user_id = ?2;",
            params![id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;

    let type_text: String = row.get("type")?;
    let category: TaskCategory = type_text.parse().map_err(|_| {
        RepoError::InvalidData(format!("invalid task type `{type_text}` in tasks.type"))
    })?;

    let difficulty_text: String = row.get("difficulty")?;
    let difficulty: Difficulty = difficulty_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty_text}` in tasks.difficulty"
        ))
    })?;

    let task = Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        user_id: parse_uuid(&user_text, "tasks.user_id")?,
        title: row.get("title")?,
        category,
        difficulty,
        active: parse_flag(row.get("active")?, "tasks.active")?,
        created_at: row.get("created_at")?,
    };
    task.validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks.title")))?;
    Ok(task)
}
