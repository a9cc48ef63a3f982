//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by a single user.
//! - Parse category/difficulty values at the storage and CLI boundary.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is trimmed and non-empty for every persisted task.
//! - Category and difficulty are closed sets; unknown text is rejected at
//!   parse time so the rest of the core never sees an invalid value.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Stable identifier for an authenticated user.
pub type UserId = Uuid;

/// Completion policy family of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Rewarded at most once per local calendar day.
    Daily,
    /// Archived automatically after the first completion.
    Todo,
    /// Repeatable without restriction.
    Habit,
}

impl TaskCategory {
    /// All categories in display order.
    pub const ALL: [TaskCategory; 3] = [Self::Daily, Self::Todo, Self::Habit];

    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Todo => "todo",
            Self::Habit => "habit",
        }
    }
}

impl Display for TaskCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = InvalidCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "todo" => Ok(Self::Todo),
            "habit" => Ok(Self::Habit),
            _ => Err(InvalidCategory(value.to_string())),
        }
    }
}

/// Difficulty tier; fixes the experience a completion is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = InvalidDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(InvalidDifficulty(value.to_string())),
        }
    }
}

/// Difficulty text outside `easy|medium|hard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDifficulty(pub String);

impl Display for InvalidDifficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid difficulty `{}`; expected easy|medium|hard",
            self.0
        )
    }
}

impl Error for InvalidDifficulty {}

/// Category text outside `daily|todo|habit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCategory(pub String);

impl Display for InvalidCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid category `{}`; expected daily|todo|habit", self.0)
    }
}

impl Error for InvalidCategory {}

/// Validation errors for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// Title carries leading/trailing whitespace.
    UntrimmedTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::UntrimmedTitle => write!(f, "task title must be trimmed"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owner; every repository access is scoped by this id.
    pub user_id: UserId,
    pub title: String,
    /// Serialized as `type` to match the storage column name.
    #[serde(rename = "type")]
    pub category: TaskCategory,
    pub difficulty: Difficulty,
    /// Inactive tasks are archived and never offered for completion.
    pub active: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Creates an active task with a generated stable ID.
    ///
    /// The title is trimmed; call [`Task::validate`] before persisting.
    pub fn new(
        user_id: UserId,
        title: impl AsRef<str>,
        category: TaskCategory,
        difficulty: Difficulty,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.as_ref().trim().to_string(),
            category,
            difficulty,
            active: true,
            created_at,
        }
    }

    /// Validates invariants that must hold before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.title.trim() != self.title {
            return Err(TaskValidationError::UntrimmedTitle);
        }
        Ok(())
    }
}
