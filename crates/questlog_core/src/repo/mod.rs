//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for profiles, tasks and
//!   the completion ledger.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Task reads and writes are always scoped by owner `user_id`; another
//!   user's task behaves exactly like a missing one.
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it.
//! - The completion ledger exposes append and read only.

use crate::db::DbError;
use crate::model::profile::{AvatarError, ProfileValidationError};
use crate::model::task::{TaskId, TaskValidationError, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod completion_repo;
pub mod profile_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all persistence contracts.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Profile(ProfileValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    ProfileNotFound(UserId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Profile(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Profile(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::TaskNotFound(_) | Self::ProfileNotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ProfileValidationError> for RepoError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Profile(value)
    }
}

impl From<AvatarError> for RepoError {
    fn from(value: AvatarError) -> Self {
        Self::Profile(ProfileValidationError::Avatar(value))
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
