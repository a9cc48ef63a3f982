//! Core domain logic for questlog, a gamified habit and task tracker.
//! This crate is the single source of truth for progression and completion
//! rules; storage is reached only through repository traits.

pub mod calendar;
pub mod db;
pub mod game;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use game::completion::{attempt_completion, Decision, FollowupMutation, RejectReason};
pub use game::progression::{
    cumulative_xp_for_level, level_from_total, xp_for_difficulty, xp_to_next_level, LevelState,
    LEVEL_CEILING,
};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogConfig};
pub use model::completion::CompletionRecord;
pub use model::profile::{Avatar, AvatarError, AvatarPart, Profile, ProfileValidationError};
pub use model::task::{
    Difficulty, InvalidCategory, InvalidDifficulty, Task, TaskCategory, TaskId,
    TaskValidationError, UserId,
};
pub use repo::completion_repo::{CompletionRepository, SqliteCompletionRepository};
pub use repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::completion_service::{
    CompletionOutcome, CompletionService, CompletionServiceError, TodayItem, TodayView,
};
pub use service::leaderboard_service::{LeaderboardEntry, LeaderboardService, LeaderboardWindow};
pub use service::profile_service::{HomeSummary, ProfileService, ProfileServiceError};
pub use service::task_service::{NewTaskRequest, TaskBoard, TaskService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
