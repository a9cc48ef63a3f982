//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and game rules into use-case level APIs.
//! - Take the acting user and current time as explicit inputs; no ambient
//!   session or client singleton exists in the core.

pub mod completion_service;
pub mod leaderboard_service;
pub mod profile_service;
pub mod task_service;
