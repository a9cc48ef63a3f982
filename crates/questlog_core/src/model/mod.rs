//! Domain model for tasks, completion ledger entries and player profiles.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep parsing of closed value sets (category, difficulty, avatar parts)
//!   at the boundary so invalid values never reach the game rules.
//!
//! # Invariants
//! - Experience totals and level state are derived, never stored here.

pub mod completion;
pub mod profile;
pub mod task;
