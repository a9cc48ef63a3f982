//! Game rules: leveling curve and completion policy.
//!
//! # Responsibility
//! - Host the only non-trivial domain logic of the core.
//! - Stay synchronous and side-effect free so rules are testable without a
//!   clock or storage.

pub mod completion;
pub mod progression;
