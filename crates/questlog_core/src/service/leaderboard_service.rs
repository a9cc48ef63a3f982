//! Leaderboard use-case service.
//!
//! # Responsibility
//! - Rank every profile by weekly or all-time experience.
//!
//! # Invariants
//! - Only name, avatar and XP are exposed; tasks never leave their owner.
//! - Sorting is by score descending and stable: ties keep the arrival order
//!   returned by the profile repository. No secondary key is applied.
//! - Weekly scores count records since local Monday 00:00.

use crate::calendar::week_start_ms;
use crate::game::progression::level_from_total;
use crate::model::profile::Avatar;
use crate::model::task::UserId;
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::RepoResult;
use chrono::{DateTime, TimeZone};
use log::debug;

/// Scoring window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardWindow {
    Weekly,
    AllTime,
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub user_id: UserId,
    pub display_name: String,
    pub avatar: Avatar,
    pub score: i64,
    /// Derived level; only filled for the all-time board.
    pub level: Option<u32>,
}

pub struct LeaderboardService<P: ProfileRepository, C: CompletionRepository> {
    profiles: P,
    ledger: C,
}

impl<P: ProfileRepository, C: CompletionRepository> LeaderboardService<P, C> {
    pub fn new(profiles: P, ledger: C) -> Self {
        Self { profiles, ledger }
    }

    /// Ranks all profiles for `window` as seen at `now`.
    pub fn leaderboard<Tz: TimeZone>(
        &self,
        window: LeaderboardWindow,
        now: &DateTime<Tz>,
    ) -> RepoResult<Vec<LeaderboardEntry>> {
        let since = match window {
            LeaderboardWindow::Weekly => Some(week_start_ms(now)),
            LeaderboardWindow::AllTime => None,
        };
        let scores = self.ledger.xp_by_user(since)?;

        let mut rows: Vec<(i64, _)> = self
            .profiles
            .list_profiles()?
            .into_iter()
            .map(|profile| (scores.get(&profile.id).copied().unwrap_or(0), profile))
            .collect();
        // Stable sort keeps arrival order for equal scores.
        rows.sort_by(|left, right| right.0.cmp(&left.0));

        let entries: Vec<LeaderboardEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(index, (score, profile))| LeaderboardEntry {
                rank: index + 1,
                user_id: profile.id,
                display_name: profile.display_name,
                avatar: profile.avatar,
                score,
                level: match window {
                    LeaderboardWindow::AllTime => Some(level_from_total(score).level),
                    LeaderboardWindow::Weekly => None,
                },
            })
            .collect();

        debug!(
            "event=leaderboard_load module=service status=ok window={:?} rows={}",
            window,
            entries.len()
        );
        Ok(entries)
    }
}
