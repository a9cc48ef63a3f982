//! Profile use-case service.
//!
//! # Responsibility
//! - Create a profile on first use with a derived name and starter avatar.
//! - Apply validated profile edits.
//! - Build the home summary (name, lifetime XP, level state).

use crate::game::progression::{level_from_total, LevelState};
use crate::model::profile::{
    default_display_name, normalize_display_name, Avatar, Profile, ProfileValidationError,
    DEFAULT_DISPLAY_NAME,
};
use crate::model::task::UserId;
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::profile_repo::ProfileRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for profile edits.
#[derive(Debug)]
pub enum ProfileServiceError {
    Validation(ProfileValidationError),
    ProfileNotFound(UserId),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent profile state: {details}"),
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProfileNotFound(id) => Self::ProfileNotFound(id),
            RepoError::Profile(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Data shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeSummary {
    pub display_name: String,
    pub total_xp: i64,
    pub level: LevelState,
}

/// Profile service over profile storage and the completion ledger.
pub struct ProfileService<P: ProfileRepository, C: CompletionRepository> {
    profiles: P,
    ledger: C,
}

impl<P: ProfileRepository, C: CompletionRepository> ProfileService<P, C> {
    pub fn new(profiles: P, ledger: C) -> Self {
        Self { profiles, ledger }
    }

    /// Returns the user's profile, creating it on first use.
    ///
    /// Idempotent: an existing profile is returned unchanged.
    pub fn ensure_profile(
        &self,
        user_id: UserId,
        email: Option<&str>,
        now_ms: i64,
    ) -> RepoResult<Profile> {
        if let Some(existing) = self.profiles.get_profile(user_id)? {
            return Ok(existing);
        }

        let profile = Profile {
            id: user_id,
            display_name: default_display_name(email),
            avatar: Avatar::starter(),
            created_at: now_ms,
        };
        self.profiles.insert_profile(&profile)?;
        info!("event=profile_create module=service status=ok");
        Ok(profile)
    }

    pub fn get_profile(&self, user_id: UserId) -> RepoResult<Option<Profile>> {
        self.profiles.get_profile(user_id)
    }

    /// Replaces display name and avatar.
    ///
    /// # Errors
    /// - `Validation` when the trimmed name is outside 2..=24 characters or an
    ///   avatar part is not in the catalog.
    /// - `ProfileNotFound` when the user has no profile yet.
    pub fn update_profile(
        &self,
        user_id: UserId,
        display_name: &str,
        avatar: &Avatar,
    ) -> Result<Profile, ProfileServiceError> {
        let name = normalize_display_name(display_name)?;
        avatar.validate().map_err(ProfileValidationError::from)?;

        self.profiles.update_profile(user_id, name.as_str(), avatar)?;
        info!("event=profile_update module=service status=ok");

        self.profiles
            .get_profile(user_id)?
            .ok_or(ProfileServiceError::InconsistentState(
                "updated profile not found in read-back",
            ))
    }

    /// Builds the home summary from the profile and the full ledger.
    ///
    /// A missing profile shows the default name rather than failing.
    pub fn home_summary(&self, user_id: UserId) -> RepoResult<HomeSummary> {
        let display_name = self
            .profiles
            .get_profile(user_id)?
            .map_or_else(|| DEFAULT_DISPLAY_NAME.to_string(), |p| p.display_name);
        let total_xp = self.ledger.total_xp(user_id)?;

        Ok(HomeSummary {
            display_name,
            total_xp,
            level: level_from_total(total_xp),
        })
    }
}
