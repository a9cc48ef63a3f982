//! Player profile and avatar catalog.
//!
//! # Responsibility
//! - Define the public face of a user: display name and avatar.
//! - Own the fixed catalog of avatar parts and their allowed values.
//!
//! # Invariants
//! - Display names are trimmed and 2..=24 characters once edited by the user.
//! - Every avatar part that is set holds a value from the catalog.
//! - Profiles never expose tasks; leaderboards read only name, avatar and XP.

use crate::model::task::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DISPLAY_NAME_MIN_CHARS: usize = 2;
pub const DISPLAY_NAME_MAX_CHARS: usize = 24;
pub const DEFAULT_DISPLAY_NAME: &str = "Hero";

/// One customizable avatar slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AvatarPart {
    Base,
    Hair,
    Tunic,
    Shield,
    Sword,
    Companion,
    Frame,
}

impl AvatarPart {
    /// All parts in picker order.
    pub const ALL: [AvatarPart; 7] = [
        Self::Base,
        Self::Hair,
        Self::Tunic,
        Self::Shield,
        Self::Sword,
        Self::Companion,
        Self::Frame,
    ];

    /// Stable key used in avatar JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Hair => "hair",
            Self::Tunic => "tunic",
            Self::Shield => "shield",
            Self::Sword => "sword",
            Self::Companion => "companion",
            Self::Frame => "frame",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Hair => "Hair / Hat",
            Self::Tunic => "Tunic",
            Self::Shield => "Shield",
            Self::Sword => "Sword",
            Self::Companion => "Companion",
            Self::Frame => "Frame",
        }
    }

    /// Allowed values for this part.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::Base => &["hylian_1", "hylian_2"],
            Self::Hair => &["short_1", "long_1", "cap_1"],
            Self::Tunic => &["green_1", "blue_1", "red_1"],
            Self::Shield => &["wood_1", "iron_1"],
            Self::Sword => &["basic_1", "masterish_1"],
            Self::Companion => &["fairy_1", "none"],
            Self::Frame => &["none", "triforce_1"],
        }
    }
}

impl FromStr for AvatarPart {
    type Err = AvatarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|part| part.as_str() == normalized)
            .ok_or_else(|| AvatarError::UnknownPart(value.to_string()))
    }
}

/// Avatar validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarError {
    UnknownPart(String),
    UnsupportedValue { part: AvatarPart, value: String },
}

impl Display for AvatarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPart(part) => write!(f, "unknown avatar part `{part}`"),
            Self::UnsupportedValue { part, value } => write!(
                f,
                "unsupported value `{value}` for avatar part `{}`",
                part.as_str()
            ),
        }
    }
}

impl Error for AvatarError {}

/// Avatar selection; every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Avatar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tunic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

impl Avatar {
    /// Starter look assigned to new profiles.
    pub fn starter() -> Self {
        Self {
            base: Some("hylian_1".to_string()),
            tunic: Some("green_1".to_string()),
            companion: Some("fairy_1".to_string()),
            ..Self::default()
        }
    }

    pub fn get(&self, part: AvatarPart) -> Option<&str> {
        self.slot(part).as_deref()
    }

    /// Sets one part after checking the value against the catalog.
    pub fn set(&mut self, part: AvatarPart, value: &str) -> Result<(), AvatarError> {
        let value = value.trim();
        if !part.options().contains(&value) {
            return Err(AvatarError::UnsupportedValue {
                part,
                value: value.to_string(),
            });
        }
        *self.slot_mut(part) = Some(value.to_string());
        Ok(())
    }

    /// Checks every set part against the catalog.
    pub fn validate(&self) -> Result<(), AvatarError> {
        for part in AvatarPart::ALL {
            if let Some(value) = self.get(part) {
                if !part.options().contains(&value) {
                    return Err(AvatarError::UnsupportedValue {
                        part,
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn slot(&self, part: AvatarPart) -> &Option<String> {
        match part {
            AvatarPart::Base => &self.base,
            AvatarPart::Hair => &self.hair,
            AvatarPart::Tunic => &self.tunic,
            AvatarPart::Shield => &self.shield,
            AvatarPart::Sword => &self.sword,
            AvatarPart::Companion => &self.companion,
            AvatarPart::Frame => &self.frame,
        }
    }

    fn slot_mut(&mut self, part: AvatarPart) -> &mut Option<String> {
        match part {
            AvatarPart::Base => &mut self.base,
            AvatarPart::Hair => &mut self.hair,
            AvatarPart::Tunic => &mut self.tunic,
            AvatarPart::Shield => &mut self.shield,
            AvatarPart::Sword => &mut self.sword,
            AvatarPart::Companion => &mut self.companion,
            AvatarPart::Frame => &mut self.frame,
        }
    }
}

/// Display name validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    DisplayNameLength { chars: usize },
    Avatar(AvatarError),
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DisplayNameLength { chars } => write!(
                f,
                "display name must be {DISPLAY_NAME_MIN_CHARS}-{DISPLAY_NAME_MAX_CHARS} characters, got {chars}"
            ),
            Self::Avatar(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProfileValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Avatar(err) => Some(err),
            Self::DisplayNameLength { .. } => None,
        }
    }
}

impl From<AvatarError> for ProfileValidationError {
    fn from(value: AvatarError) -> Self {
        Self::Avatar(value)
    }
}

/// Public profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub display_name: String,
    pub avatar: Avatar,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Trims and checks a user-entered display name.
pub fn normalize_display_name(value: &str) -> Result<String, ProfileValidationError> {
    let trimmed = value.trim();
    let chars = trimmed.chars().count();
    if !(DISPLAY_NAME_MIN_CHARS..=DISPLAY_NAME_MAX_CHARS).contains(&chars) {
        return Err(ProfileValidationError::DisplayNameLength { chars });
    }
    Ok(trimmed.to_string())
}

/// Derives the first display name from an optional e-mail address.
///
/// Uses the local part, falls back to `Hero`, and caps at 24 characters.
pub fn default_display_name(email: Option<&str>) -> String {
    let local_part = email
        .and_then(|value| value.split('@').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME);
    local_part.chars().take(DISPLAY_NAME_MAX_CHARS).collect()
}
