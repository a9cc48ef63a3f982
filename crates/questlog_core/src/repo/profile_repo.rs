//! Profile repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist display name and avatar per user.
//! - Validate avatar JSON on both write and read.
//!
//! # Invariants
//! - `list_profiles` returns rows in insertion (arrival) order.
//! - Malformed `avatar_json` surfaces as `InvalidData`, never as a default.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::profile::{Avatar, Profile};
use crate::model::task::UserId;
use rusqlite::{params, Connection, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    display_name,
    avatar_json,
    created_at
FROM profiles";

/// Repository interface for profile operations.
pub trait ProfileRepository {
    fn get_profile(&self, id: UserId) -> RepoResult<Option<Profile>>;
    fn insert_profile(&self, profile: &Profile) -> RepoResult<()>;
    fn update_profile(&self, id: UserId, display_name: &str, avatar: &Avatar) -> RepoResult<()>;
    fn list_profiles(&self) -> RepoResult<Vec<Profile>>;
}

/// SQLite-backed profile repository.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn get_profile(&self, id: UserId) -> RepoResult<Option<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }

        Ok(None)
    }

    fn insert_profile(&self, profile: &Profile) -> RepoResult<()> {
        let avatar_json = encode_avatar(&profile.avatar)?;
        self.conn.execute(
            "INSERT INTO profiles (id, display_name, avatar_json, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                profile.id.to_string(),
                profile.display_name.as_str(),
                avatar_json,
                profile.created_at,
            ],
        )?;
        Ok(())
    }

    fn update_profile(&self, id: UserId, display_name: &str, avatar: &Avatar) -> RepoResult<()> {
        let avatar_json = encode_avatar(avatar)?;
        let changed = self.conn.execute(
            "UPDATE profiles
             SET display_name = ?1,
                 avatar_json = ?2
             WHERE id = ?3;",
            params![display_name, avatar_json, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::ProfileNotFound(id));
        }

        Ok(())
    }

    fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }
}

fn encode_avatar(avatar: &Avatar) -> RepoResult<String> {
    avatar.validate()?;
    serde_json::to_string(avatar)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode avatar: {err}")))
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let id_text: String = row.get("id")?;
    let avatar_text: String = row.get("avatar_json")?;

    let avatar: Avatar = serde_json::from_str(&avatar_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid avatar json in profiles.avatar_json: {err}"))
    })?;
    avatar.validate().map_err(|err| {
        RepoError::InvalidData(format!("{err} in profiles.avatar_json"))
    })?;

    Ok(Profile {
        id: parse_uuid(&id_text, "profiles.id")?,
        display_name: row.get("display_name")?,
        avatar,
        created_at: row.get("created_at")?,
    })
}
