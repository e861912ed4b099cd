use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::avatar::Avatar;
use crate::model::ids::UserId;
use crate::model::unit::{ProgressBook, UnitKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserNameError {
    #[error("name cannot be empty")]
    Empty,
}

/// Display name of a child. Never empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// # Errors
    ///
    /// Returns `UserNameError::Empty` if the trimmed name is empty.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserNameError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({:?})", self.0)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

/// Placeholder picture captured when a profile is registered.
///
/// Stored as-is; nothing compares it against live frames.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSnapshot(Vec<u8>);

impl FaceSnapshot {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for FaceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaceSnapshot({} bytes)", self.0.len())
    }
}

/// A registered child and their learning progress.
///
/// Identity fields are fixed at construction; only progress changes
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    name: UserName,
    avatar: Avatar,
    face_snapshot: Option<FaceSnapshot>,
    created_at: DateTime<Utc>,
    progress: ProgressBook,
}

impl UserProfile {
    /// Creates a newly registered profile with every unit at zero.
    #[must_use]
    pub fn register(
        id: UserId,
        name: UserName,
        avatar: Avatar,
        face_snapshot: Option<FaceSnapshot>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            avatar,
            face_snapshot,
            created_at,
            progress: ProgressBook::fresh(),
        }
    }

    /// Rehydrates a profile from storage.
    #[must_use]
    pub fn from_persisted(
        id: UserId,
        name: UserName,
        avatar: Avatar,
        face_snapshot: Option<FaceSnapshot>,
        created_at: DateTime<Utc>,
        progress: ProgressBook,
    ) -> Self {
        Self {
            id,
            name,
            avatar,
            face_snapshot,
            created_at,
            progress,
        }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    #[must_use]
    pub fn avatar(&self) -> Avatar {
        self.avatar
    }

    #[must_use]
    pub fn face_snapshot(&self) -> Option<&FaceSnapshot> {
        self.face_snapshot.as_ref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressBook {
        &self.progress
    }

    /// Records one finished activity in `unit`. See [`ProgressBook::record`].
    pub fn record_completion(&mut self, unit: UnitKey, stars_earned: u8) -> bool {
        self.progress.record(unit, stars_earned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::unit::UnitProgress;
    use crate::time::fixed_now;

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(UserName::new("  Ana ").unwrap().as_str(), "Ana");
        assert_eq!(UserName::new(""), Err(UserNameError::Empty));
        assert_eq!(UserName::new(" \t"), Err(UserNameError::Empty));
    }

    #[test]
    fn registered_profile_starts_with_all_units_at_zero() {
        let profile = UserProfile::register(
            UserId::generate(),
            UserName::new("Luis").unwrap(),
            Avatar::Lion,
            None,
            fixed_now(),
        );
        assert_eq!(profile.progress().iter().count(), 5);
        assert!(
            profile
                .progress()
                .iter()
                .all(|(_, p)| p == UnitProgress::default())
        );
    }

    #[test]
    fn record_completion_mutates_only_that_unit() {
        let mut profile = UserProfile::register(
            UserId::new("7").unwrap(),
            UserName::new("Sofi").unwrap(),
            Avatar::Panda,
            Some(FaceSnapshot::new(vec![1, 2, 3])),
            fixed_now(),
        );
        assert!(profile.record_completion(UnitKey::O, 3));
        assert_eq!(profile.progress().get(UnitKey::O), UnitProgress::new(1, 3));
        assert_eq!(profile.progress().total_completed(), 1);
    }
}
