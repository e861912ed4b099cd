use std::collections::HashMap;

use eco_core::model::{
    Avatar, FaceSnapshot, ProgressBook, UnitKey, UnitProgress, UserId, UserName, UserProfile,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn progress_value(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Reads one `unit_progress` row into `(profile_id, unit, progress)`.
pub(crate) fn map_progress_row(
    row: &SqliteRow,
) -> Result<(String, UnitKey, UnitProgress), StorageError> {
    let profile_id: String = row.try_get("profile_id").map_err(ser)?;
    let unit = row
        .try_get::<String, _>("unit")
        .map_err(ser)?
        .parse::<UnitKey>()
        .map_err(ser)?;
    let completed = progress_value("completed", row.try_get("completed").map_err(ser)?)?;
    let stars = progress_value("stars", row.try_get("stars").map_err(ser)?)?;
    Ok((profile_id, unit, UnitProgress::new(completed, stars)))
}

/// Groups progress rows by owning profile id.
pub(crate) fn group_progress(
    rows: &[SqliteRow],
) -> Result<HashMap<String, Vec<(UnitKey, UnitProgress)>>, StorageError> {
    let mut grouped: HashMap<String, Vec<(UnitKey, UnitProgress)>> = HashMap::new();
    for row in rows {
        let (profile_id, unit, progress) = map_progress_row(row)?;
        grouped.entry(profile_id).or_default().push((unit, progress));
    }
    Ok(grouped)
}

/// Builds a `UserProfile` from a `profiles` row plus its progress entries.
pub(crate) fn map_profile_row(
    row: &SqliteRow,
    progress: Vec<(UnitKey, UnitProgress)>,
) -> Result<UserProfile, StorageError> {
    let id = UserId::new(row.try_get::<String, _>("id").map_err(ser)?).map_err(ser)?;
    let name = UserName::new(row.try_get::<String, _>("name").map_err(ser)?).map_err(ser)?;
    let avatar = row
        .try_get::<String, _>("avatar")
        .map_err(ser)?
        .parse::<Avatar>()
        .map_err(ser)?;
    let face_snapshot = row
        .try_get::<Option<Vec<u8>>, _>("face_snapshot")
        .map_err(ser)?
        .map(FaceSnapshot::new);

    Ok(UserProfile::from_persisted(
        id,
        name,
        avatar,
        face_snapshot,
        row.try_get("created_at").map_err(ser)?,
        ProgressBook::from_entries(progress),
    ))
}
