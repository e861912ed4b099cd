use eco_core::model::{UserId, UserProfile};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, group_progress, map_profile_row, ser};
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, avatar, face_snapshot, created_at
            FROM profiles
            ORDER BY seq ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let progress_rows = sqlx::query(
            r"
            SELECT profile_id, unit, completed, stars
            FROM unit_progress
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        let mut progress = group_progress(&progress_rows)?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id").map_err(ser)?;
            let entries = progress.remove(&id).unwrap_or_default();
            profiles.push(map_profile_row(&row, entries)?);
        }
        Ok(profiles)
    }

    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, avatar, face_snapshot, created_at
            FROM profiles WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let progress_rows = sqlx::query(
            r"
            SELECT profile_id, unit, completed, stars
            FROM unit_progress WHERE profile_id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        let entries = group_progress(&progress_rows)?
            .remove(id.as_str())
            .unwrap_or_default();

        map_profile_row(&row, entries).map(Some)
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO profiles (id, name, avatar, face_snapshot, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                avatar = excluded.avatar,
                face_snapshot = excluded.face_snapshot
            ",
        )
        .bind(profile.id().as_str())
        .bind(profile.name().as_str())
        .bind(profile.avatar().symbol())
        .bind(profile.face_snapshot().map(|s| s.as_bytes().to_vec()))
        .bind(profile.created_at())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        for (unit, progress) in profile.progress().iter() {
            sqlx::query(
                r"
                INSERT INTO unit_progress (profile_id, unit, completed, stars)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(profile_id, unit) DO UPDATE SET
                    completed = excluded.completed,
                    stars = excluded.stars
                ",
            )
            .bind(profile.id().as_str())
            .bind(unit.as_str())
            .bind(i64::from(progress.completed()))
            .bind(i64::from(progress.stars()))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn count_profiles(&self) -> Result<usize, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;
        usize::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}
