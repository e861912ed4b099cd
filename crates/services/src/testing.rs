use async_trait::async_trait;
use eco_core::model::{UserId, UserProfile};
use storage::repository::{ProfileRepository, StorageError};

/// Store whose every call fails, as when the database file is unreadable.
pub(crate) struct BrokenRepository;

fn offline() -> StorageError {
    StorageError::Connection("database is locked".into())
}

#[async_trait]
impl ProfileRepository for BrokenRepository {
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        Err(offline())
    }

    async fn get_profile(&self, _id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        Err(offline())
    }

    async fn upsert_profile(&self, _profile: &UserProfile) -> Result<(), StorageError> {
        Err(offline())
    }
}
