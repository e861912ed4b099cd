use async_trait::async_trait;
use eco_core::model::{UserId, UserProfile};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for child profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// All profiles in registration order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StorageError>;

    /// Fetch a profile by id. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError>;

    /// Insert a new profile or replace the stored one with the same id.
    ///
    /// Updating keeps the original registration position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;

    /// Number of stored profiles.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn count_profiles(&self) -> Result<usize, StorageError> {
        Ok(self.list_profiles().await?.len())
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    profiles: Arc<Mutex<Vec<UserProfile>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.iter().find(|p| p.id() == id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        match guard.iter_mut().find(|p| p.id() == profile.id()) {
            Some(existing) => *existing = profile.clone(),
            None => guard.push(profile.clone()),
        }
        Ok(())
    }

    async fn count_profiles(&self) -> Result<usize, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(InMemoryRepository::new());
        Self { profiles }
    }
}
