use std::sync::Arc;

use eco_core::Summary;
use eco_core::model::{UnitKey, UserProfile};
use storage::repository::ProfileRepository;
use tracing::debug;

use crate::error::ProgressError;

/// Aggregates and records per-unit progress.
#[derive(Clone)]
pub struct ProgressTracker {
    profiles: Arc<dyn ProfileRepository>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }

    /// Overall percentage and per-unit star data for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::NoActiveUser` when `user` is `None`.
    pub fn compute_summary(&self, user: Option<&UserProfile>) -> Result<Summary, ProgressError> {
        user.map(Summary::for_profile)
            .ok_or(ProgressError::NoActiveUser)
    }

    /// Records one finished activity and persists the profile.
    ///
    /// `user` is only updated once the save succeeded. Returns `Ok(false)`
    /// without touching storage when the unit was already complete.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the profile cannot be saved; `user`
    /// is left as it was.
    pub async fn record_completion(
        &self,
        user: &mut UserProfile,
        unit: UnitKey,
        stars_earned: u8,
    ) -> Result<bool, ProgressError> {
        let mut updated = user.clone();
        if !updated.record_completion(unit, stars_earned) {
            debug!(user = %user.id(), %unit, "unit already complete, nothing recorded");
            return Ok(false);
        }
        self.profiles.upsert_profile(&updated).await?;
        *user = updated;
        Ok(true)
    }
}
