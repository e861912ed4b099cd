//! Shared error types for the services crate.

use thiserror::Error;

use eco_core::InvalidScreenError;
use storage::repository::StorageError;

/// The camera could not be opened. Login falls back to picking a profile.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("camera unavailable: {reason}")]
pub struct CameraUnavailableError {
    pub reason: String,
}

impl CameraUnavailableError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors emitted by `ProgressTracker`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("no user is logged in")]
    NoActiveUser,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `Navigator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavigationError {
    #[error(transparent)]
    InvalidScreen(#[from] InvalidScreenError),
    #[error("no user is logged in")]
    NoActiveUser,
    #[error("no unit is in progress")]
    NoActiveUnit,
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl NavigationError {
    /// Plain-language text suitable for showing to a child or parent.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            NavigationError::InvalidScreen(_) => "That page doesn't exist.",
            NavigationError::NoActiveUser | NavigationError::Progress(ProgressError::NoActiveUser) => {
                "Pick who is playing first."
            }
            NavigationError::NoActiveUnit => "Choose a vowel to play first.",
            NavigationError::Progress(_) | NavigationError::Storage(_) => {
                "We couldn't save or load your progress. Please try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_hide_internal_details() {
        let err = NavigationError::Storage(StorageError::Connection("disk I/O error".into()));
        assert!(!err.user_message().contains("disk"));

        let err = NavigationError::from(InvalidScreenError {
            name: "debug".into(),
        });
        assert_eq!(err.user_message(), "That page doesn't exist.");
    }

    #[test]
    fn missing_user_reads_the_same_from_either_layer() {
        assert_eq!(
            NavigationError::NoActiveUser.user_message(),
            NavigationError::Progress(ProgressError::NoActiveUser).user_message()
        );
    }
}
