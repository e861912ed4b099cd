use async_trait::async_trait;
use eco_core::model::{FaceSnapshot, UserId};
use tracing::debug;

use crate::error::CameraUnavailableError;

/// A single captured camera frame (encoded image bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct Frame(Vec<u8>);

impl Frame {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_snapshot(self) -> FaceSnapshot {
        FaceSnapshot::new(self.0)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({} bytes)", self.0.len())
    }
}

/// Front-facing camera used on the login screen.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Opens the device.
    ///
    /// # Errors
    ///
    /// Returns `CameraUnavailableError` when there is no device or access was
    /// denied.
    async fn acquire(&self) -> Result<(), CameraUnavailableError>;

    /// Grabs the current frame, if the device is open.
    fn capture_frame(&self) -> Option<Frame>;

    /// Closes the device. Safe to call repeatedly.
    fn release(&self);
}

/// Camera for hosts without a capture device. `acquire` always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCamera;

#[async_trait]
impl Camera for UnavailableCamera {
    async fn acquire(&self) -> Result<(), CameraUnavailableError> {
        Err(CameraUnavailableError::new("no capture device configured"))
    }

    fn capture_frame(&self) -> Option<Frame> {
        None
    }

    fn release(&self) {}
}

/// Decides whether a frame shows a known child.
pub trait FrameMatcher: Send + Sync {
    fn check(&self, frame: &Frame) -> Option<UserId>;
}

/// Matcher stand-in: looks at every frame and never recognises anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderMatcher;

impl FrameMatcher for PlaceholderMatcher {
    fn check(&self, frame: &Frame) -> Option<UserId> {
        debug!(bytes = frame.as_bytes().len(), "looking for a face match");
        None
    }
}
