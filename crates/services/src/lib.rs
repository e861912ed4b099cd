#![forbid(unsafe_code)]

pub mod audio;
pub mod camera;
pub mod detection;
pub mod error;
pub mod navigator;
pub mod progress_service;
pub mod renderer;
pub mod session;

#[cfg(test)]
mod testing;

pub use eco_core::Clock;

pub use audio::{AudioCue, AudioPlayer, SilentAudio};
pub use camera::{Camera, Frame, FrameMatcher, PlaceholderMatcher, UnavailableCamera};
pub use detection::{DetectionHandle, DetectionLoop};
pub use error::{CameraUnavailableError, NavigationError, ProgressError};
pub use navigator::{ActivityOutcome, Collaborators, Navigator, NavigatorConfig};
pub use progress_service::ProgressTracker;
pub use renderer::Renderer;
pub use session::Session;
