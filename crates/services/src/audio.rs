use std::fmt;

use tracing::debug;

/// Sound effects the navigator asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// A child logged in.
    Success,
    /// A unit was finished.
    Celebration,
}

impl AudioCue {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::Success => "success",
            AudioCue::Celebration => "celebration",
        }
    }
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fire-and-forget sound playback. Implementations must not block and never
/// report failures back.
pub trait AudioPlayer: Send + Sync {
    fn play(&self, cue: AudioCue);
}

/// Player that only logs the cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play(&self, cue: AudioCue) {
        debug!(%cue, "audio cue (silent)");
    }
}
