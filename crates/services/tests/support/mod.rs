#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use eco_core::model::{UserId, UserProfile};
use eco_core::{Screen, Summary};
use services::{
    AudioCue, AudioPlayer, Camera, CameraUnavailableError, Collaborators, Frame, FrameMatcher,
    Navigator, NavigatorConfig, Renderer,
};
use storage::repository::InMemoryRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Deactivated(Screen),
    Activated(Screen),
    Profiles(Vec<String>),
    CameraError,
    Summary(Summary),
    Message(String),
    Celebration(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<RenderEvent>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_summary(&self) -> Option<Summary> {
        self.events().into_iter().rev().find_map(|e| match e {
            RenderEvent::Summary(s) => Some(s),
            _ => None,
        })
    }

    fn push(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn deactivate_screen(&self, screen: Screen) {
        self.push(RenderEvent::Deactivated(screen));
    }

    fn activate_screen(&self, screen: Screen) {
        self.push(RenderEvent::Activated(screen));
    }

    fn render_profiles(&self, profiles: &[UserProfile]) {
        self.push(RenderEvent::Profiles(
            profiles.iter().map(|p| p.name().to_string()).collect(),
        ));
    }

    fn render_camera_error(&self) {
        self.push(RenderEvent::CameraError);
    }

    fn render_summary(&self, summary: &Summary) {
        self.push(RenderEvent::Summary(summary.clone()));
    }

    fn show_message(&self, message: &str) {
        self.push(RenderEvent::Message(message.to_owned()));
    }

    fn show_celebration(&self, message: &str) {
        self.push(RenderEvent::Celebration(message.to_owned()));
    }

    fn show_error(&self, message: &str) {
        self.push(RenderEvent::Error(message.to_owned()));
    }
}

#[derive(Default)]
pub struct RecordingAudio {
    cues: Mutex<Vec<AudioCue>>,
}

impl RecordingAudio {
    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues.lock().unwrap().clone()
    }
}

impl AudioPlayer for RecordingAudio {
    fn play(&self, cue: AudioCue) {
        self.cues.lock().unwrap().push(cue);
    }
}

/// Camera double that counts opens/closes and hands out a fixed frame.
pub struct FakeCamera {
    available: bool,
    open: AtomicBool,
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl FakeCamera {
    pub fn working() -> Self {
        Self {
            available: true,
            open: AtomicBool::new(false),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub fn broken() -> Self {
        Self {
            available: false,
            ..Self::working()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn acquire(&self) -> Result<(), CameraUnavailableError> {
        if !self.available {
            return Err(CameraUnavailableError::new("permission denied"));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn capture_frame(&self) -> Option<Frame> {
        self.is_open().then(|| Frame::new(vec![0xff, 0xd8, 0xff, 0xe0]))
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
    }
}

/// Matcher that counts calls and optionally reports a fixed child.
#[derive(Default)]
pub struct ScriptedMatcher {
    pub calls: AtomicUsize,
    answer: Mutex<Option<UserId>>,
}

impl ScriptedMatcher {
    pub fn answering(id: UserId) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            answer: Mutex::new(Some(id)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameMatcher for ScriptedMatcher {
    fn check(&self, _frame: &Frame) -> Option<UserId> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.lock().unwrap().clone()
    }
}

pub const TICK: Duration = Duration::from_secs(2);

pub struct Harness {
    pub navigator: Navigator,
    pub repo: InMemoryRepository,
    pub renderer: Arc<RecordingRenderer>,
    pub audio: Arc<RecordingAudio>,
    pub camera: Arc<FakeCamera>,
    pub matcher: Arc<ScriptedMatcher>,
}

impl Harness {
    pub fn new(camera: FakeCamera) -> Self {
        Self::with_matcher(camera, ScriptedMatcher::default())
    }

    pub fn with_matcher(camera: FakeCamera, matcher: ScriptedMatcher) -> Self {
        let repo = InMemoryRepository::new();
        let renderer = Arc::new(RecordingRenderer::default());
        let audio = Arc::new(RecordingAudio::default());
        let camera = Arc::new(camera);
        let matcher = Arc::new(matcher);

        let navigator = Navigator::new(
            Arc::new(repo.clone()),
            Collaborators {
                camera: camera.clone(),
                matcher: matcher.clone(),
                audio: audio.clone(),
                renderer: renderer.clone(),
            },
        )
        .with_config(NavigatorConfig {
            detection_interval: TICK,
            ..NavigatorConfig::default()
        })
        .with_clock(eco_core::time::fixed_clock());

        Self {
            navigator,
            repo,
            renderer,
            audio,
            camera,
            matcher,
        }
    }
}
