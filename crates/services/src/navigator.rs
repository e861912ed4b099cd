//! Screen state machine and login flow.

use std::sync::Arc;
use std::time::Duration;

use eco_core::model::{
    ACTIVITIES_PER_UNIT, Avatar, UnitKey, UserId, UserName, UserProfile,
};
use eco_core::{Clock, Screen};
use rand::Rng;
use storage::repository::ProfileRepository;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::audio::{AudioCue, AudioPlayer};
use crate::camera::{Camera, FrameMatcher};
use crate::detection::{DEFAULT_DETECTION_INTERVAL, DetectionHandle, DetectionLoop};
use crate::error::NavigationError;
use crate::progress_service::ProgressTracker;
use crate::renderer::Renderer;
use crate::session::Session;

/// Pacing for the celebratory parts of the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Time spent on the loading screen before the startup decision.
    pub loading_delay: Duration,
    /// Pause after the welcome toast of a new registration.
    pub registration_delay: Duration,
    /// Pause on the celebration before the menu opens.
    pub celebration_delay: Duration,
    /// Gap between sampled camera frames on the login screen.
    pub detection_interval: Duration,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            loading_delay: Duration::from_millis(2_000),
            registration_delay: Duration::from_millis(1_500),
            celebration_delay: Duration::from_millis(2_000),
            detection_interval: DEFAULT_DETECTION_INTERVAL,
        }
    }
}

/// External pieces the navigator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub camera: Arc<dyn Camera>,
    pub matcher: Arc<dyn FrameMatcher>,
    pub audio: Arc<dyn AudioPlayer>,
    pub renderer: Arc<dyn Renderer>,
}

/// What happened after an activity was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOutcome {
    /// More activities remain; `activity` is the index of the next one.
    Next { activity: u8 },
    /// The last activity of the unit was played and the menu is showing.
    UnitFinished,
}

/// Owns the `Session` and runs every screen transition.
pub struct Navigator {
    config: NavigatorConfig,
    clock: Clock,
    session: Session,
    profiles: Arc<dyn ProfileRepository>,
    tracker: ProgressTracker,
    camera: Arc<dyn Camera>,
    matcher: Arc<dyn FrameMatcher>,
    audio: Arc<dyn AudioPlayer>,
    renderer: Arc<dyn Renderer>,
    capture: Option<DetectionHandle>,
    /// Matches from the running loop only; replaced on every start.
    matches: Option<UnboundedReceiver<UserId>>,
    camera_live: bool,
}

impl Navigator {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>, collaborators: Collaborators) -> Self {
        Self {
            config: NavigatorConfig::default(),
            clock: Clock::default(),
            session: Session::new(),
            tracker: ProgressTracker::new(Arc::clone(&profiles)),
            profiles,
            camera: collaborators.camera,
            matcher: collaborators.matcher,
            audio: collaborators.audio,
            renderer: collaborators.renderer,
            capture: None,
            matches: None,
            camera_live: false,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Whether the login detection loop is currently running.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.capture.as_ref().is_some_and(DetectionHandle::is_running)
    }

    //
    // ─── STARTUP & TRANSITIONS ─────────────────────────────────────────────────
    //

    /// Shows the loading screen, waits, then routes to `login` if any profile
    /// exists and to `welcome` otherwise. An unreadable store is reported and
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Storage` if the login screen cannot list the
    /// profiles it just counted.
    pub async fn start(&mut self) -> Result<Screen, NavigationError> {
        info!("starting");
        self.renderer.activate_screen(self.session.current_screen());
        tokio::time::sleep(self.config.loading_delay).await;

        let target = match self.profiles.count_profiles().await {
            Ok(count) => Screen::after_loading(count > 0),
            Err(err) => {
                warn!(%err, "profile store unreadable, starting on welcome");
                self.renderer
                    .show_error(NavigationError::from(err).user_message());
                Screen::Welcome
            }
        };
        self.go_to(target).await?;
        Ok(target)
    }

    /// Parses `name` and navigates there.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidScreen` for unknown names; the current
    /// screen is left untouched. Other errors as in [`Navigator::go_to`].
    pub async fn go_to_named(&mut self, name: &str) -> Result<(), NavigationError> {
        let target = name.parse::<Screen>().inspect_err(|err| {
            warn!(%err, "ignoring navigation request");
        })?;
        self.go_to(target).await
    }

    /// Leaves the current screen and enters `target`, running exit and entry
    /// actions. Re-entering the current screen re-runs its entry actions.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveUser` for screens that need a
    /// logged-in child and `NavigationError::NoActiveUnit` for the activity
    /// screen without a unit. Neither changes state.
    pub async fn go_to(&mut self, target: Screen) -> Result<(), NavigationError> {
        self.check_preconditions(target)?;

        let previous = self.session.current_screen();
        info!(from = %previous, to = %target, "navigating");

        if previous != target {
            self.exit_screen(previous);
            self.renderer.deactivate_screen(previous);
            self.renderer.activate_screen(target);
        }
        self.session.set_screen(target);
        self.enter_screen(target).await
    }

    fn check_preconditions(&self, target: Screen) -> Result<(), NavigationError> {
        match target {
            Screen::Menu | Screen::ProgressView if self.session.current_user().is_none() => {
                Err(NavigationError::NoActiveUser)
            }
            Screen::VocalActivity if self.session.current_user().is_none() => {
                Err(NavigationError::NoActiveUser)
            }
            Screen::VocalActivity if self.session.current_unit().is_none() => {
                Err(NavigationError::NoActiveUnit)
            }
            _ => Ok(()),
        }
    }

    fn exit_screen(&mut self, screen: Screen) {
        match screen {
            Screen::Login => self.stop_capture(),
            Screen::VocalActivity => self.session.clear_unit(),
            _ => {}
        }
    }

    async fn enter_screen(&mut self, screen: Screen) -> Result<(), NavigationError> {
        match screen {
            Screen::Login => self.enter_login().await,
            Screen::Menu | Screen::ProgressView => {
                let summary = self.tracker.compute_summary(self.session.current_user())?;
                self.renderer.render_summary(&summary);
                Ok(())
            }
            Screen::Loading | Screen::Welcome | Screen::VocalActivity => Ok(()),
        }
    }

    //
    // ─── LOGIN ─────────────────────────────────────────────────────────────────
    //

    async fn enter_login(&mut self) -> Result<(), NavigationError> {
        // Never run two loops at once.
        self.stop_capture();

        match self.camera.acquire().await {
            Ok(()) => {
                self.camera_live = true;
                let (tx, rx) = mpsc::unbounded_channel();
                let handle = DetectionLoop::new(self.config.detection_interval).start(
                    Arc::clone(&self.camera),
                    Arc::clone(&self.matcher),
                    tx,
                );
                self.capture = Some(handle);
                self.matches = Some(rx);
            }
            Err(err) => {
                warn!(%err, "camera unavailable, falling back to profile pick");
                self.renderer.render_camera_error();
            }
        }

        let profiles = self.profiles.list_profiles().await?;
        self.renderer.render_profiles(&profiles);
        Ok(())
    }

    /// Stops the detection loop and releases the camera. Matches the loop
    /// queued but nobody polled yet are discarded. Safe to call at any time,
    /// any number of times.
    pub fn stop_capture(&mut self) {
        if let Some(mut handle) = self.capture.take() {
            handle.stop();
        }
        if let Some(mut rx) = self.matches.take() {
            rx.close();
            let mut dropped = 0_usize;
            while rx.try_recv().is_ok() {
                dropped += 1;
            }
            if dropped > 0 {
                debug!(dropped, "discarded stale face matches");
            }
        }
        if self.camera_live {
            self.camera.release();
            self.camera_live = false;
            debug!("camera released");
        }
    }

    /// Logs in the profile with `id`, as if its card had been tapped.
    ///
    /// Returns `Ok(false)` and does nothing if no such profile exists.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Storage` if the store cannot be read.
    pub async fn select_user(&mut self, id: &UserId) -> Result<bool, NavigationError> {
        let Some(profile) = self.profiles.get_profile(id).await? else {
            warn!(user = %id, "selected profile does not exist");
            return Ok(false);
        };
        info!(user = %id, name = %profile.name(), "profile selected");
        self.complete_login(profile).await?;
        Ok(true)
    }

    /// Handles a face match reported by the detection loop, if one is
    /// pending and the login screen is still up.
    ///
    /// # Errors
    ///
    /// As in [`Navigator::select_user`].
    pub async fn poll_face_match(&mut self) -> Result<bool, NavigationError> {
        let Some(id) = self.matches.as_mut().and_then(|rx| rx.try_recv().ok()) else {
            return Ok(false);
        };
        if self.session.current_screen() != Screen::Login {
            debug!(user = %id, "dropping face match outside login");
            return Ok(false);
        }
        self.select_user(&id).await
    }

    /// Registers a new child and logs them in.
    ///
    /// A missing or blank name cancels registration without side effects and
    /// returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::Storage` if the profile cannot be saved.
    pub async fn register_new_user(
        &mut self,
        name: Option<&str>,
    ) -> Result<Option<UserId>, NavigationError> {
        let Some(Ok(name)) = name.map(UserName::new) else {
            debug!("registration cancelled");
            return Ok(None);
        };

        let snapshot = if self.camera_live {
            self.camera.capture_frame().map(|frame| frame.into_snapshot())
        } else {
            None
        };
        let avatar = Avatar::ALL[rand::rng().random_range(0..Avatar::ALL.len())];
        let profile = UserProfile::register(
            UserId::generate(),
            name,
            avatar,
            snapshot,
            self.clock.now(),
        );
        self.profiles.upsert_profile(&profile).await?;
        info!(user = %profile.id(), name = %profile.name(), "profile registered");

        let id = profile.id().clone();
        self.renderer
            .show_message(&format!("Welcome {}!", profile.name()));
        tokio::time::sleep(self.config.registration_delay).await;
        self.complete_login(profile).await?;
        Ok(Some(id))
    }

    async fn complete_login(&mut self, profile: UserProfile) -> Result<(), NavigationError> {
        // Capture must be down before the session changes hands.
        self.stop_capture();
        let greeting = format!("Hello {}!", profile.name());
        self.session.login(profile);

        self.audio.play(AudioCue::Success);
        self.renderer.show_celebration(&greeting);
        tokio::time::sleep(self.config.celebration_delay).await;
        self.go_to(Screen::Menu).await
    }

    /// Logs the current child out and returns to the login screen.
    ///
    /// # Errors
    ///
    /// As in [`Navigator::go_to`].
    pub async fn logout(&mut self) -> Result<(), NavigationError> {
        self.stop_capture();
        if let Some(user) = self.session.current_user() {
            info!(user = %user.id(), "logging out");
        }
        self.session.logout();
        self.go_to(Screen::Login).await
    }

    //
    // ─── LEARNING ──────────────────────────────────────────────────────────────
    //

    /// Opens the first activity of `unit`.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveUser` if nobody is logged in.
    pub async fn start_unit(&mut self, unit: UnitKey) -> Result<(), NavigationError> {
        if self.session.current_user().is_none() {
            return Err(NavigationError::NoActiveUser);
        }
        info!(%unit, "starting unit");
        self.session.begin_unit(unit);
        self.go_to(Screen::VocalActivity).await
    }

    /// Records the activity just played and moves on. After the last
    /// activity of the unit the menu is shown again.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::NoActiveUnit` outside a unit and
    /// `NavigationError::Progress` if progress cannot be saved.
    pub async fn finish_activity(
        &mut self,
        stars_earned: u8,
    ) -> Result<ActivityOutcome, NavigationError> {
        let unit = self
            .session
            .current_unit()
            .ok_or(NavigationError::NoActiveUnit)?;
        let user = self
            .session
            .current_user_mut()
            .ok_or(NavigationError::NoActiveUser)?;
        self.tracker
            .record_completion(user, unit, stars_earned)
            .await?;
        let unit_complete = user.progress().get(unit).is_complete();

        let next = self.session.advance_activity();
        if next < ACTIVITIES_PER_UNIT {
            return Ok(ActivityOutcome::Next { activity: next });
        }

        if unit_complete {
            self.audio.play(AudioCue::Celebration);
            self.renderer.show_celebration(&format!(
                "You finished the letter {}!",
                unit.as_str().to_uppercase()
            ));
        }
        self.go_to(Screen::Menu).await?;
        Ok(ActivityOutcome::UnitFinished)
    }

    /// Opens the progress screen.
    ///
    /// # Errors
    ///
    /// As in [`Navigator::go_to`].
    pub async fn show_progress(&mut self) -> Result<(), NavigationError> {
        self.go_to(Screen::ProgressView).await
    }

    /// Releases background work before the process exits.
    pub fn shutdown(&mut self) {
        self.stop_capture();
        info!("navigator shut down");
    }
}
