//! Line-oriented renderer for running the app in a terminal.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use eco_core::model::UserProfile;
use eco_core::{Screen, Summary};
use services::{AudioCue, AudioPlayer, Renderer};
use tracing::{trace, warn};

use crate::vm::{map_profile_cards, map_summary};

#[must_use]
pub fn screen_title(screen: Screen) -> &'static str {
    match screen {
        Screen::Loading => "Loading...",
        Screen::Welcome => "Welcome to ECO!",
        Screen::Login => "Who is playing?",
        Screen::Menu => "Pick a vowel",
        Screen::VocalActivity => "Let's practise",
        Screen::ProgressView => "My stars",
    }
}

/// Writes every screen change and toast as plain lines to `W`.
pub struct TerminalRenderer<W> {
    out: Mutex<W>,
}

impl TerminalRenderer<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let result = lines
            .into_iter()
            .try_for_each(|line| writeln!(out, "{}", line.as_ref()))
            .and_then(|()| out.flush());
        if let Err(err) = result {
            warn!(%err, "failed to write to terminal");
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn deactivate_screen(&self, screen: Screen) {
        trace!(%screen, "screen hidden");
    }

    fn activate_screen(&self, screen: Screen) {
        self.write_lines([format!("== {} ==", screen_title(screen))]);
    }

    fn render_profiles(&self, profiles: &[UserProfile]) {
        if profiles.is_empty() {
            self.write_lines(["No profiles yet. Type `new <name>` to join."]);
            return;
        }
        let lines = map_profile_cards(profiles)
            .into_iter()
            .enumerate()
            .map(|(i, card)| format!("  {}. {}", i + 1, card.label()));
        self.write_lines(lines);
    }

    fn render_camera_error(&self) {
        self.write_lines(["Camera unavailable. Pick your profile below."]);
    }

    fn render_summary(&self, summary: &Summary) {
        let vm = map_summary(summary);
        let header = format!("Progress: {}", vm.percentage_str);
        let units = vm
            .units
            .iter()
            .map(|unit| format!("  {} {} {}", unit.letter, unit.stars, unit.ratio));
        self.write_lines(std::iter::once(header).chain(units));
    }

    fn show_message(&self, message: &str) {
        self.write_lines([message]);
    }

    fn show_celebration(&self, message: &str) {
        self.write_lines([format!("🎉 {message}")]);
    }

    fn show_error(&self, message: &str) {
        self.write_lines([format!("! {message}")]);
    }
}

/// Stands in for sound effects by printing the cue name.
pub struct TerminalAudio<W> {
    out: Mutex<W>,
}

impl TerminalAudio<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalAudio<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> AudioPlayer for TerminalAudio<W> {
    fn play(&self, cue: AudioCue) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = writeln!(out, "♪ {cue}") {
            warn!(%err, %cue, "failed to play cue");
        }
    }
}
