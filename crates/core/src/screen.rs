use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown screen: {name:?}")]
pub struct InvalidScreenError {
    pub name: String,
}

/// Every screen the app can show. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Loading,
    Welcome,
    Login,
    Menu,
    VocalActivity,
    ProgressView,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Loading,
        Screen::Welcome,
        Screen::Login,
        Screen::Menu,
        Screen::VocalActivity,
        Screen::ProgressView,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Loading => "loading",
            Screen::Welcome => "welcome",
            Screen::Login => "login",
            Screen::Menu => "menu",
            Screen::VocalActivity => "vocal-activity",
            Screen::ProgressView => "progress-view",
        }
    }

    /// Where the app goes once the loading screen is done.
    ///
    /// Returning children go straight to login; a fresh install starts on the
    /// welcome screen.
    #[must_use]
    pub fn after_loading(has_profiles: bool) -> Self {
        if has_profiles {
            Screen::Login
        } else {
            Screen::Welcome
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = InvalidScreenError;

    /// Accepts both `menu` and the element-id form `menu-screen`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.strip_suffix("-screen").unwrap_or(s);
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == key)
            .ok_or_else(|| InvalidScreenError { name: s.to_owned() })
    }
}
