use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Icon shown on a profile card. Chosen once at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Avatar {
    Boy,
    Girl,
    Child,
    Baby,
    Unicorn,
    Bear,
    Panda,
    Lion,
    Tiger,
    Dog,
}

impl Avatar {
    pub const ALL: [Avatar; 10] = [
        Avatar::Boy,
        Avatar::Girl,
        Avatar::Child,
        Avatar::Baby,
        Avatar::Unicorn,
        Avatar::Bear,
        Avatar::Panda,
        Avatar::Lion,
        Avatar::Tiger,
        Avatar::Dog,
    ];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Avatar::Boy => "👦",
            Avatar::Girl => "👧",
            Avatar::Child => "🧒",
            Avatar::Baby => "👶",
            Avatar::Unicorn => "🦄",
            Avatar::Bear => "🐻",
            Avatar::Panda => "🐼",
            Avatar::Lion => "🦁",
            Avatar::Tiger => "🐯",
            Avatar::Dog => "🐶",
        }
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown avatar symbol: {0:?}")]
pub struct ParseAvatarError(pub String);

impl FromStr for Avatar {
    type Err = ParseAvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Avatar::ALL
            .into_iter()
            .find(|avatar| avatar.symbol() == s)
            .ok_or_else(|| ParseAvatarError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_distinct_and_parse_back() {
        for avatar in Avatar::ALL {
            assert_eq!(avatar.symbol().parse::<Avatar>().unwrap(), avatar);
        }
        let symbols: std::collections::HashSet<_> =
            Avatar::ALL.iter().map(|a| a.symbol()).collect();
        assert_eq!(symbols.len(), 10);
    }

    #[test]
    fn rejects_unknown_symbol() {
        assert!("🐸".parse::<Avatar>().is_err());
    }
}
