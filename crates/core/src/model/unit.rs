use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Activities available in each unit.
pub const ACTIVITIES_PER_UNIT: u8 = 4;

/// Best rating a unit can carry.
pub const MAX_STARS: u8 = 4;

//
// ─── UNIT KEYS ─────────────────────────────────────────────────────────────────
//

/// One of the five vowel units a child works through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKey {
    A,
    E,
    I,
    O,
    U,
}

impl UnitKey {
    pub const ALL: [UnitKey; 5] = [UnitKey::A, UnitKey::E, UnitKey::I, UnitKey::O, UnitKey::U];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKey::A => "a",
            UnitKey::E => "e",
            UnitKey::I => "i",
            UnitKey::O => "o",
            UnitKey::U => "u",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit: {0:?}")]
pub struct ParseUnitError(pub String);

impl FromStr for UnitKey {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(UnitKey::A),
            "e" => Ok(UnitKey::E),
            "i" => Ok(UnitKey::I),
            "o" => Ok(UnitKey::O),
            "u" => Ok(UnitKey::U),
            _ => Err(ParseUnitError(s.to_owned())),
        }
    }
}

//
// ─── UNIT PROGRESS ─────────────────────────────────────────────────────────────
//

/// Completion count and best star rating for one unit.
///
/// Both fields stay within `0..=4`; values outside that range are clamped on
/// the way in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUnitProgress")]
pub struct UnitProgress {
    completed: u8,
    stars: u8,
}

#[derive(Deserialize)]
struct RawUnitProgress {
    completed: u8,
    stars: u8,
}

impl From<RawUnitProgress> for UnitProgress {
    fn from(raw: RawUnitProgress) -> Self {
        Self::new(raw.completed, raw.stars)
    }
}

impl UnitProgress {
    #[must_use]
    pub fn new(completed: u8, stars: u8) -> Self {
        Self {
            completed: completed.min(ACTIVITIES_PER_UNIT),
            stars: stars.min(MAX_STARS),
        }
    }

    #[must_use]
    pub fn completed(&self) -> u8 {
        self.completed
    }

    #[must_use]
    pub fn stars(&self) -> u8 {
        self.stars
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed >= ACTIVITIES_PER_UNIT
    }

    /// Records one finished activity.
    ///
    /// Bumps `completed` and raises `stars` to `stars_earned` if higher. Once
    /// all activities are done, further calls leave the unit untouched.
    /// Returns `true` if anything changed.
    pub fn record(&mut self, stars_earned: u8) -> bool {
        if self.is_complete() {
            return false;
        }
        self.completed += 1;
        self.stars = self.stars.max(stars_earned.min(MAX_STARS));
        true
    }
}

//
// ─── PROGRESS BOOK ─────────────────────────────────────────────────────────────
//

/// Progress for every unit of a profile.
///
/// Backed by a fixed array so no unit can ever be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBook([UnitProgress; 5]);

impl ProgressBook {
    /// All units at zero.
    #[must_use]
    pub fn fresh() -> Self {
        Self::default()
    }

    /// Builds a book from per-unit entries. Units not listed start at zero.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (UnitKey, UnitProgress)>) -> Self {
        let mut book = Self::fresh();
        for (unit, progress) in entries {
            book.0[unit.index()] = progress;
        }
        book
    }

    #[must_use]
    pub fn get(&self, unit: UnitKey) -> UnitProgress {
        self.0[unit.index()]
    }

    pub fn record(&mut self, unit: UnitKey, stars_earned: u8) -> bool {
        self.0[unit.index()].record(stars_earned)
    }

    /// Iterates units in `a e i o u` order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitKey, UnitProgress)> + '_ {
        UnitKey::ALL.into_iter().map(|unit| (unit, self.get(unit)))
    }

    /// Sum of finished activities across all units.
    #[must_use]
    pub fn total_completed(&self) -> u32 {
        self.0.iter().map(|p| u32::from(p.completed)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_out_of_range_values() {
        let p = UnitProgress::new(9, 200);
        assert_eq!(p.completed(), 4);
        assert_eq!(p.stars(), 4);
    }

    #[test]
    fn record_never_leaves_bounds() {
        let mut p = UnitProgress::default();
        for _ in 0..10 {
            p.record(u8::MAX);
        }
        assert_eq!(p.completed(), 4);
        assert_eq!(p.stars(), 4);
    }

    #[test]
    fn stars_never_go_down() {
        let mut p = UnitProgress::default();
        assert!(p.record(3));
        assert!(p.record(1));
        assert_eq!(p.stars(), 3);
        assert_eq!(p.completed(), 2);
    }

    #[test]
    fn replay_at_cap_is_noop() {
        let mut p = UnitProgress::new(4, 1);
        assert!(!p.record(4));
        assert_eq!(p, UnitProgress::new(4, 1));
    }

    #[test]
    fn unit_keys_parse_case_insensitively() {
        assert_eq!("A".parse::<UnitKey>().unwrap(), UnitKey::A);
        assert_eq!(" u ".parse::<UnitKey>().unwrap(), UnitKey::U);
        assert!("y".parse::<UnitKey>().is_err());
    }

    #[test]
    fn book_tracks_units_independently() {
        let mut book = ProgressBook::fresh();
        book.record(UnitKey::E, 2);
        book.record(UnitKey::E, 1);
        assert_eq!(book.get(UnitKey::E), UnitProgress::new(2, 2));
        assert_eq!(book.get(UnitKey::A), UnitProgress::default());
        assert_eq!(book.total_completed(), 2);
        assert_eq!(book.iter().count(), 5);
    }
}
