//! Progress aggregation shown on the menu and progress screens.

use serde::{Deserialize, Serialize};

use crate::model::{ACTIVITIES_PER_UNIT, MAX_STARS, UnitKey, UnitProgress, UserProfile};

/// Activities across all units (5 units x 4 activities).
pub const TOTAL_ACTIVITIES: u32 = UnitKey::ALL.len() as u32 * ACTIVITIES_PER_UNIT as u32;

/// Rendering data for a single unit card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub unit: UnitKey,
    pub completed: u8,
    pub filled_stars: u8,
    pub empty_stars: u8,
    /// `completed/4`, e.g. `"2/4"`.
    pub ratio: String,
}

impl UnitSummary {
    #[must_use]
    pub fn from_progress(unit: UnitKey, progress: UnitProgress) -> Self {
        Self {
            unit,
            completed: progress.completed(),
            filled_stars: progress.stars(),
            empty_stars: MAX_STARS - progress.stars(),
            ratio: format!("{}/{}", progress.completed(), ACTIVITIES_PER_UNIT),
        }
    }
}

/// Read-only aggregate of a profile's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub overall_percentage: u8,
    pub units: Vec<UnitSummary>,
}

impl Summary {
    #[must_use]
    pub fn for_profile(profile: &UserProfile) -> Self {
        let progress = profile.progress();
        Self {
            overall_percentage: overall_percentage(progress.total_completed()),
            units: progress
                .iter()
                .map(|(unit, p)| UnitSummary::from_progress(unit, p))
                .collect(),
        }
    }

    #[must_use]
    pub fn unit(&self, unit: UnitKey) -> Option<&UnitSummary> {
        self.units.iter().find(|u| u.unit == unit)
    }
}

/// `round(100 * completed / 20)`, rounding halves up. Saturates at 100.
#[must_use]
pub fn overall_percentage(completed: u32) -> u8 {
    let completed = completed.min(TOTAL_ACTIVITIES);
    let pct = (200 * completed + TOTAL_ACTIVITIES) / (2 * TOTAL_ACTIVITIES);
    u8::try_from(pct).unwrap_or(100)
}
