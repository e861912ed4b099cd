use eco_core::model::ACTIVITIES_PER_UNIT;
use eco_core::{Summary, UnitSummary};

const FILLED_STAR: &str = "⭐";
const EMPTY_STAR: &str = "☆";

/// One unit card on the menu or progress screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitCardVm {
    /// Upper-case vowel shown on the card.
    pub letter: String,
    pub stars: String,
    pub ratio: String,
    pub complete: bool,
}

impl From<&UnitSummary> for UnitCardVm {
    fn from(unit: &UnitSummary) -> Self {
        Self {
            letter: unit.unit.as_str().to_uppercase(),
            stars: star_row(unit.filled_stars, unit.empty_stars),
            ratio: unit.ratio.clone(),
            complete: unit.completed >= ACTIVITIES_PER_UNIT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub percentage_str: String,
    pub units: Vec<UnitCardVm>,
}

#[must_use]
pub fn map_summary(summary: &Summary) -> SummaryVm {
    SummaryVm {
        percentage_str: format!("{}%", summary.overall_percentage),
        units: summary.units.iter().map(UnitCardVm::from).collect(),
    }
}

#[must_use]
pub fn star_row(filled: u8, empty: u8) -> String {
    let mut row = FILLED_STAR.repeat(usize::from(filled));
    row.push_str(&EMPTY_STAR.repeat(usize::from(empty)));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::model::{
        Avatar, ProgressBook, UnitKey, UnitProgress, UserId, UserName, UserProfile,
    };
    use eco_core::time::fixed_now;

    #[test]
    fn star_row_always_has_four_glyphs_for_valid_input() {
        assert_eq!(star_row(0, 4), "☆☆☆☆");
        assert_eq!(star_row(3, 1), "⭐⭐⭐☆");
        assert_eq!(star_row(4, 0), "⭐⭐⭐⭐");
    }

    #[test]
    fn maps_sample_summary() {
        let profile = UserProfile::from_persisted(
            UserId::new("1").unwrap(),
            UserName::new("Ana").unwrap(),
            Avatar::Girl,
            None,
            fixed_now(),
            ProgressBook::from_entries([
                (UnitKey::A, UnitProgress::new(4, 3)),
                (UnitKey::E, UnitProgress::new(2, 2)),
            ]),
        );
        let vm = map_summary(&Summary::for_profile(&profile));

        assert_eq!(vm.percentage_str, "30%");
        let letters: Vec<_> = vm.units.iter().map(|u| u.letter.as_str()).collect();
        assert_eq!(letters, ["A", "E", "I", "O", "U"]);

        assert_eq!(vm.units[0].stars, "⭐⭐⭐☆");
        assert_eq!(vm.units[0].ratio, "4/4");
        assert!(vm.units[0].complete);
        assert_eq!(vm.units[1].stars, "⭐⭐☆☆");
        assert!(!vm.units[1].complete);
        assert_eq!(vm.units[4].ratio, "0/4");
    }
}
