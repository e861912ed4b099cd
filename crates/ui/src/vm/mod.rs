mod profile_vm;
mod summary_vm;
mod time_fmt;

pub use profile_vm::{ProfileCardVm, map_profile_cards};
pub use summary_vm::{SummaryVm, UnitCardVm, map_summary, star_row};
