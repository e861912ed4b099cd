use eco_core::model::{UserId, UserProfile};

use crate::vm::time_fmt::format_date;

/// UI-ready representation of a profile card on the login screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileCardVm {
    pub id: UserId,
    pub avatar: &'static str,
    pub name: String,
    pub joined_str: String,
}

impl ProfileCardVm {
    /// One-line label, e.g. `👧 Ana`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.avatar, self.name)
    }
}

impl From<&UserProfile> for ProfileCardVm {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id().clone(),
            avatar: profile.avatar().symbol(),
            name: profile.name().to_string(),
            joined_str: format_date(profile.created_at()),
        }
    }
}

#[must_use]
pub fn map_profile_cards(profiles: &[UserProfile]) -> Vec<ProfileCardVm> {
    profiles.iter().map(ProfileCardVm::from).collect()
}
