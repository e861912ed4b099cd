use eco_core::Screen;
use eco_core::model::{UnitKey, UserProfile};

/// State of the running app: which screen is up, who is playing and where
/// they are inside a unit.
///
/// Owned by the `Navigator`; everyone else gets a shared reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    current_screen: Screen,
    current_user: Option<UserProfile>,
    current_unit: Option<UnitKey>,
    current_activity: u8,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_screen: Screen::Loading,
            current_user: None,
            current_unit: None,
            current_activity: 0,
        }
    }

    #[must_use]
    pub fn current_screen(&self) -> Screen {
        self.current_screen
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&UserProfile> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub fn current_unit(&self) -> Option<UnitKey> {
        self.current_unit
    }

    /// Index of the activity being played. Meaningful only while a unit is
    /// active.
    #[must_use]
    pub fn current_activity(&self) -> u8 {
        self.current_activity
    }

    pub(crate) fn current_user_mut(&mut self) -> Option<&mut UserProfile> {
        self.current_user.as_mut()
    }

    pub(crate) fn set_screen(&mut self, screen: Screen) {
        self.current_screen = screen;
    }

    /// Replaces the logged-in user and drops any unit cursors.
    pub(crate) fn login(&mut self, user: UserProfile) {
        self.current_user = Some(user);
        self.clear_unit();
    }

    pub(crate) fn logout(&mut self) {
        self.current_user = None;
        self.clear_unit();
    }

    pub(crate) fn begin_unit(&mut self, unit: UnitKey) {
        self.current_unit = Some(unit);
        self.current_activity = 0;
    }

    /// Moves to the next activity and returns its index.
    pub(crate) fn advance_activity(&mut self) -> u8 {
        self.current_activity = self.current_activity.saturating_add(1);
        self.current_activity
    }

    pub(crate) fn clear_unit(&mut self) {
        self.current_unit = None;
        self.current_activity = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::model::{Avatar, UserId, UserName};
    use eco_core::time::fixed_now;

    fn profile() -> UserProfile {
        UserProfile::register(
            UserId::new("1").unwrap(),
            UserName::new("Ana").unwrap(),
            Avatar::Girl,
            None,
            fixed_now(),
        )
    }

    #[test]
    fn starts_on_loading_with_nobody() {
        let session = Session::new();
        assert_eq!(session.current_screen(), Screen::Loading);
        assert!(session.current_user().is_none());
        assert!(session.current_unit().is_none());
    }

    #[test]
    fn logout_clears_user_and_cursors() {
        let mut session = Session::new();
        session.login(profile());
        session.begin_unit(UnitKey::A);
        session.advance_activity();
        assert_eq!(session.current_activity(), 1);

        session.logout();
        assert!(session.current_user().is_none());
        assert!(session.current_unit().is_none());
        assert_eq!(session.current_activity(), 0);
    }
}
