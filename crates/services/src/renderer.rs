use eco_core::model::UserProfile;
use eco_core::{Screen, Summary};

/// UI layer driven by the navigator.
///
/// The navigator decides what is shown; implementations only draw it.
pub trait Renderer: Send + Sync {
    /// Hides a screen that is being left.
    fn deactivate_screen(&self, screen: Screen);

    /// Shows the screen that just became current.
    fn activate_screen(&self, screen: Screen);

    /// Profile cards on the login screen, in registration order.
    fn render_profiles(&self, profiles: &[UserProfile]);

    /// Replaces the camera preview with a notice that the camera is off.
    fn render_camera_error(&self);

    fn render_summary(&self, summary: &Summary);

    /// Short toast message.
    fn show_message(&self, message: &str);

    fn show_celebration(&self, message: &str);

    /// Plain-language error text.
    fn show_error(&self, message: &str);
}
