mod avatar;
mod ids;
mod profile;
mod unit;

pub use avatar::{Avatar, ParseAvatarError};
pub use ids::{ParseIdError, UserId};
pub use profile::{FaceSnapshot, UserName, UserNameError, UserProfile};
pub use unit::{
    ACTIVITIES_PER_UNIT, MAX_STARS, ParseUnitError, ProgressBook, UnitKey, UnitProgress,
};
