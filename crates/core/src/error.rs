use thiserror::Error;

use crate::model::{ParseAvatarError, ParseIdError, ParseUnitError, UserNameError};
use crate::screen::InvalidScreenError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidScreen(#[from] InvalidScreenError),
    #[error(transparent)]
    UserName(#[from] UserNameError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Unit(#[from] ParseUnitError),
    #[error(transparent)]
    Avatar(#[from] ParseAvatarError),
}
