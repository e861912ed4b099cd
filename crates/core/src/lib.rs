#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;
pub mod screen;
pub mod time;

pub use error::Error;
pub use progress::{Summary, UnitSummary};
pub use screen::{InvalidScreenError, Screen};
pub use time::Clock;
