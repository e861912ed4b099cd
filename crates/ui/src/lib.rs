#![forbid(unsafe_code)]

pub mod terminal;
pub mod vm;

pub use terminal::{TerminalAudio, TerminalRenderer, screen_title};
