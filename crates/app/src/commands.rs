//! Parsing of the interactive shell's input lines.

use std::fmt;

use eco_core::model::{MAX_STARS, ParseUnitError, UnitKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the welcome screen for login.
    Start,
    /// Pick a listed profile by its 1-based position.
    Pick(usize),
    /// Register a new child; `None` or a blank name cancels.
    New(Option<String>),
    Unit(UnitKey),
    Done(u8),
    Menu,
    Progress,
    Logout,
    Go(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str },
    InvalidIndex(String),
    InvalidUnit(ParseUnitError),
    InvalidStars(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => f.write_str("type a command, or `help`"),
            CommandError::Unknown(word) => write!(f, "unknown command: {word}"),
            CommandError::MissingArgument { command } => write!(f, "{command} needs a value"),
            CommandError::InvalidIndex(raw) => write!(f, "not a profile number: {raw}"),
            CommandError::InvalidUnit(err) => write!(f, "{err}"),
            CommandError::InvalidStars(raw) => {
                write!(f, "stars must be 0 to {MAX_STARS}, got {raw}")
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "start" => Ok(Command::Start),
            "pick" => {
                let raw = required(rest, "pick")?;
                raw.parse::<usize>()
                    .ok()
                    .filter(|n| *n > 0)
                    .map(Command::Pick)
                    .ok_or_else(|| CommandError::InvalidIndex(raw.to_owned()))
            }
            "new" => Ok(Command::New((!rest.is_empty()).then(|| rest.to_owned()))),
            "unit" => required(rest, "unit")?
                .parse::<UnitKey>()
                .map(Command::Unit)
                .map_err(CommandError::InvalidUnit),
            "done" => {
                let raw = required(rest, "done")?;
                raw.parse::<u8>()
                    .ok()
                    .filter(|stars| *stars <= MAX_STARS)
                    .map(Command::Done)
                    .ok_or_else(|| CommandError::InvalidStars(raw.to_owned()))
            }
            "menu" => Ok(Command::Menu),
            "progress" => Ok(Command::Progress),
            "logout" => Ok(Command::Logout),
            "go" => Ok(Command::Go(required(rest, "go")?.to_owned())),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command })
    } else {
        Ok(rest)
    }
}

pub const HELP: &str = "\
Commands:
  start            leave the welcome screen
  pick <n>         log in as profile number n
  new [name]       register a new child
  unit <a|e|i|o|u> play a vowel
  done <0-4>       finish the current activity with that many stars
  menu             back to the vowel menu
  progress         show my stars
  logout           switch child
  go <screen>      jump to a screen by name
  quit             exit";
