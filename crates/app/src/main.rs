mod commands;

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eco_core::Screen;
use eco_core::model::ACTIVITIES_PER_UNIT;
use services::{
    ActivityOutcome, AudioPlayer, Collaborators, NavigationError, Navigator, PlaceholderMatcher,
    Renderer, UnavailableCamera,
};
use storage::repository::{ProfileRepository, Storage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{TerminalAudio, TerminalRenderer};

use commands::{Command, CommandError, HELP};

/// How often the shell checks for face matches from the login camera loop.
const FACE_POLL_INTERVAL: Duration = Duration::from_millis(250);

const DEFAULT_DB_PATH: &str = "eco.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--log-level <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:eco.sqlite3");
    eprintln!("  --log-level warn");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ECO_DB_URL, ECO_LOG, RUST_LOG (overrides --log-level)");
}

struct Args {
    db_url: String,
    log_level: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("ECO_DB_URL")
            .ok()
            .map_or_else(|| sqlite_url(DEFAULT_DB_PATH), |raw| sqlite_url(&raw));
        let mut log_level = std::env::var("ECO_LOG").unwrap_or_else(|_| "warn".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = sqlite_url(&value);
                }
                "--log-level" => log_level = require_value(args, "--log-level")?,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self { db_url, log_level }))
    }
}

/// Turns `--db` input (a bare path, `sqlite:<path>` or a full URL) into an
/// absolute `sqlite://` URL so the database does not move with the working
/// directory.
fn sqlite_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }
    let path = Path::new(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("sqlite://{}", absolute.display())
}

/// Directory holding the database file, ignoring any `?mode=...` options.
fn database_dir(db_url: &str) -> Option<&Path> {
    let rest = db_url.strip_prefix("sqlite://")?;
    let file = rest.split_once('?').map_or(rest, |(file, _)| file);
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// SQLite creates the file itself but not missing parent directories.
fn ensure_database_dir(db_url: &str) -> io::Result<()> {
    match database_dir(db_url) {
        Some(dir) => std::fs::create_dir_all(dir),
        None => Ok(()),
    }
}

/// Logs go to stderr so they never interleave with the screen output.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    tracing_subscriber::registry().with(filter).with(layer).init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Maps typed commands onto navigator operations.
struct Shell {
    navigator: Navigator,
    profiles: Arc<dyn ProfileRepository>,
    renderer: Arc<dyn Renderer>,
}

impl Shell {
    fn new(storage: &Storage, renderer: Arc<dyn Renderer>, audio: Arc<dyn AudioPlayer>) -> Self {
        let profiles = Arc::clone(&storage.profiles);
        let navigator = Navigator::new(
            Arc::clone(&profiles),
            Collaborators {
                camera: Arc::new(UnavailableCamera),
                matcher: Arc::new(PlaceholderMatcher),
                audio,
                renderer: Arc::clone(&renderer),
            },
        );
        Self {
            navigator,
            profiles,
            renderer,
        }
    }

    async fn handle(&mut self, command: Command) -> Result<Flow, NavigationError> {
        debug!(?command, "handling command");
        match command {
            Command::Start => self.navigator.go_to(Screen::Login).await?,
            Command::Pick(number) => {
                let profiles = self.profiles.list_profiles().await?;
                match profiles.get(number - 1) {
                    Some(profile) => {
                        let id = profile.id().clone();
                        self.navigator.select_user(&id).await?;
                    }
                    None => self.renderer.show_error("No profile with that number."),
                }
            }
            Command::New(name) => {
                if self.navigator.register_new_user(name.as_deref()).await?.is_none() {
                    self.renderer.show_message("Registration cancelled.");
                }
            }
            Command::Unit(unit) => self.navigator.start_unit(unit).await?,
            Command::Done(stars) => {
                if let ActivityOutcome::Next { activity } =
                    self.navigator.finish_activity(stars).await?
                {
                    self.renderer.show_message(&format!(
                        "Activity {} of {ACTIVITIES_PER_UNIT}",
                        activity + 1
                    ));
                }
            }
            Command::Menu => self.navigator.go_to(Screen::Menu).await?,
            Command::Progress => self.navigator.show_progress().await?,
            Command::Logout => self.navigator.logout().await?,
            Command::Go(name) => self.navigator.go_to_named(&name).await?,
            Command::Help => self.renderer.show_message(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Parses and runs one input line, reporting failures on screen.
    async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(CommandError::Empty) => return Flow::Continue,
            Err(err) => {
                self.renderer.show_error(&err.to_string());
                return Flow::Continue;
            }
        };
        match self.handle(command).await {
            Ok(flow) => flow,
            Err(err) => {
                warn!(%err, "command failed");
                self.renderer.show_error(err.user_message());
                Flow::Continue
            }
        }
    }

    /// Reacts to one read from stdin. Undecodable lines are reported and
    /// skipped; end of input quits.
    async fn handle_input(&mut self, input: io::Result<Option<String>>) -> io::Result<Flow> {
        match input {
            Ok(Some(line)) => Ok(self.handle_line(&line).await),
            Ok(None) => Ok(Flow::Quit),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(%err, "skipping unreadable input line");
                self.renderer.show_error("Sorry, I couldn't read that. Please type it again.");
                Ok(Flow::Continue)
            }
            Err(err) => Err(err),
        }
    }

    async fn poll_face_match(&mut self) {
        if let Err(err) = self.navigator.poll_face_match().await {
            warn!(%err, "face login failed");
            self.renderer.show_error(err.user_message());
        }
    }

    async fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.navigator.start().await?;
        self.renderer.show_message("Type `help` for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut face_poll = tokio::time::interval(FACE_POLL_INTERVAL);

        loop {
            tokio::select! {
                input = lines.next_line() => {
                    if self.handle_input(input).await? == Flow::Quit {
                        break;
                    }
                }
                _ = face_poll.tick() => self.poll_face_match().await,
            }
        }

        self.navigator.shutdown();
        info!("bye");
        Ok(())
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut argv).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })?
    else {
        print_usage();
        return Ok(());
    };

    init_logging(&args.log_level);
    info!(db = %args.db_url, "starting eco");

    ensure_database_dir(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;

    let shell = Shell::new(
        &storage,
        Arc::new(TerminalRenderer::stdout()),
        Arc::new(TerminalAudio::stdout()),
    );
    shell.run().await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
