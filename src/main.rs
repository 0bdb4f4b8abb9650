use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    tty::IsTty,
};
use cubetime::{
    app::{App, Control, ReleaseMode},
    config::{load_or_default, Config, ConfigStore, FileConfigStore},
    logging::{self, LogConfig},
    runtime::{CrosstermEventSource, EventSource, RefreshScheduler, Runner, Ticker},
    session::Session,
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// speed-cubing stopwatch with running stats and a solve graph
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Hold the control key to get ready, release to start, press again to stop. Best, average and every solve of the run are shown live, and the graph view plots them."
)]
pub struct Cli {
    /// key that arms, starts and stops the timer (default: space)
    #[clap(short = 'k', long)]
    key: Option<char>,

    /// treat every press as press+release, for terminals that do not report key releases
    #[clap(long)]
    tap: bool,

    /// write logs to this file or directory
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// save the effective settings to the config file before starting
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    /// CLI flags win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(key) = self.key {
            config.control_key = key;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let (mut config, config_err) = load_or_default(&store);
    // the file config is already valid, so only a bad --key can fail here
    cli.apply(&mut config);
    config.validate()?;

    let log_guard = logging::init(LogConfig {
        log_file_path: cli.log_file.clone(),
        filter: config.log_filter.clone(),
    })?;
    if let Some(err) = config_err {
        warn!(%err, "ignoring config file, using defaults");
    }
    if cli.write_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config written");
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let release_mode = if !cli.tap && supports_keyboard_enhancement().unwrap_or(false) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        ReleaseMode::Events
    } else {
        ReleaseMode::Tap
    };
    info!(
        %release_mode,
        key = %config.control_key_name(),
        log_file = %log_guard.log_file.display(),
        "starting"
    );

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let scheduler = RefreshScheduler::default();
    let runner = Runner::new(CrosstermEventSource::new(), scheduler.clone());
    let session = Session::with_monotonic_clock(scheduler);
    let mut app = App::new(session, config.control_key, release_mode);

    let result = start_tui(&mut terminal, &mut app, &runner);

    if release_mode == ReleaseMode::Events {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    info!(solves = app.session.history().len(), "exiting");
    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        // layout is cheap, so every event (tick, key, pointer) redraws
        terminal.draw(|f| ui::draw(app, f))?;

        if app.on_event(runner.step()) == Control::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["cubetime"]).unwrap();

        assert_eq!(cli.key, None);
        assert!(!cli.tap);
        assert_eq!(cli.log_file, None);
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "cubetime",
            "-k",
            "j",
            "--tap",
            "--log-file",
            "/tmp/cubetime.log",
            "--write-config",
        ])
        .unwrap();

        assert_eq!(cli.key, Some('j'));
        assert!(cli.tap);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/cubetime.log")));
        assert!(cli.write_config);
    }

    #[test]
    fn test_cli_rejects_multichar_key() {
        assert!(Cli::try_parse_from(["cubetime", "--key", "jj"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from(["cubetime", "--key", "x"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.control_key, 'x');

        let cli = Cli::try_parse_from(["cubetime"]).unwrap();
        let mut config = Config {
            control_key: 'z',
            ..Config::default()
        };
        cli.apply(&mut config);
        assert_eq!(config.control_key, 'z');
    }

    #[test]
    fn test_cli_key_is_validated() {
        let cli = Cli::try_parse_from(["cubetime", "--key", "\t"]).unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_command_is_valid() {
        Cli::command().debug_assert();
    }
}
