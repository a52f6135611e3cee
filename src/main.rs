use clap::{error::ErrorKind, CommandFactory, Parser};
use codetype::{
    app::App,
    app_dirs::AppDirs,
    catalog::{Catalog, Difficulty},
    config::{normalize_username, Config, ConfigStore, FileConfigStore},
    input::{action_for_key, Action},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    score_store::{FileScoreBackend, ScoreStore},
    session::Session,
    ui::{leaderboard_line, GameScreen, NameEntryScreen, View},
};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
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

type TuiApp = App<View, FileScoreBackend>;

/// type code snippets against the clock
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type code snippets of increasing difficulty against a countdown. Speed and accuracy of every finished snippet land on a local leaderboard."
)]
pub struct Cli {
    /// name shown on the leaderboard (asked for at startup when omitted)
    #[clap(short = 'u', long)]
    username: Option<String>,

    /// difficulty to start with
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seconds allowed per snippet
    #[clap(short = 't', long)]
    time_limit: Option<u32>,

    /// score log location (defaults to the state directory)
    #[clap(long)]
    scores_file: Option<PathBuf>,

    /// forget all recorded scores before starting
    #[clap(long)]
    reset_scores: bool,

    /// print the recent scores and exit
    #[clap(long)]
    print_scores: bool,
}

impl Cli {
    /// Command line flags take precedence over the config file
    fn apply_to(&self, mut cfg: Config) -> Config {
        if let Some(ref name) = self.username {
            cfg.username = Some(name.clone());
        }
        if let Some(d) = self.difficulty {
            cfg.difficulty = d;
        }
        if let Some(t) = self.time_limit {
            cfg.time_limit_secs = t;
        }
        cfg
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    EnterName(String),
    Typing,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        // logging is best effort
        let _ = logging::init(&log_path);
    }

    let cfg = cli.apply_to(FileConfigStore::new().load());
    tracing::info!("codetype {} starting", env!("CARGO_PKG_VERSION"));

    let backend = cli
        .scores_file
        .as_ref()
        .map(FileScoreBackend::with_path)
        .unwrap_or_else(FileScoreBackend::new);
    let scores = ScoreStore::open(backend, cfg.score_retention);

    if cli.print_scores {
        for record in scores.leaderboard(cfg.leaderboard_depth) {
            println!("{}", leaderboard_line(record));
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let username = cfg.username.as_deref().map(normalize_username);
    let session = Session::new(
        Catalog::embedded(),
        username.clone().unwrap_or_default(),
        cfg.time_limit_secs,
    );
    let mut app = App::new(session, scores, View::default(), cfg.leaderboard_depth);
    if cli.reset_scores {
        app.clear_scores();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mode = match username {
        Some(_) => {
            app.start(cfg.difficulty);
            Mode::Typing
        }
        None => Mode::EnterName(String::new()),
    };
    let res = start_tui(&mut terminal, &mut app, mode, cfg.difficulty);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut TuiApp,
    mut mode: Mode,
    difficulty: Difficulty,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        draw(terminal, app, &mode)?;

        let mut started = false;
        match runner.step() {
            AppEvent::Tick => {
                if matches!(mode, Mode::Typing) {
                    app.on_tick();
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => match &mut mode {
                Mode::EnterName(name) => match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Enter => {
                        let username = normalize_username(name);
                        tracing::info!("playing as {}", username);
                        app.session.set_username(username);
                        app.start(difficulty);
                        started = true;
                    }
                    KeyCode::Backspace => {
                        name.pop();
                    }
                    KeyCode::Char(c) => name.push(c),
                    _ => {}
                },
                Mode::Typing => match action_for_key(key) {
                    Some(Action::Quit) => break,
                    Some(action) => app.apply(action),
                    None => {}
                },
            },
        }
        if started {
            mode = Mode::Typing;
        }
    }

    Ok(())
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &TuiApp, mode: &Mode) -> io::Result<()> {
    terminal.draw(|f| match mode {
        Mode::EnterName(name) => {
            f.render_widget(NameEntryScreen { name: name.as_str() }, f.area())
        }
        Mode::Typing => f.render_widget(
            GameScreen {
                view: &app.presenter,
                input: app.session.input(),
                difficulty: app.session.difficulty(),
                username: app.session.username(),
            },
            f.area(),
        ),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["codetype"]);

        assert_eq!(cli.username, None);
        assert_eq!(cli.difficulty, None);
        assert_eq!(cli.time_limit, None);
        assert!(!cli.reset_scores);
        assert!(!cli.print_scores);
    }

    #[test]
    fn test_cli_difficulty() {
        let cli = Cli::parse_from(["codetype", "-d", "hard"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));

        let cli = Cli::parse_from(["codetype", "--difficulty", "medium"]);
        assert_eq!(cli.difficulty, Some(Difficulty::Medium));
    }

    #[test]
    fn test_cli_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["codetype", "-d", "extreme"]).is_err());
    }

    #[test]
    fn test_cli_username_and_time_limit() {
        let cli = Cli::parse_from(["codetype", "-u", "ada", "-t", "60"]);
        assert_eq!(cli.username.as_deref(), Some("ada"));
        assert_eq!(cli.time_limit, Some(60));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["codetype", "-d", "hard", "-t", "45"]);
        let cfg = cli.apply_to(Config {
            username: Some("from-file".into()),
            ..Config::default()
        });

        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert_eq!(cfg.time_limit_secs, 45);
        assert_eq!(cfg.username.as_deref(), Some("from-file"));
        assert_eq!(cfg.leaderboard_depth, 5);
    }

    #[test]
    fn test_cli_scores_flags() {
        let cli = Cli::parse_from([
            "codetype",
            "--scores-file",
            "/tmp/s.json",
            "--reset-scores",
            "--print-scores",
        ]);
        assert_eq!(cli.scores_file, Some(PathBuf::from("/tmp/s.json")));
        assert!(cli.reset_scores);
        assert!(cli.print_scores);
    }
}
