use std::fs;
use std::io::{self, Stdout};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use arcade_launcher::app::Launcher;
use arcade_launcher::cli::Cli;
use arcade_launcher::config::Config;
use arcade_launcher::error::StartupError;
use arcade_launcher::event::TerminalEvents;
use arcade_launcher::game_loop::GameLoop;
use arcade_launcher::logging;
use arcade_launcher::scores::{Leaderboard, LEADERBOARD_FILE};
use arcade_launcher::theme::ThemeProvider;

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> Result<Tui, StartupError> {
    enable_raw_mode().map_err(StartupError::Terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(StartupError::Terminal)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(StartupError::Terminal)?;
    terminal.clear().map_err(StartupError::Terminal)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, source, parse_warning) = match &cli.config {
        Some(path) => {
            let config = Config::load_from_file(path)?;
            (config, path.clone(), None)
        }
        None => {
            let path = cli.default_config_path();
            let (config, warning) = Config::load_or_default(&path);
            (config, path, warning)
        }
    };
    cli.apply(&mut config);
    let warnings = config.sanitize();

    let data_dir = config.data_dir();
    let dir_error = fs::create_dir_all(&data_dir).err();
    let log_path = logging::init(&data_dir, &config.log_level);

    info!("arcade v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &log_path {
        info!("logging to {}", path.display());
    }
    info!("config source {}", source.display());
    if let Some(e) = dir_error {
        warn!("cannot create data dir {}: {e}", data_dir.display());
    }
    if let Some(w) = parse_warning {
        warn!("{w}; using defaults");
    }
    for w in &warnings {
        warn!("config: {w}");
    }

    let mut themes = ThemeProvider::load(&data_dir, &config.theme);
    if let Some(name) = &cli.theme {
        if !themes.select(name) {
            warn!("unknown theme {name:?} requested on the command line");
        }
    }
    let leaderboard = Leaderboard::load(data_dir.join(LEADERBOARD_FILE), config.leaderboard_capacity);

    let game_loop = GameLoop::new(config.tick());
    let mut events = TerminalEvents::new(game_loop.tick());
    let mut launcher = Launcher::new(config, leaderboard, themes);

    let mut terminal = setup_terminal().context("cannot start the terminal UI")?;
    let result = game_loop.run(&mut terminal, &mut events, &mut launcher);
    let restored = restore_terminal(&mut terminal);

    if let Err(e) = &result {
        error!("game loop failed: {e}");
    }
    info!("arcade shutting down");
    result.context("game loop failed")?;
    restored.context("failed to restore the terminal")?;
    Ok(())
}
