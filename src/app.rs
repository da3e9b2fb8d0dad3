use std::time::Duration;

use crossterm::event::KeyEvent;
use log::{debug, error, info, warn};

use crate::config::Config;
use crate::games::{Game, GameId, GameState};
use crate::input::Input;
use crate::scores::{Leaderboard, MAX_LABEL_LEN};
use crate::theme::{Palette, ThemeProvider};

/// Label typed in after a qualifying run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub buffer: String,
}

impl NameEntry {
    fn push(&mut self, c: char) {
        if self.buffer.chars().count() < MAX_LABEL_LEN && (c.is_ascii_alphanumeric() || c == ' ') {
            self.buffer.push(c.to_ascii_uppercase());
        }
    }
}

/// How a finished run ended up on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Qualified; waiting for a label.
    EnterName(NameEntry),
    /// Recorded at this zero-based rank.
    Ranked(usize),
    NotRanked,
}

/// The shell's phase. Every phase past the menu owns the active game.
pub enum Phase {
    Menu,
    Running(Box<dyn Game>),
    Paused(Box<dyn Game>),
    GameOver(Box<dyn Game>, Outcome),
}

impl Phase {
    pub fn state(&self) -> GameState {
        match self {
            Phase::Menu => GameState::Menu,
            Phase::Running(_) => GameState::Running,
            Phase::Paused(_) => GameState::Paused,
            Phase::GameOver(..) => GameState::GameOver,
        }
    }

    pub fn game(&self) -> Option<&dyn Game> {
        match self {
            Phase::Menu => None,
            Phase::Running(g) | Phase::Paused(g) | Phase::GameOver(g, _) => Some(g.as_ref()),
        }
    }
}

pub struct Launcher {
    config: Config,
    phase: Phase,
    selected: GameId,
    leaderboard: Leaderboard,
    themes: ThemeProvider,
    show_leaderboard: bool,
    notice: Option<String>,
    should_quit: bool,
}

impl Launcher {
    pub fn new(config: Config, leaderboard: Leaderboard, themes: ThemeProvider) -> Self {
        Self {
            config,
            phase: Phase::Menu,
            selected: GameId::Snake,
            leaderboard,
            themes,
            show_leaderboard: false,
            notice: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> GameState {
        self.phase.state()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn selected(&self) -> GameId {
        self.selected
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn themes(&self) -> &ThemeProvider {
        &self.themes
    }

    pub fn palette(&self) -> &Palette {
        self.themes.current()
    }

    pub fn show_leaderboard(&self) -> bool {
        self.show_leaderboard
    }

    /// Last persistence problem worth showing the player.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Construct a fresh instance of `id` and hand it control.
    pub fn start(&mut self, id: GameId) {
        let game = id.create(&self.config);
        self.start_with(game);
    }

    pub fn start_with(&mut self, game: Box<dyn Game>) {
        self.selected = game.id();
        self.show_leaderboard = false;
        info!("starting {}", game.id().title());
        self.phase = Phase::Running(game);
    }

    /// Advance the active game by one fixed step. No-op outside `Running`.
    pub fn update(&mut self, dt: Duration) {
        let Phase::Running(game) = &mut self.phase else {
            return;
        };
        game.update(dt);
        if game.status() == GameState::GameOver {
            self.finish_run();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let Some(input) = Input::from_key(key) else {
            return;
        };
        if input == Input::Quit {
            info!("quit requested");
            self.should_quit = true;
            return;
        }
        match self.phase.state() {
            GameState::Menu => self.on_menu(input),
            GameState::Running => self.on_running(input.intent()),
            GameState::Paused => self.on_paused(input.intent()),
            GameState::GameOver => self.on_game_over(input),
        }
    }

    fn on_menu(&mut self, input: Input) {
        let count = GameId::ALL.len();
        let idx = self.selected.index();
        match input {
            Input::Up | Input::Left => {
                self.selected = GameId::from_index((idx + count - 1) % count).unwrap_or(self.selected);
            }
            Input::Down | Input::Right => {
                self.selected = GameId::from_index((idx + 1) % count).unwrap_or(self.selected);
            }
            Input::Confirm => self.start(self.selected),
            Input::Char(c) => match c.to_ascii_lowercase() {
                'q' => {
                    info!("quit from menu");
                    self.should_quit = true;
                }
                'h' => self.show_leaderboard = !self.show_leaderboard,
                't' => self.cycle_theme(),
                d => {
                    let picked = d
                        .to_digit(10)
                        .and_then(|n| (n as usize).checked_sub(1))
                        .and_then(GameId::from_index);
                    if let Some(id) = picked {
                        self.start(id);
                    }
                }
            },
            Input::Back => self.show_leaderboard = false,
            _ => {}
        }
    }

    fn cycle_theme(&mut self) {
        let name = self.themes.cycle().name.clone();
        info!("theme changed to {name}");
        if let Err(e) = self.themes.save_preference() {
            warn!("could not save theme preference: {e}");
            self.notice = Some(format!("Theme not saved: {e}"));
        }
    }

    fn on_running(&mut self, input: Input) {
        match input {
            Input::Pause => {
                self.transition(|phase| match phase {
                    Phase::Running(g) => Phase::Paused(g),
                    other => other,
                });
                debug!("paused");
            }
            Input::Back => self.to_menu("abandoned"),
            Input::Restart => self.restart(),
            other => {
                if let Phase::Running(game) = &mut self.phase {
                    game.handle_input(other);
                }
            }
        }
    }

    fn on_paused(&mut self, input: Input) {
        match input {
            Input::Pause => {
                self.transition(|phase| match phase {
                    Phase::Paused(g) => Phase::Running(g),
                    other => other,
                });
                debug!("resumed");
            }
            Input::Back => self.to_menu("abandoned while paused"),
            _ => {}
        }
    }

    fn on_game_over(&mut self, input: Input) {
        if let Phase::GameOver(_, Outcome::EnterName(entry)) = &mut self.phase {
            match input {
                Input::Char(c) => entry.push(c),
                Input::Backspace => {
                    entry.buffer.pop();
                }
                Input::Confirm => {
                    let label = entry.buffer.clone();
                    self.record(&label);
                }
                // Skipping still records the score under the default label
                Input::Back => self.record(""),
                _ => {}
            }
            return;
        }
        match input.intent() {
            Input::Confirm | Input::Back => self.to_menu("acknowledged"),
            Input::Restart => self.restart(),
            _ => {}
        }
    }

    fn finish_run(&mut self) {
        self.transition(|phase| match phase {
            Phase::Running(game) => Phase::GameOver(game, Outcome::NotRanked),
            other => other,
        });
        let Phase::GameOver(game, outcome) = &mut self.phase else {
            return;
        };
        let (id, score) = (game.id(), game.score());
        info!("{} over with score {score}", id.title());
        if self.leaderboard.qualifies(id, score) {
            *outcome = Outcome::EnterName(NameEntry::default());
        }
    }

    fn record(&mut self, label: &str) {
        let Phase::GameOver(game, outcome) = &mut self.phase else {
            return;
        };
        let (id, score) = (game.id(), game.score());
        *outcome = match self.leaderboard.submit(id, label, score) {
            Some(rank) => Outcome::Ranked(rank),
            None => Outcome::NotRanked,
        };
        match self.leaderboard.flush() {
            Ok(()) => self.notice = None,
            Err(e) => {
                error!("failed to save leaderboard: {e}");
                self.notice = Some(format!("Scores not saved: {e}"));
            }
        }
    }

    fn restart(&mut self) {
        self.transition(|phase| match phase {
            Phase::Running(mut g) | Phase::Paused(mut g) | Phase::GameOver(mut g, _) => {
                g.reset();
                info!("restarting {}", g.id().title());
                Phase::Running(g)
            }
            Phase::Menu => Phase::Menu,
        });
    }

    fn to_menu(&mut self, why: &str) {
        if let Some(game) = self.phase.game() {
            info!("{} {why}, back to menu", game.id().title());
        }
        self.phase = Phase::Menu;
    }

    fn transition(&mut self, f: impl FnOnce(Phase) -> Phase) {
        let phase = std::mem::replace(&mut self.phase, Phase::Menu);
        self.phase = f(phase);
    }
}
