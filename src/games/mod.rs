pub mod breakout;
pub mod entity;
pub mod flappy;
pub mod pong;
pub mod shooter;
pub mod snake;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::input::Input;
use crate::theme::Palette;

pub use entity::{Entity, Vec2};

/// Lifecycle phase shared by the launcher and the active game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Running,
    Paused,
    GameOver,
}

/// Tag used to pick and construct a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    Snake,
    Pong,
    Breakout,
    FlappyBird,
    SpaceShooter,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::Snake,
        GameId::Pong,
        GameId::Breakout,
        GameId::FlappyBird,
        GameId::SpaceShooter,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameId::Snake => "Snake",
            GameId::Pong => "Pong",
            GameId::Breakout => "Breakout",
            GameId::FlappyBird => "Flappy Bird",
            GameId::SpaceShooter => "Space Shooter",
        }
    }

    pub fn index(self) -> usize {
        match self {
            GameId::Snake => 0,
            GameId::Pong => 1,
            GameId::Breakout => 2,
            GameId::FlappyBird => 3,
            GameId::SpaceShooter => 4,
        }
    }

    pub fn from_index(idx: usize) -> Option<GameId> {
        Self::ALL.get(idx).copied()
    }

    pub fn create(self, config: &Config) -> Box<dyn Game> {
        let rng = seeded_rng(config.seed);
        match self {
            GameId::Snake => Box::new(snake::Snake::new(&config.snake, rng)),
            GameId::Pong => Box::new(pong::Pong::new(&config.pong, rng)),
            GameId::Breakout => Box::new(breakout::Breakout::new(rng)),
            GameId::FlappyBird => Box::new(flappy::FlappyBird::new(rng)),
            GameId::SpaceShooter => Box::new(shooter::SpaceShooter::new(rng)),
        }
    }
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Contract every mini-game implements. Pausing belongs to the launcher, so
/// `status` only ever reports `Running` or `GameOver`.
pub trait Game {
    fn id(&self) -> GameId;
    /// Back to the start-of-run state: fresh entities, zero score.
    fn reset(&mut self);
    /// Record intent only; the world changes on the next `update`.
    fn handle_input(&mut self, input: Input);
    fn update(&mut self, dt: Duration);
    fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette);
    fn status(&self) -> GameState;
    fn score(&self) -> u32;
    /// Snapshot of every live entity.
    fn entities(&self) -> Vec<Entity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for id in GameId::ALL {
            assert_eq!(GameId::from_index(id.index()), Some(id));
        }
        assert_eq!(GameId::from_index(5), None);
    }

    #[test]
    fn every_game_starts_running_with_zero_score() {
        let config = Config {
            seed: Some(1),
            ..Config::default()
        };
        for id in GameId::ALL {
            let game = id.create(&config);
            assert_eq!(game.id(), id);
            assert_eq!(game.status(), GameState::Running);
            assert_eq!(game.score(), 0);
            assert!(!game.entities().is_empty());
        }
    }

    #[test]
    fn score_never_drops_during_a_run() {
        let script = [
            Input::Action,
            Input::Left,
            Input::Up,
            Input::Action,
            Input::Right,
            Input::Down,
            Input::Action,
        ];
        let dt = Duration::from_millis(16);
        for seed in [1, 7, 23] {
            let config = Config {
                seed: Some(seed),
                ..Config::default()
            };
            for id in GameId::ALL {
                let mut game = id.create(&config);
                let mut best = 0;
                for tick in 0..4000 {
                    if tick % 5 == 0 {
                        game.handle_input(script[(tick / 5) % script.len()]);
                    }
                    game.update(dt);
                    assert!(
                        game.score() >= best,
                        "{} score fell from {best} to {} at tick {tick}",
                        id.title(),
                        game.score()
                    );
                    best = game.score();
                    if game.status() == GameState::GameOver {
                        break;
                    }
                }
            }
        }
    }

    #[test]
    fn ids_serialize_as_kebab_case() {
        assert_eq!(serde_json::to_string(&GameId::FlappyBird).unwrap(), "\"flappy-bird\"");
    }
}
