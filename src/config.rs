use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::StartupError;
use crate::games::pong::Difficulty;

pub const CONFIG_FILE: &str = "arcade.toml";

const MIN_TICK_MS: u64 = 5;
const MIN_BOARD: i32 = 8;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SnakeConfig {
    pub width: i32,
    pub height: i32,
    /// Milliseconds between grid steps.
    pub step_ms: u64,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            step_ms: 120,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PongConfig {
    pub winning_score: u32,
    pub difficulty: Difficulty,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            winning_score: 5,
            difficulty: Difficulty::Medium,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_ms: u64,
    pub theme: String,
    /// Where the leaderboard, themes, and log live. Defaults to the executable's directory.
    pub data_dir: Option<PathBuf>,
    pub leaderboard_capacity: usize,
    pub log_level: String,
    /// Fixed RNG seed; unset means a fresh seed per game.
    pub seed: Option<u64>,
    pub snake: SnakeConfig,
    pub pong: PongConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 16, // ~60 FPS
            theme: "Classic".into(),
            data_dir: None,
            leaderboard_capacity: 10,
            log_level: "info".into(),
            seed: None,
            snake: SnakeConfig::default(),
            pong: PongConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| StartupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&data).map_err(|source| StartupError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Missing file yields defaults silently; a malformed one yields defaults plus a message.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(format!("{e}: {}", error_chain(&e)))),
        }
    }

    /// Clamp out-of-range values, returning a warning for each correction.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.tick_ms < MIN_TICK_MS {
            warnings.push(format!("tick_ms {} too small, using {MIN_TICK_MS}", self.tick_ms));
            self.tick_ms = MIN_TICK_MS;
        }
        if self.leaderboard_capacity == 0 {
            warnings.push("leaderboard_capacity must be at least 1".to_string());
            self.leaderboard_capacity = 1;
        }
        if self.snake.width < MIN_BOARD || self.snake.height < MIN_BOARD {
            warnings.push(format!(
                "snake board {}x{} too small, using at least {MIN_BOARD}x{MIN_BOARD}",
                self.snake.width, self.snake.height
            ));
            self.snake.width = self.snake.width.max(MIN_BOARD);
            self.snake.height = self.snake.height.max(MIN_BOARD);
        }
        if self.snake.step_ms == 0 {
            warnings.push("snake.step_ms must be positive".to_string());
            self.snake.step_ms = SnakeConfig::default().step_ms;
        }
        if self.pong.winning_score == 0 {
            warnings.push("pong.winning_score must be positive".to_string());
            self.pong.winning_score = 1;
        }
        warnings
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        // Store next to the executable
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return dir.to_path_buf();
            }
        }
        PathBuf::from(".")
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.tick(), Duration::from_millis(16));
        assert_eq!(cfg.leaderboard_capacity, 10);
        assert_eq!(cfg.theme, "Classic");
        assert_eq!(cfg.pong.difficulty, Difficulty::Medium);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        writeln!(
            file,
            r#"
theme = "Neon"
seed = 7

[snake]
width = 12

[pong]
difficulty = "hard"
"#
        )
        .unwrap();
        let cfg = Config::load_from_file(file.path()).unwrap();
        assert_eq!(cfg.theme, "Neon");
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.snake.width, 12);
        assert_eq!(cfg.snake.height, 20);
        assert_eq!(cfg.pong.difficulty, Difficulty::Hard);
        assert_eq!(cfg.pong.winning_score, 5);
    }

    #[test]
    fn load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (cfg, warning) = Config::load_or_default(dir.path().join("nope.toml"));
        assert_eq!(cfg, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn load_or_default_malformed_file_warns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tick_ms = \"fast\"").unwrap();
        let (cfg, warning) = Config::load_or_default(file.path());
        assert_eq!(cfg, Config::default());
        assert!(warning.unwrap().contains("parse"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, StartupError::ConfigRead { .. }));
    }

    #[test]
    fn sanitize_clamps_bad_values() {
        let mut cfg = Config {
            tick_ms: 0,
            leaderboard_capacity: 0,
            ..Config::default()
        };
        cfg.snake.width = 2;
        let warnings = cfg.sanitize();
        assert_eq!(warnings.len(), 3);
        assert_eq!(cfg.tick_ms, MIN_TICK_MS);
        assert_eq!(cfg.leaderboard_capacity, 1);
        assert_eq!(cfg.snake.width, MIN_BOARD);
        assert!(Config::default().sanitize().is_empty());
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/tmp/arcade")),
            ..Config::default()
        };
        assert_eq!(cfg.data_dir(), PathBuf::from("/tmp/arcade"));
    }
}
