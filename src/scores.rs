use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::games::GameId;

pub const LEADERBOARD_FILE: &str = "leaderboard.json";
pub const MAX_LABEL_LEN: usize = 9;
pub const DEFAULT_LABEL: &str = "???";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub label: String,
    pub score: u32,
}

/// Per-game top-N lists, each sorted descending by score.
///
/// Writes go to memory first; [`Leaderboard::flush`] persists them.
pub struct Leaderboard {
    boards: BTreeMap<GameId, Vec<ScoreEntry>>,
    capacity: usize,
    path: Option<PathBuf>,
}

impl Leaderboard {
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            boards: BTreeMap::new(),
            capacity: capacity.max(1),
            path: None,
        }
    }

    /// Read the store at `path`. A missing or unreadable file yields an empty board.
    pub fn load(path: impl AsRef<Path>, capacity: usize) -> Self {
        let path = path.as_ref();
        let mut board = Self {
            path: Some(path.to_path_buf()),
            ..Self::in_memory(capacity)
        };
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<BTreeMap<GameId, Vec<ScoreEntry>>>(&data) {
                Ok(boards) => {
                    for (game, mut entries) in boards {
                        entries.retain(|e| e.score > 0);
                        // Stable sort keeps file order among equal scores
                        entries.sort_by(|a, b| b.score.cmp(&a.score));
                        entries.truncate(board.capacity);
                        board.boards.insert(game, entries);
                    }
                    info!("loaded leaderboard from {}", path.display());
                }
                Err(e) => warn!("corrupt leaderboard {}: {e}; starting empty", path.display()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no leaderboard at {}; starting empty", path.display());
            }
            Err(e) => warn!("cannot read leaderboard {}: {e}; starting empty", path.display()),
        }
        board
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if a score would make the list (without inserting it)
    pub fn qualifies(&self, game: GameId, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.top(game);
        entries.len() < self.capacity || entries.last().is_some_and(|low| score > low.score)
    }

    /// Insert a score, returning its zero-based rank if it made the list.
    pub fn submit(&mut self, game: GameId, label: &str, score: u32) -> Option<usize> {
        if !self.qualifies(game, score) {
            return None;
        }
        let label: String = label.trim().chars().take(MAX_LABEL_LEN).collect();
        let label = if label.is_empty() { DEFAULT_LABEL.to_string() } else { label };

        let entries = self.boards.entry(game).or_default();
        // Equal scores stay ahead of the newcomer
        let rank = entries.partition_point(|e| e.score >= score);
        entries.insert(rank, ScoreEntry { label, score });
        entries.truncate(self.capacity);
        debug!("{} score {score} placed at rank {}", game.title(), rank + 1);
        Some(rank)
    }

    pub fn top(&self, game: GameId) -> &[ScoreEntry] {
        self.boards.get(&game).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn high_score(&self, game: GameId) -> u32 {
        self.top(game).first().map_or(0, |e| e.score)
    }

    /// Persist to disk via a temp file and rename. In-memory boards are a no-op.
    pub fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else { return Ok(()) };
        let body = serde_json::to_string_pretty(&self.boards)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        fs::write(&tmp, body).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        debug!("flushed leaderboard to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn scores(board: &Leaderboard, game: GameId) -> Vec<u32> {
        board.top(game).iter().map(|e| e.score).collect()
    }

    #[test]
    fn stays_bounded_and_sorted() {
        let mut board = Leaderboard::in_memory(10);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            board.submit(GameId::Snake, "AAA", rng.gen_range(0..1000));
            let s = scores(&board, GameId::Snake);
            assert!(s.len() <= 10);
            assert!(s.windows(2).all(|w| w[0] >= w[1]));
        }
        assert_eq!(board.top(GameId::Snake).len(), 10);
    }

    #[test]
    fn zero_never_qualifies() {
        let mut board = Leaderboard::in_memory(3);
        assert!(!board.qualifies(GameId::Pong, 0));
        assert_eq!(board.submit(GameId::Pong, "ZED", 0), None);
        assert!(board.top(GameId::Pong).is_empty());
    }

    #[test]
    fn full_board_requires_beating_the_lowest() {
        let mut board = Leaderboard::in_memory(3);
        for s in [30, 20, 10] {
            board.submit(GameId::Breakout, "P", s);
        }
        assert!(!board.qualifies(GameId::Breakout, 10));
        assert!(board.qualifies(GameId::Breakout, 11));
        assert_eq!(board.submit(GameId::Breakout, "NEW", 25), Some(1));
        assert_eq!(scores(&board, GameId::Breakout), [30, 25, 20]);
    }

    #[test]
    fn ties_keep_earlier_entry_first() {
        let mut board = Leaderboard::in_memory(5);
        board.submit(GameId::Snake, "FIRST", 50);
        assert_eq!(board.submit(GameId::Snake, "SECOND", 50), Some(1));
        assert_eq!(board.top(GameId::Snake)[0].label, "FIRST");
    }

    #[test]
    fn games_are_independent() {
        let mut board = Leaderboard::in_memory(5);
        board.submit(GameId::Snake, "S", 40);
        board.submit(GameId::FlappyBird, "F", 3);
        assert_eq!(board.high_score(GameId::Snake), 40);
        assert_eq!(board.high_score(GameId::FlappyBird), 3);
        assert_eq!(board.high_score(GameId::SpaceShooter), 0);
    }

    #[test]
    fn labels_are_truncated_and_defaulted() {
        let mut board = Leaderboard::in_memory(5);
        board.submit(GameId::Snake, "ABCDEFGHIJKLMNOP", 10);
        board.submit(GameId::Snake, "   ", 5);
        let top = board.top(GameId::Snake);
        assert_eq!(top[0].label, "ABCDEFGHI");
        assert_eq!(top[1].label, DEFAULT_LABEL);
    }

    #[test]
    fn flush_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEADERBOARD_FILE);
        let mut board = Leaderboard::load(&path, 5);
        assert!(board.top(GameId::Snake).is_empty());
        board.submit(GameId::Snake, "AMY", 70);
        board.submit(GameId::SpaceShooter, "BOB", 1200);
        board.flush().unwrap();

        let reloaded = Leaderboard::load(&path, 5);
        assert_eq!(reloaded.top(GameId::Snake)[0], ScoreEntry { label: "AMY".into(), score: 70 });
        assert_eq!(reloaded.high_score(GameId::SpaceShooter), 1200);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEADERBOARD_FILE);
        fs::write(&path, "{ not json").unwrap();
        let board = Leaderboard::load(&path, 5);
        assert!(board.top(GameId::Snake).is_empty());
    }

    #[test]
    fn load_restores_invariants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEADERBOARD_FILE);
        fs::write(
            &path,
            r#"{ "snake": [
                {"label": "C", "score": 10},
                {"label": "A", "score": 90},
                {"label": "Z", "score": 0},
                {"label": "B", "score": 50}
            ] }"#,
        )
        .unwrap();
        let board = Leaderboard::load(&path, 2);
        assert_eq!(scores(&board, GameId::Snake), [90, 50]);
    }
}
