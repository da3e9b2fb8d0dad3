//! Terminal arcade launcher: a menu shell, a fixed-timestep game loop, five
//! mini-games behind one `Game` trait, themes, and a per-game leaderboard.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod game_loop;
pub mod games;
pub mod input;
pub mod logging;
pub mod scores;
pub mod theme;
pub mod ui;
