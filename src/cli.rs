use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Terminal arcade: Snake, Pong, Breakout, Flappy Bird and Space Shooter.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file to load. Defaults to arcade.toml in the data directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Where scores, themes and the log are kept.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Theme to start with.
    #[arg(short, long)]
    pub theme: Option<String>,
}

impl Cli {
    /// Command-line values take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
    }

    /// Config path to read when `--config` is absent.
    pub fn default_config_path(&self) -> PathBuf {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => Config::default().data_dir(),
        };
        dir.join(crate::config::CONFIG_FILE)
    }
}
