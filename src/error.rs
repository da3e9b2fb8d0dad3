use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort the launch before the first frame.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize terminal")]
    Terminal(#[source] io::Error),
    #[error("failed to read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode store contents")]
    Encode(#[from] serde_json::Error),
}

/// Per-frame I/O failures surfaced by the game loop.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error("failed to draw frame")]
    Render(#[source] io::Error),
    #[error("failed to read input")]
    Input(#[source] io::Error),
}
