use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

pub const LOG_FILE: &str = "arcade.log";

/// Route `log` output to `<dir>/arcade.log`. The terminal belongs to the UI,
/// so nothing is ever written to stdout or stderr.
///
/// `RUST_LOG` wins over `default_level`. Returns the log path, or `None` when
/// the file can't be opened and logging stays off.
pub fn init(dir: &Path, default_level: &str) -> Option<PathBuf> {
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    // A logger may already be installed (tests); keep whichever came first
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Some(path)
}
