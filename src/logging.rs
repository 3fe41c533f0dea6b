use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use env_logger::{Builder, Env, Target};

use crate::config::data_dir;
use crate::error::{Error, Result};

const LOG_FILE_NAME: &str = "stone-snake.log";

/// Returns the default log file location inside the game's data directory.
#[must_use]
pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

/// Installs the global logger, appending to `path` (or the default log file).
///
/// Output goes to a file because stderr would draw over the alternate screen.
/// The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map_or_else(default_log_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::LogFile)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(Error::LogFile)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(path)
}
