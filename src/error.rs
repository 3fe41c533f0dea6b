use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::spawn::SpawnError;

/// Top-level failure for building or running a game.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to open log file: {0}")]
    LogFile(#[source] io::Error),
    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
