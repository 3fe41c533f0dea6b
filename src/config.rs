use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::SELF_COLLISION_SKIP;

const APP_DIR_NAME: &str = "stone-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default board width in cells (640px canvas at 20px per cell).
pub const DEFAULT_GRID_WIDTH: u16 = 32;

/// Default board height in cells (480px canvas at 20px per cell).
pub const DEFAULT_GRID_HEIGHT: u16 = 24;

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE_HZ: u32 = 10;

/// A stone spawns whenever the score reaches a multiple of this.
pub const DEFAULT_STONE_INTERVAL: u32 = 5;

/// A gold apple spawns whenever the score reaches a multiple of this.
pub const DEFAULT_GOLD_APPLE_INTERVAL: u32 = 10;

pub const DEFAULT_GROWTH_PER_APPLE: usize = 1;
pub const DEFAULT_SCORE_PER_APPLE: u32 = 1;
pub const DEFAULT_SCORE_PER_GOLD_APPLE: u32 = 3;

/// Shortest allowed board side.
///
/// Below this a head can wrap onto one of the segments that the self-collision
/// check skips, so the snake would overlap itself without dying.
pub const MIN_GRID_SIDE: u16 = SELF_COLLISION_SKIP as u16;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Scoring and spawning rules for one game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    pub grid: GridSize,
    pub stone_interval: u32,
    pub gold_apple_interval: u32,
    pub growth_per_apple: usize,
    pub score_per_apple: u32,
    pub score_per_gold_apple: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            stone_interval: DEFAULT_STONE_INTERVAL,
            gold_apple_interval: DEFAULT_GOLD_APPLE_INTERVAL,
            growth_per_apple: DEFAULT_GROWTH_PER_APPLE,
            score_per_apple: DEFAULT_SCORE_PER_APPLE,
            score_per_gold_apple: DEFAULT_SCORE_PER_GOLD_APPLE,
        }
    }
}

impl Rules {
    /// Default rules on a custom board.
    #[must_use]
    pub fn with_grid(width: u16, height: u16) -> Self {
        Self {
            grid: GridSize { width, height },
            ..Self::default()
        }
    }

    /// Checks that the rules describe a playable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSize { width, height } = self.grid;
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        let positive = [
            ("stone_interval", self.stone_interval > 0),
            ("gold_apple_interval", self.gold_apple_interval > 0),
            ("growth_per_apple", self.growth_per_apple > 0),
            ("score_per_apple", self.score_per_apple > 0),
        ];
        for (name, ok) in positive {
            if !ok {
                return Err(ConfigError::ZeroValue { name });
            }
        }

        Ok(())
    }
}

/// Everything configurable from the JSON file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub rules: Rules,
    pub tick_rate_hz: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl AppConfig {
    /// Loads the config at `path`, or the platform default path when `None`.
    ///
    /// A missing file at the default path yields the defaults. An explicit
    /// path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_or_default(&default_config_path())?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load_from_path`], but a missing file means defaults.
    fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from_path(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Checks the rules and the tick rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroValue {
                name: "tick_rate_hz",
            });
        }

        self.rules.validate()
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Returns the per-user data directory for this game.
#[must_use]
pub fn data_dir() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(
        "grid {width}x{height} is too small, each side needs at least {min} cells",
        min = MIN_GRID_SIDE
    )]
    GridTooSmall { width: u16, height: u16 },
    #[error("{name} must be greater than zero")]
    ZeroValue { name: &'static str },
}

/// Colour palette for every board entity.
#[derive(Debug)]
pub struct Theme {
    pub board_bg: Color,
    pub border: Color,
    pub snake: Color,
    pub apple: Color,
    pub stone: Color,
    pub gold_apple: Color,
    pub score_text: Color,
    pub dialog_bg: Color,
}

/// Classic palette: green snake, red apple, sand-coloured stones.
pub const THEME_CLASSIC: Theme = Theme {
    board_bg: Color::Rgb(0, 0, 0),
    border: Color::Rgb(93, 216, 228),
    snake: Color::Rgb(0, 255, 0),
    apple: Color::Rgb(255, 0, 0),
    stone: Color::Rgb(234, 230, 202),
    gold_apple: Color::Rgb(255, 255, 0),
    score_text: Color::Rgb(255, 255, 224),
    dialog_bg: Color::Rgb(0, 0, 0),
};

/// Solid glyph for one board cell; each cell spans two terminal columns.
pub const GLYPH_CELL: &str = "██";

/// Terminal columns used to draw one board cell.
pub const CELL_COLUMNS: u16 = 2;
