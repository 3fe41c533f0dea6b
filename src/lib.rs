//! Terminal Snake with stones and gold apples.
//!
//! The simulation lives in [`game`] and is free of terminal I/O; the
//! remaining modules wire it to crossterm input and a ratatui frame.

pub mod app;
pub mod clock;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod snake;
pub mod spawn;
pub mod terminal_runtime;
pub mod ui;

pub use error::{Error, Result};
