use std::io;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::clock::TickClock;
use crate::config::{THEME_CLASSIC, Theme};
use crate::error::Result;
use crate::game::{GameState, GameStatus};
use crate::input::{GameInput, InputHandler};
use crate::renderer;
use crate::terminal_runtime::TerminalSession;

/// What the loop should do after handling one input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the main loop needs besides the game itself, built once at start-up.
pub struct RunContext {
    pub terminal: TerminalSession,
    pub input: InputHandler,
    pub clock: TickClock,
    pub theme: &'static Theme,
}

impl RunContext {
    /// Enters the terminal and starts the tick clock at `tick_rate_hz`.
    pub fn new(tick_rate_hz: u32) -> io::Result<Self> {
        Ok(Self {
            terminal: TerminalSession::enter()?,
            input: InputHandler::new(),
            clock: TickClock::from_rate(tick_rate_hz),
            theme: &THEME_CLASSIC,
        })
    }
}

/// Runs the draw, input, tick loop until the player quits.
pub fn run<R: Rng>(ctx: &mut RunContext, state: &mut GameState<R>) -> Result<()> {
    let mut last_status = state.status();

    loop {
        let theme = ctx.theme;
        ctx.terminal
            .draw(|frame| renderer::render(frame, state, theme))?;

        let timeout = ctx.clock.until_next(Instant::now());
        if let Some(input) = ctx.input.poll_input(timeout)? {
            if handle_input(state, input)? == Flow::Quit {
                info!("quit requested with score {}", state.score());
                return Ok(());
            }
        }

        if ctx.clock.tick_due(Instant::now()) {
            state.advance_tick();
        }

        if state.status() != last_status {
            debug!("status {last_status:?} -> {:?}", state.status());
            last_status = state.status();
        }
    }
}

/// Applies one input to the game.
pub fn handle_input<R: Rng>(state: &mut GameState<R>, input: GameInput) -> Result<Flow> {
    match input {
        GameInput::Quit => return Ok(Flow::Quit),
        GameInput::Direction(direction) => {
            if !state.request_direction(direction) {
                debug!("ignored turn {direction:?}");
            }
        }
        GameInput::Restart if state.status() == GameStatus::GameOver => state.restart()?,
        GameInput::Restart => {}
    }

    Ok(Flow::Continue)
}
