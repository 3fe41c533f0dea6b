use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;
use stone_snake::app::{self, RunContext};
use stone_snake::config::AppConfig;
use stone_snake::game::GameState;
use stone_snake::terminal_runtime::install_panic_hook;
use stone_snake::{Result, logging};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the platform config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation ticks per second, overriding the config file.
    #[arg(long, value_name = "HZ")]
    tick_rate: Option<u32>,

    /// Log file; defaults to the platform data directory.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("stone-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(tick_rate) = cli.tick_rate {
        config.tick_rate_hz = tick_rate;
    }
    config.validate()?;

    let log_path = logging::init(cli.log_file.as_deref())?;
    info!(
        "starting on a {}x{} board at {} Hz, logging to {}",
        config.rules.grid.width,
        config.rules.grid.height,
        config.tick_rate_hz,
        log_path.display()
    );

    let mut state = match cli.seed {
        Some(seed) => {
            info!("using seed {seed}");
            GameState::new_with_seed(config.rules, seed)?
        }
        None => GameState::new(config.rules)?,
    };

    install_panic_hook();
    let mut ctx = RunContext::new(config.tick_rate_hz)?;
    app::run(&mut ctx, &mut state)
}
