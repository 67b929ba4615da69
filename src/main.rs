mod config;
mod food;
mod game;
mod geometry;
mod platform;
mod snake;
mod term;

use std::fs::File;

use anyhow::Context;
use log::info;
use simplelog::{Config, WriteLogger};

use crate::config::Settings;
use crate::game::{Crash, Outcome, SnakeGame};
use crate::geometry::Geometry;
use crate::platform::FixedRateClock;
use crate::term::TermManager;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("Invalid game settings")?;

    // The terminal is the game screen, so logs go to a file
    WriteLogger::init(
        settings.log_level,
        Config::default(),
        File::create(&settings.log_file)
            .with_context(|| format!("Cannot create log file {}", settings.log_file))?,
    )
    .context("Cannot initialize logging")?;

    let geometry = Geometry::new(settings.width, settings.height, settings.cell_size)?;

    let mut term = TermManager::new(&geometry, settings.background).context("Cannot read terminal size")?;
    info!("Terminal is {:?} characters", term.get_terminal_size());
    term.setup().context("Cannot set up the terminal")?;

    let mut game = SnakeGame::new(settings, geometry, term, rand::thread_rng());
    let result = game.play(&mut FixedRateClock::new());

    // The terminal goes back to normal even if the game failed
    game.into_shell().restore().context("Cannot restore the terminal")?;
    let summary = result.context("Terminal I/O failed")?;

    let reason = match summary.outcome {
        Outcome::Quit => "Bye!",
        Outcome::Crashed(Crash::SelfCollision) => "Game over! You bit yourself.",
        Outcome::Crashed(Crash::OutOfBounds) => "Game over! You hit the wall.",
    };
    println!(
        "{} Score: {} (length {}, {} ticks)",
        reason, summary.score, summary.length, summary.ticks
    );

    Ok(())
}
