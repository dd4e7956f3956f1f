//! Ball and paddle entry point
//!
//! Loads settings and the high score file, takes over the terminal and runs
//! the game until the player quits.

use std::path::Path;

use anyhow::Context;

use ball_and_paddle::platform::Terminal;
use ball_and_paddle::settings::SETTINGS_FILE;
use ball_and_paddle::{HighScores, Session, Settings};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Ball and paddle starting...");

    let settings = Settings::load(Path::new(SETTINGS_FILE));

    let scores = match HighScores::load(&settings.scores_path) {
        Ok(scores) => scores,
        Err(e) => {
            // Leave a broken file alone; this session's scores stay in memory
            log::error!("{e}, high scores won't be saved");
            HighScores::new()
        }
    };

    let terminal = Terminal::new(settings.arena_width, settings.arena_height)
        .context("Could not set up the terminal")?;
    let mut session = Session::new(terminal, settings, scores);
    let result = session.run();

    let mut terminal = session.into_platform();
    terminal.restore().context("Could not restore the terminal")?;
    result.context("Game loop failed")?;
    Ok(())
}
