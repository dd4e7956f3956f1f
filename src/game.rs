//! Game session
//!
//! Plays rounds back to back until the player quits. One frame is: read
//! input, step the simulation, draw, let the clock pace the loop.

use std::io;

use crate::clock::{FixedRatePacer, Pacer, RoundClock, format_time};
use crate::highscores::HighScores;
use crate::platform::{Dialogs, InputEvent, InputSource, Key, Renderer};
use crate::renderer::draw_scene;
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GameState, tick};

pub const TITLE: &str = "Ball and paddle";

pub const HELP_TEXT: &str = "A crazy ball and paddle game that will blow your mind.

Keys:

W, arrow up, space, Enter   Start the game
A, arrow left               Move the paddle left
D, arrow right              Move the paddle right
H                           Show high scores
F1                          Show this help message
F2                          Start a new game (the current one is not scored)
Q                           Quit";

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEnd {
    /// Every ball fell out; survival time in seconds (None if never launched)
    Finished(Option<f64>),
    /// New game requested before the round was over
    Abandoned,
    Quit,
}

/// Everything that lives across rounds
pub struct Session<P, C: Pacer = FixedRatePacer>
where
    P: Renderer + InputSource + Dialogs,
{
    platform: P,
    settings: Settings,
    clock: RoundClock<C>,
    scores: HighScores,
    /// Paddle hits in the current round
    hits: u32,
}

impl<P> Session<P, FixedRatePacer>
where
    P: Renderer + InputSource + Dialogs,
{
    pub fn new(platform: P, settings: Settings, scores: HighScores) -> Self {
        let clock = RoundClock::new(settings.frame_rate);
        Self::with_clock(platform, settings, scores, clock)
    }
}

impl<P, C> Session<P, C>
where
    P: Renderer + InputSource + Dialogs,
    C: Pacer,
{
    pub fn with_clock(platform: P, settings: Settings, scores: HighScores, clock: RoundClock<C>) -> Self {
        Self {
            platform,
            settings,
            clock,
            scores,
            hits: 0,
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn clock(&self) -> &RoundClock<C> {
        &self.clock
    }

    pub fn paddle_hits(&self) -> u32 {
        self.hits
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Play until the player quits
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let outcome = self.play_round()?;
            if !self.finish(outcome)? {
                log::info!("Quit");
                return Ok(());
            }
        }
    }

    /// A fresh round: one ball resting on the paddle
    pub fn new_round(&self) -> GameState {
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        log::info!("New round (seed {seed})");
        GameState::new(seed, self.settings.arena_width, self.settings.arena_height)
    }

    pub fn play_round(&mut self) -> io::Result<RoundEnd> {
        let state = self.new_round();
        self.play(state)
    }

    /// Run the frame loop on `state` until the round ends
    pub fn play(&mut self, mut state: GameState) -> io::Result<RoundEnd> {
        let frame_rate = self.clock.frame_rate();
        self.clock.reset();
        self.hits = 0;
        loop {
            for event in self.platform.poll()? {
                if let Some(end) = self.handle(event, &mut state)? {
                    return Ok(end);
                }
            }

            for event in tick(&mut state) {
                self.on_event(event);
            }
            draw_scene(
                &mut self.platform,
                &state,
                &format_time(self.clock.elapsed()),
                frame_rate,
            )?;
            self.clock.tick(self.clock.frame_dt());

            if state.is_over() {
                self.clock.stop();
                let survived = state.launched.then(|| self.clock.elapsed());
                log::info!(
                    "Round finished: {}, {} paddle hits",
                    survived.map(format_time).unwrap_or_else(|| "not launched".into()),
                    self.hits
                );
                return Ok(RoundEnd::Finished(survived));
            }
        }
    }

    fn on_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::PaddleHit { .. } => self.hits += 1,
            GameEvent::BallSpawned { fake } => log::debug!("Ball spawned (fake: {fake})"),
            GameEvent::DoubleSpeed(on) => log::info!("Double speed {}", if on { "on" } else { "off" }),
            GameEvent::BallLost { fake } => log::debug!("Ball lost (fake: {fake})"),
            GameEvent::WallHit(_) | GameEvent::RoundOver => {}
        }
    }

    /// Apply one input event; returns how the round ended if it did
    fn handle(&mut self, event: InputEvent, state: &mut GameState) -> io::Result<Option<RoundEnd>> {
        match event {
            InputEvent::KeyDown(Key::Left) => state.paddle.press(Direction::Left),
            InputEvent::KeyDown(Key::Right) => state.paddle.press(Direction::Right),
            InputEvent::KeyUp(Key::Left) => state.paddle.release(Direction::Left),
            InputEvent::KeyUp(Key::Right) => state.paddle.release(Direction::Right),
            InputEvent::KeyUp(_) => {}
            InputEvent::KeyDown(Key::Launch) => {
                if state.launch() {
                    self.clock.start();
                }
            }
            InputEvent::KeyDown(Key::ShowScores) => {
                self.platform.message("High scores", &self.scores.listing())?;
                // Releases that happened inside the dialog were swallowed
                state.paddle.direction = Direction::Still;
            }
            InputEvent::KeyDown(Key::Help) => {
                self.platform.message(TITLE, HELP_TEXT)?;
                state.paddle.direction = Direction::Still;
            }
            InputEvent::KeyDown(Key::NewRound) => {
                self.clock.stop();
                state.abandon();
                log::info!("Round abandoned");
                return Ok(Some(RoundEnd::Abandoned));
            }
            InputEvent::KeyDown(Key::Quit) | InputEvent::Close => {
                self.clock.stop();
                return Ok(Some(RoundEnd::Quit));
            }
        }
        Ok(None)
    }

    /// Deal with a round's outcome; returns false when the session should end
    pub fn finish(&mut self, outcome: RoundEnd) -> io::Result<bool> {
        let seconds = match outcome {
            RoundEnd::Quit => return Ok(false),
            RoundEnd::Abandoned | RoundEnd::Finished(None) => return Ok(true),
            RoundEnd::Finished(Some(seconds)) => seconds,
        };

        let mut prompt_result = Ok(());
        let platform = &mut self.platform;
        let accepted = self.scores.record(seconds, || {
            match platform.prompt("High score", "Enter your name:") {
                Ok(name) => name,
                Err(e) => {
                    prompt_result = Err(e);
                    None
                }
            }
        });
        prompt_result?;

        if accepted {
            self.platform.message("High scores", &self.scores.listing())?;
        }
        Ok(true)
    }
}
