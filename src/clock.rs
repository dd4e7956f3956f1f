//! Round clock and frame pacing
//!
//! The clock measures how long the player survived and is also the only
//! thing that paces the game loop: `tick` sleeps away what is left of the
//! frame budget.

use std::time::{Duration, Instant};

/// Blocks until the current frame's time budget is used up
pub trait Pacer {
    fn wait(&mut self);
}

/// Sleeps so that consecutive `wait` calls are at least one frame apart
#[derive(Debug, Clone)]
pub struct FixedRatePacer {
    frame: Duration,
    last: Option<Instant>,
}

impl FixedRatePacer {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1))),
            last: None,
        }
    }
}

impl Pacer for FixedRatePacer {
    fn wait(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.frame {
                std::thread::sleep(self.frame - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Never waits; for tests and headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn wait(&mut self) {}
}

/// Survival time of the current round
#[derive(Debug, Clone)]
pub struct RoundClock<P: Pacer = FixedRatePacer> {
    elapsed: f64,
    running: bool,
    frame_rate: u32,
    pacer: P,
}

impl RoundClock<FixedRatePacer> {
    pub fn new(frame_rate: u32) -> Self {
        Self::with_pacer(frame_rate, FixedRatePacer::new(frame_rate))
    }
}

impl<P: Pacer> RoundClock<P> {
    pub fn with_pacer(frame_rate: u32, pacer: P) -> Self {
        Self {
            elapsed: 0.0,
            running: false,
            frame_rate: frame_rate.max(1),
            pacer,
        }
    }

    /// The ball was launched. Does nothing if the clock is already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.elapsed = 0.0;
    }

    /// All balls are gone; `elapsed` is kept as the round's result
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Back to zero for a new round
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    /// Count `dt` seconds if running, then pace the frame
    pub fn tick(&mut self, dt: f64) {
        if self.running && dt > 0.0 {
            self.elapsed += dt;
        }
        self.pacer.wait();
    }

    /// Seconds per frame at the configured rate
    pub fn frame_dt(&self) -> f64 {
        1.0 / f64::from(self.frame_rate)
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Format seconds as `MM:SS:hh` (minutes, seconds, hundredths)
pub fn format_time(seconds: f64) -> String {
    let hundredths = (seconds.max(0.0) * 100.0) as u64;
    let (secs, hundredths) = (hundredths / 100, hundredths % 100);
    let (minutes, secs) = (secs / 60, secs % 60);
    format!("{minutes:02}:{secs:02}:{hundredths:02}")
}
