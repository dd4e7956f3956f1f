//! Ball and Paddle - a crazy ball and paddle arcade game
//!
//! Core modules:
//! - `sim`: Simulation (kinematics, collisions, mutation events, game state)
//! - `clock`: Round clock and frame pacing
//! - `highscores`: Top-3 survival time ledger
//! - `persistence`: Guarded file writes with backup/restore
//! - `platform`: Rendering, input and dialog collaborators (terminal backend)
//! - `renderer`: Scene drawing and the half-block pixel canvas
//! - `game`: Session loop tying everything together

pub mod clock;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use clock::RoundClock;
pub use game::Session;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Frame rate of the game loop (the only frame-rate governor)
    pub const FRAME_RATE: u32 = 60;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Distance from the bottom of the arena to the paddle's top edge
    pub const PADDLE_HEIGHT: f32 = 25.0;
    /// Drawn thickness of the paddle bar
    pub const PADDLE_THICKNESS: f32 = 12.0;
    /// Paddle movement per frame
    pub const PADDLE_SPEED: f32 = 15.0;
    pub const DEFAULT_PADDLE_WIDTH: f32 = 100.0;
    /// Repeated entries bias the roll toward the default width
    pub const PADDLE_WIDTHS: [f32; 5] = [50.0, 100.0, 100.0, 100.0, 150.0];

    pub const BALL_RADII: [f32; 2] = [10.0, 50.0];
    pub const DEFAULT_BALL_RADIUS: f32 = 10.0;
    /// Per-frame angle wobble in degrees
    pub const NORMAL_ANGLE_DELTA: i32 = 2;
    pub const CRAZY_ANGLE_DELTA: i32 = 20;
    /// Per-axis speed ranges (inclusive)
    pub const NORMAL_SPEED_RANGE: (i32, i32) = (10, 15);
    pub const CRAZY_SPEED_RANGE: (i32, i32) = (-10, 40);

    /// Keeps a bounced ball from skimming along the wall it just hit
    pub const EDGE_MARGIN: f32 = 3.0;
    /// Random jitter added on a paddle bounce, degrees
    pub const PADDLE_JITTER: i32 = 10;

    /// Mutation probabilities
    pub const BALL_BLINK_CHANCE: f64 = 1.0 / 3.0;
    pub const PADDLE_BLINK_CHANCE: f64 = 0.2;
    pub const SPAWN_CHANCE: f64 = 2.0 / 3.0;
    pub const FAKE_CHANCE: f64 = 1.0 / 3.0;
    pub const DOUBLE_SPEED_CHANCE: f64 = 0.25;

    /// Number of entries shown in the high score list
    pub const MAX_HIGH_SCORES: usize = 3;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Trigonometric sine with degrees
#[inline]
pub fn sin_deg(angle: f32) -> f32 {
    angle.to_radians().sin()
}

/// Trigonometric cosine with degrees
#[inline]
pub fn cos_deg(angle: f32) -> f32 {
    angle.to_radians().cos()
}
