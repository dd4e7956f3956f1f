//! Game state and core simulation types
//!
//! Angles are degrees. 0° points straight down toward the paddle, 90° right,
//! 180° up and 270° left, so a heading turns into a per-frame step of
//! `(sin(angle), cos(angle))` scaled by the rolled speed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{cos_deg, normalize_angle, sin_deg};

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    /// Heading in degrees, kept in [0, 360)
    pub angle: f32,
    pub radius: f32,
    /// Wide per-frame angle wobble
    pub crazy_angle: bool,
    /// Wide per-frame speed range (may even go backwards)
    pub crazy_speed: bool,
    pub blinking: bool,
    /// Decoy: bounces off walls but can't be caught with the paddle
    pub is_fake: bool,
    /// Frame number at creation, drives the blink phase
    pub created_at: u64,
}

impl Ball {
    /// A ball resting on the paddle in the middle of the arena, heading up
    pub fn new(arena_width: f32, arena_height: f32, created_at: u64) -> Self {
        let radius = DEFAULT_BALL_RADIUS;
        Self {
            pos: Vec2::new(arena_width / 2.0, resting_y(arena_height, radius)),
            angle: 180.0,
            radius,
            crazy_angle: false,
            crazy_speed: false,
            blinking: false,
            is_fake: false,
            created_at,
        }
    }

    /// Move the ball one frame along its (wobbling) heading
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, double_speed: bool) {
        let delta = if self.crazy_angle {
            CRAZY_ANGLE_DELTA
        } else {
            NORMAL_ANGLE_DELTA
        };
        self.angle = normalize_angle(self.angle + rng.random_range(-delta..=delta) as f32);

        let (lo, hi) = if self.crazy_speed {
            CRAZY_SPEED_RANGE
        } else {
            NORMAL_SPEED_RANGE
        };
        // Separate rolls per axis make the path look more erratic
        let speed_x = rng.random_range(lo..=hi) as f32;
        let speed_y = rng.random_range(lo..=hi) as f32;
        let boost = if double_speed { 2.0 } else { 1.0 };

        self.pos += Vec2::new(sin_deg(self.angle) * speed_x, cos_deg(self.angle) * speed_y) * boost;
    }

    /// Whether the ball is drawn this frame (blinking balls hide half of every second)
    pub fn is_visible(&self, frame: u64, frame_rate: u32) -> bool {
        !self.blinking || blink_visible(frame, self.created_at, frame_rate)
    }
}

/// Y coordinate where a ball of `radius` sits on top of the paddle
#[inline]
pub fn resting_y(arena_height: f32, radius: f32) -> f32 {
    arena_height - PADDLE_HEIGHT - radius
}

/// Blink phase shared by balls and the paddle: hidden in the first half of each second
fn blink_visible(frame: u64, created_at: u64, frame_rate: u32) -> bool {
    let frame_rate = u64::from(frame_rate.max(1));
    let phase = frame.saturating_sub(created_at) % frame_rate;
    phase * 2 >= frame_rate
}

/// Which way the player is pushing the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    #[default]
    Still,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Still => 0.0,
            Direction::Right => 1.0,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    /// Center of the paddle
    pub x: f32,
    pub direction: Direction,
    pub width: f32,
    /// Swaps left and right
    pub flip: bool,
    pub blinking: bool,
    pub created_at: u64,
}

impl Paddle {
    pub fn new(arena_width: f32, created_at: u64) -> Self {
        Self {
            x: arena_width / 2.0,
            direction: Direction::Still,
            width: DEFAULT_PADDLE_WIDTH,
            flip: false,
            blinking: false,
            created_at,
        }
    }

    /// A direction key went down
    pub fn press(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// A direction key went up; only stops the paddle if that key was steering it
    pub fn release(&mut self, direction: Direction) {
        if self.direction == direction {
            self.direction = Direction::Still;
        }
    }

    /// Move the paddle one frame and keep it inside the arena
    pub fn advance(&mut self, double_speed: bool, arena_width: f32) {
        let boost = if double_speed { 2.0 } else { 1.0 };
        let mut delta = self.direction.sign() * PADDLE_SPEED * boost;
        if self.flip {
            delta = -delta;
        }
        self.x += delta;
        self.clamp(arena_width);
    }

    pub fn clamp(&mut self, arena_width: f32) {
        let half = self.width / 2.0;
        self.x = self.x.clamp(half, (arena_width - half).max(half));
    }

    pub fn is_visible(&self, frame: u64, frame_rate: u32) -> bool {
        !self.blinking || blink_visible(frame, self.created_at, frame_rate)
    }
}

/// Complete state of one round (arena, paddle, balls and global modifiers)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the round's RNG was built from
    pub seed: u64,
    pub rng: Pcg32,
    pub width: f32,
    pub height: f32,
    /// Frame counter, advanced once per tick
    pub frame: u64,
    /// False while the ball rests on the paddle waiting for launch
    pub launched: bool,
    /// Doubles ball and paddle movement and switches to the crazy palette
    pub double_speed: bool,
    pub paddle: Paddle,
    /// Active balls in spawn order
    pub balls: Vec<Ball>,
}

impl GameState {
    /// Create a new round with the given seed and arena size
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width,
            height,
            frame: 0,
            launched: false,
            double_speed: false,
            paddle: Paddle::new(width, 0),
            balls: vec![Ball::new(width, height, 0)],
        }
    }

    /// Release the ball. Returns true only on the transition.
    pub fn launch(&mut self) -> bool {
        if self.launched {
            return false;
        }
        self.launched = true;
        log::info!("Ball launched (seed {})", self.seed);
        true
    }

    /// Append a fresh ball in the middle of the arena
    pub fn spawn_ball(&mut self, fake: bool) {
        let mut ball = Ball::new(self.width, self.height, self.frame);
        ball.is_fake = fake;
        self.balls.push(ball);
    }

    /// Drop every ball, ending the round without a score
    pub fn abandon(&mut self) {
        self.balls.clear();
    }

    /// A round is over exactly when no balls are left
    pub fn is_over(&self) -> bool {
        self.balls.is_empty()
    }
}
