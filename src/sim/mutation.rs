//! Mutation events
//!
//! Every successful paddle hit rolls one `Mutation`: new craziness for the
//! ball, a new look and feel for the paddle, and maybe an extra ball or a
//! change of pace for the whole arena. Rolling is separate from applying so
//! a seeded RNG reproduces the exact same chain of events.

use rand::Rng;

use super::state::{Ball, Paddle};
use crate::consts::*;

/// New settings for the ball that hit the paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallMutation {
    pub crazy_angle: bool,
    pub crazy_speed: bool,
    pub radius: f32,
    pub blinking: bool,
}

/// New settings for the paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleMutation {
    pub blinking: bool,
    pub flip: bool,
    pub width: f32,
}

/// A ball to add to the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub fake: bool,
}

/// Arena-wide changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaMutation {
    pub spawn: Option<Spawn>,
    pub double_speed: bool,
}

/// Everything a single paddle hit changes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mutation {
    pub ball: BallMutation,
    pub paddle: PaddleMutation,
    pub arena: ArenaMutation,
}

impl Mutation {
    /// Roll a mutation. Draw order is fixed so seeded runs replay exactly.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let ball = BallMutation {
            crazy_angle: rng.random_bool(0.5),
            crazy_speed: rng.random_bool(0.5),
            radius: BALL_RADII[rng.random_range(0..BALL_RADII.len())],
            blinking: rng.random_bool(BALL_BLINK_CHANCE),
        };

        let paddle = PaddleMutation {
            blinking: rng.random_bool(PADDLE_BLINK_CHANCE),
            flip: rng.random_bool(0.5),
            width: PADDLE_WIDTHS[rng.random_range(0..PADDLE_WIDTHS.len())],
        };

        let spawn = if rng.random_bool(SPAWN_CHANCE) {
            Some(Spawn {
                fake: rng.random_bool(FAKE_CHANCE),
            })
        } else {
            None
        };
        let arena = ArenaMutation {
            spawn,
            double_speed: rng.random_bool(DOUBLE_SPEED_CHANCE),
        };

        Self {
            ball,
            paddle,
            arena,
        }
    }
}

impl Ball {
    pub fn apply_mutation(&mut self, m: &BallMutation) {
        self.crazy_angle = m.crazy_angle;
        self.crazy_speed = m.crazy_speed;
        self.radius = m.radius;
        self.blinking = m.blinking;
    }
}

impl Paddle {
    /// Apply a paddle mutation; a wider paddle is pushed back inside the arena
    pub fn apply_mutation(&mut self, m: &PaddleMutation, arena_width: f32) {
        self.blinking = m.blinking;
        self.flip = m.flip;
        self.width = m.width;
        self.clamp(arena_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_is_reproducible() {
        let a: Vec<Mutation> = {
            let mut rng = Pcg32::seed_from_u64(42);
            (0..20).map(|_| Mutation::roll(&mut rng)).collect()
        };
        let b: Vec<Mutation> = {
            let mut rng = Pcg32::seed_from_u64(42);
            (0..20).map(|_| Mutation::roll(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_rolled_values_in_domain() {
        let mut rng = Pcg32::seed_from_u64(1234);
        for _ in 0..500 {
            let m = Mutation::roll(&mut rng);
            assert!(BALL_RADII.contains(&m.ball.radius));
            assert!(PADDLE_WIDTHS.contains(&m.paddle.width));
        }
    }

    #[test]
    fn test_roll_frequencies_roughly_match() {
        let mut rng = Pcg32::seed_from_u64(99);
        let n = 6000;
        let mut spawns = 0;
        let mut fakes = 0;
        let mut doubles = 0;
        let mut paddle_blinks = 0;
        for _ in 0..n {
            let m = Mutation::roll(&mut rng);
            if let Some(spawn) = m.arena.spawn {
                spawns += 1;
                if spawn.fake {
                    fakes += 1;
                }
            }
            doubles += m.arena.double_speed as u32;
            paddle_blinks += m.paddle.blinking as u32;
        }
        let ratio = |k: u32, of: u32| k as f64 / of as f64;
        assert!((ratio(spawns, n) - 2.0 / 3.0).abs() < 0.05);
        assert!((ratio(fakes, spawns) - 1.0 / 3.0).abs() < 0.05);
        assert!((ratio(doubles, n) - 0.25).abs() < 0.05);
        assert!((ratio(paddle_blinks, n) - 0.2).abs() < 0.05);
    }

    #[test]
    fn test_wider_paddle_stays_in_arena() {
        let mut paddle = Paddle::new(ARENA_WIDTH, 0);
        paddle.x = ARENA_WIDTH - 50.0;
        paddle.apply_mutation(
            &PaddleMutation {
                blinking: false,
                flip: true,
                width: 150.0,
            },
            ARENA_WIDTH,
        );
        assert_eq!(paddle.x, ARENA_WIDTH - 75.0);
        assert!(paddle.flip);
    }
}
