//! Per-frame simulation step
//!
//! Order within a frame: paddle moves, balls move, balls that fell out are
//! removed (or the resting ball follows the paddle), then the collision pass.

use super::collision::{Side, hitcheck};
use super::mutation::ArenaMutation;
use super::state::GameState;

/// Things that happened during a tick, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallHit(Side),
    /// A ball landed on the paddle (index into `balls` at the time of the hit)
    PaddleHit { ball: usize },
    BallSpawned { fake: bool },
    DoubleSpeed(bool),
    BallLost { fake: bool },
    /// The last ball is gone
    RoundOver,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.is_over() {
        return events;
    }

    state.frame += 1;

    state.paddle.advance(state.double_speed, state.width);

    if state.launched {
        let double_speed = state.double_speed;
        for ball in &mut state.balls {
            ball.advance(&mut state.rng, double_speed);
        }

        let height = state.height;
        state.balls.retain(|ball| {
            let fell = ball.pos.y > height + ball.radius;
            if fell {
                events.push(GameEvent::BallLost { fake: ball.is_fake });
            }
            !fell
        });
    } else {
        // Waiting for launch: the ball rides on the paddle
        for ball in &mut state.balls {
            ball.pos.x = state.paddle.x;
        }
    }

    // Balls spawned during this pass wait for the next frame
    let count = state.balls.len();
    for i in 0..count {
        let report = hitcheck(
            &mut state.balls[i],
            &state.paddle,
            state.width,
            state.height,
            &mut state.rng,
        );

        for side in report.sides {
            events.push(match side {
                Side::Paddle => GameEvent::PaddleHit { ball: i },
                wall => GameEvent::WallHit(wall),
            });
        }

        if let Some(mutation) = report.mutation {
            log::debug!("Paddle hit, mutation: {mutation:?}");
            state.paddle.apply_mutation(&mutation.paddle, state.width);
            apply_arena_mutation(state, &mutation.arena, &mut events);
        }
    }

    if state.is_over() {
        log::info!("Round over after {} frames", state.frame);
        events.push(GameEvent::RoundOver);
    }

    events
}

fn apply_arena_mutation(state: &mut GameState, m: &ArenaMutation, events: &mut Vec<GameEvent>) {
    if let Some(spawn) = m.spawn {
        state.spawn_ball(spawn.fake);
        events.push(GameEvent::BallSpawned { fake: spawn.fake });
    }
    if state.double_speed != m.double_speed {
        events.push(GameEvent::DoubleSpeed(m.double_speed));
    }
    state.double_speed = m.double_speed;
}
