//! Collision detection and response
//!
//! Walls reflect the heading and then push it out of a small band around the
//! wall-parallel directions, otherwise a ball could skim along a wall and hit
//! it again every frame. The paddle reflects with a sideways kick depending on
//! where the ball landed, and triggers a mutation event.

use rand::Rng;

use super::mutation::Mutation;
use super::state::{Ball, Paddle, resting_y};
use crate::consts::{EDGE_MARGIN, PADDLE_HEIGHT, PADDLE_JITTER};
use crate::normalize_angle;

/// Boundary a ball can hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Paddle,
}

/// What happened to one ball during the collision pass
#[derive(Debug, Clone, Default)]
pub struct HitReport {
    /// Responses applied, in check order
    pub sides: Vec<Side>,
    /// Rolled on a paddle hit; already applied to the ball, the rest is for the arena
    pub mutation: Option<Mutation>,
}

/// Check the ball against the walls and the paddle and apply every response
///
/// Checks run in the fixed order left, right, top, paddle. Several may fire in
/// the same frame (a corner), each one is applied as it comes up.
pub fn hitcheck<R: Rng + ?Sized>(
    ball: &mut Ball,
    paddle: &Paddle,
    arena_width: f32,
    arena_height: f32,
    rng: &mut R,
) -> HitReport {
    let mut report = HitReport::default();

    if ball.pos.x < ball.radius {
        bounce_left(ball);
        report.sides.push(Side::Left);
    }
    if ball.pos.x > arena_width - ball.radius {
        bounce_right(ball, arena_width);
        report.sides.push(Side::Right);
    }
    if ball.pos.y < ball.radius {
        bounce_top(ball);
        report.sides.push(Side::Top);
    }
    if ball.pos.y > resting_y(arena_height, ball.radius) && !ball.is_fake {
        let offset = ball.pos.x - paddle.x;
        if in_paddle_window(offset, ball.radius, paddle.width) {
            let jitter = rng.random_range(-PADDLE_JITTER..=PADDLE_JITTER) as f32;
            bounce_paddle(ball, offset, jitter);

            let mutation = Mutation::roll(rng);
            ball.apply_mutation(&mutation.ball);
            // The radius may have changed, so land on the paddle afterwards
            ball.pos.y = resting_y(arena_height, ball.radius);

            report.sides.push(Side::Paddle);
            report.mutation = Some(mutation);
        }
    }

    report
}

/// Whether a ball `offset` units from the paddle center lands on it
///
/// The window is an imaginary paddle one ball diameter wider than the real
/// one, so clipping the ball with the paddle's edge still counts.
#[inline]
pub fn in_paddle_window(offset: f32, ball_radius: f32, paddle_width: f32) -> bool {
    let effective = ball_radius + paddle_width + ball_radius;
    offset.abs() <= effective / 2.0
}

/// Left wall: heading must end up pointing right, [3°, 177°]
pub fn bounce_left(ball: &mut Ball) {
    let angle = normalize_angle(-ball.angle);
    ball.angle = if (EDGE_MARGIN..=180.0 - EDGE_MARGIN).contains(&angle) {
        angle
    } else if angle > 180.0 - EDGE_MARGIN && angle <= 270.0 {
        180.0 - EDGE_MARGIN
    } else {
        EDGE_MARGIN
    };
    ball.pos.x = ball.radius;
}

/// Right wall: heading must end up pointing left, [183°, 357°]
pub fn bounce_right(ball: &mut Ball, arena_width: f32) {
    let angle = normalize_angle(-ball.angle);
    ball.angle = if (180.0 + EDGE_MARGIN..=360.0 - EDGE_MARGIN).contains(&angle) {
        angle
    } else if angle > 90.0 && angle < 180.0 + EDGE_MARGIN {
        180.0 + EDGE_MARGIN
    } else {
        360.0 - EDGE_MARGIN
    };
    ball.pos.x = arena_width - ball.radius;
}

/// Top wall: heading must end up pointing down, [0°, 87°] or [273°, 360°)
pub fn bounce_top(ball: &mut Ball) {
    let angle = normalize_angle(180.0 - ball.angle);
    ball.angle = if angle > 90.0 - EDGE_MARGIN && angle <= 180.0 {
        90.0 - EDGE_MARGIN
    } else if angle > 180.0 && angle < 270.0 + EDGE_MARGIN {
        270.0 + EDGE_MARGIN
    } else {
        angle
    };
    ball.pos.y = ball.radius;
}

/// Paddle: reflect upward, kick sideways by the landing offset, add jitter
pub fn bounce_paddle(ball: &mut Ball, offset: f32, jitter: f32) {
    let angle = 180.0 - (ball.angle + jitter);
    ball.angle = normalize_angle(angle - offset);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ball_at(x: f32, y: f32, angle: f32) -> Ball {
        let mut ball = Ball::new(ARENA_WIDTH, ARENA_HEIGHT, 0);
        ball.pos = Vec2::new(x, y);
        ball.angle = angle;
        ball
    }

    #[test]
    fn test_left_wall_reflects() {
        // Heading down-left (225°) mirrors to down-right (135°)
        let mut ball = ball_at(4.0, 300.0, 225.0);
        bounce_left(&mut ball);
        assert_eq!(ball.angle, 135.0);
        assert_eq!(ball.pos.x, ball.radius);
    }

    #[test]
    fn test_left_wall_avoids_skimming() {
        let mut ball = ball_at(4.0, 300.0, 359.0);
        bounce_left(&mut ball);
        assert_eq!(ball.angle, 3.0);

        // Reflection still points into the wall (ball going right at the left wall)
        let mut ball = ball_at(4.0, 300.0, 100.0);
        bounce_left(&mut ball);
        assert_eq!(ball.angle, 177.0);
    }

    #[test]
    fn test_right_wall_reflects() {
        let mut ball = ball_at(796.0, 300.0, 45.0);
        bounce_right(&mut ball, ARENA_WIDTH);
        assert_eq!(ball.angle, 315.0);
        assert_eq!(ball.pos.x, ARENA_WIDTH - ball.radius);

        let mut ball = ball_at(796.0, 300.0, 178.0);
        bounce_right(&mut ball, ARENA_WIDTH);
        assert_eq!(ball.angle, 183.0);
    }

    #[test]
    fn test_top_wall_reflects() {
        // Straight up comes straight back down
        let mut ball = ball_at(400.0, 3.0, 180.0);
        bounce_top(&mut ball);
        assert_eq!(ball.angle, 0.0);
        assert_eq!(ball.pos.y, ball.radius);

        // Up-right (135°) becomes down-right (45°)
        let mut ball = ball_at(400.0, 3.0, 135.0);
        bounce_top(&mut ball);
        assert_eq!(ball.angle, 45.0);

        let mut ball = ball_at(400.0, 3.0, 88.0);
        bounce_top(&mut ball);
        assert_eq!(ball.angle, 87.0);
    }

    #[test]
    fn test_paddle_window() {
        // Paddle 100 wide, radius 10: the window reaches 60 units from center
        assert!(in_paddle_window(60.0, 10.0, 100.0));
        assert!(in_paddle_window(-59.5, 10.0, 100.0));
        assert!(!in_paddle_window(61.0, 10.0, 100.0));
        assert!(!in_paddle_window(200.0, 10.0, 100.0));
    }

    #[test]
    fn test_paddle_hit_bounces_and_mutates() {
        let mut rng = Pcg32::seed_from_u64(5);
        let paddle = Paddle::new(ARENA_WIDTH, 0);
        let mut ball = ball_at(460.0, 570.0, 0.0);

        let report = hitcheck(&mut ball, &paddle, ARENA_WIDTH, ARENA_HEIGHT, &mut rng);
        assert_eq!(report.sides, vec![Side::Paddle]);
        let mutation = report.mutation.expect("paddle hit rolls a mutation");
        assert_eq!(ball.radius, mutation.ball.radius);
        assert_eq!(ball.pos.y, ARENA_HEIGHT - PADDLE_HEIGHT - ball.radius);
        // 180 - jitter - 60, jitter in [-10, 10]
        assert!((110.0..=130.0).contains(&ball.angle), "angle = {}", ball.angle);
    }

    #[test]
    fn test_paddle_miss_leaves_ball_alone() {
        let mut rng = Pcg32::seed_from_u64(5);
        let paddle = Paddle::new(ARENA_WIDTH, 0);
        let mut ball = ball_at(600.0, 570.0, 10.0);
        let before = ball.clone();

        let report = hitcheck(&mut ball, &paddle, ARENA_WIDTH, ARENA_HEIGHT, &mut rng);
        assert!(report.sides.is_empty());
        assert!(report.mutation.is_none());
        assert_eq!(ball, before);
    }

    #[test]
    fn test_fake_ball_falls_through_paddle() {
        let mut rng = Pcg32::seed_from_u64(5);
        let paddle = Paddle::new(ARENA_WIDTH, 0);
        let mut ball = ball_at(400.0, 570.0, 0.0);
        ball.is_fake = true;

        let report = hitcheck(&mut ball, &paddle, ARENA_WIDTH, ARENA_HEIGHT, &mut rng);
        assert!(report.sides.is_empty());
        assert_eq!(ball.pos.y, 570.0);
    }

    #[test]
    fn test_corner_applies_both_walls() {
        let mut rng = Pcg32::seed_from_u64(5);
        let paddle = Paddle::new(ARENA_WIDTH, 0);
        let mut ball = ball_at(2.0, 2.0, 225.0);

        let report = hitcheck(&mut ball, &paddle, ARENA_WIDTH, ARENA_HEIGHT, &mut rng);
        assert_eq!(report.sides, vec![Side::Left, Side::Top]);
        assert_eq!(ball.pos, Vec2::new(ball.radius, ball.radius));
        // Left: 225 -> 135, top: 180 - 135 = 45
        assert_eq!(ball.angle, 45.0);
    }

    #[test]
    fn test_resting_ball_does_not_hit_paddle() {
        let mut rng = Pcg32::seed_from_u64(5);
        let paddle = Paddle::new(ARENA_WIDTH, 0);
        let mut ball = Ball::new(ARENA_WIDTH, ARENA_HEIGHT, 0);
        let report = hitcheck(&mut ball, &paddle, ARENA_WIDTH, ARENA_HEIGHT, &mut rng);
        assert!(report.sides.is_empty());
    }

    proptest! {
        #[test]
        fn left_wall_lands_on_wall_and_points_away(x in -50.0f32..9.9, angle in 0.0f32..360.0) {
            let mut ball = ball_at(x, 300.0, angle);
            bounce_left(&mut ball);
            prop_assert_eq!(ball.pos.x, ball.radius);
            prop_assert!((EDGE_MARGIN..=180.0 - EDGE_MARGIN).contains(&ball.angle));
        }

        #[test]
        fn right_wall_lands_on_wall_and_points_away(x in 790.1f32..850.0, angle in 0.0f32..360.0) {
            let mut ball = ball_at(x, 300.0, angle);
            bounce_right(&mut ball, ARENA_WIDTH);
            prop_assert_eq!(ball.pos.x, ARENA_WIDTH - ball.radius);
            prop_assert!((180.0 + EDGE_MARGIN..=360.0 - EDGE_MARGIN).contains(&ball.angle));
        }

        #[test]
        fn top_wall_lands_on_wall_and_points_down(y in -50.0f32..9.9, angle in 0.0f32..360.0) {
            let mut ball = ball_at(400.0, y, angle);
            bounce_top(&mut ball);
            prop_assert_eq!(ball.pos.y, ball.radius);
            prop_assert!(ball.angle <= 90.0 - EDGE_MARGIN || ball.angle >= 270.0 + EDGE_MARGIN);
            prop_assert!((0.0..360.0).contains(&ball.angle));
        }

        #[test]
        fn paddle_bounce_keeps_angle_normalized(
            angle in 0.0f32..360.0,
            offset in -110.0f32..110.0,
            jitter in -10i32..=10,
        ) {
            let mut ball = ball_at(400.0, 570.0, angle);
            bounce_paddle(&mut ball, offset, jitter as f32);
            prop_assert!((0.0..360.0).contains(&ball.angle));
        }
    }
}
