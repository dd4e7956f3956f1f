//! Scene drawing
//!
//! Turns a `GameState` into calls on a `platform::Renderer`. The palette
//! flips while double speed is on.

pub mod canvas;
pub mod shapes;

pub use canvas::PixelCanvas;

use glam::Vec2;

use crate::consts::{PADDLE_HEIGHT, PADDLE_THICKNESS};
use crate::platform::{Color, Rect, Renderer};
use crate::sim::{GameState, Paddle};

/// Colors for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub ball_fill: Color,
    pub ball_border: Color,
    pub paddle: Color,
    pub text: Color,
}

impl Palette {
    pub const NORMAL: Palette = Palette {
        background: Color::BLACK,
        ball_fill: Color::WHITE,
        ball_border: Color::BLACK,
        paddle: Color::GREEN,
        text: Color::WHITE,
    };

    pub const CRAZY: Palette = Palette {
        background: Color::RED,
        ball_fill: Color::BLACK,
        ball_border: Color::WHITE,
        paddle: Color::BLACK,
        text: Color::BLACK,
    };

    pub fn for_state(state: &GameState) -> Palette {
        if state.double_speed {
            Palette::CRAZY
        } else {
            Palette::NORMAL
        }
    }
}

/// Rectangle the paddle occupies on screen
pub fn paddle_rect(paddle: &Paddle, arena_height: f32) -> Rect {
    Rect::new(
        paddle.x - paddle.width / 2.0,
        arena_height - PADDLE_HEIGHT,
        paddle.width,
        PADDLE_THICKNESS,
    )
}

/// Draw one frame: background, clock, paddle, balls; then present
pub fn draw_scene<R: Renderer + ?Sized>(
    r: &mut R,
    state: &GameState,
    clock_text: &str,
    frame_rate: u32,
) -> std::io::Result<()> {
    let palette = Palette::for_state(state);
    r.clear(palette.background);
    r.draw_text(clock_text, palette.text, Vec2::ZERO);

    if state.paddle.is_visible(state.frame, frame_rate) {
        r.fill_rect(paddle_rect(&state.paddle, state.height), palette.paddle);
    }

    // Decoys look exactly like real balls
    for ball in state.balls.iter().filter(|b| b.is_visible(state.frame, frame_rate)) {
        r.fill_circle(ball.pos, ball.radius, palette.ball_fill);
        r.stroke_circle(ball.pos, ball.radius, palette.ball_border, 1.0);
    }

    r.present()
}
