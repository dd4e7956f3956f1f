//! Platform abstraction layer
//!
//! The game core only talks to the outside world through these traits:
//! - `Renderer`: a handful of drawing primitives in arena coordinates
//! - `InputSource`: discrete key edges, polled once per frame
//! - `Dialogs`: blocking name prompt and message box
//!
//! `terminal` implements all three on top of crossterm.

pub mod terminal;

use std::io;

use glam::Vec2;

pub use terminal::Terminal;

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Axis-aligned rectangle in arena coordinates (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

/// Drawing primitives the game needs
pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32);
    fn draw_text(&mut self, text: &str, color: Color, pos: Vec2);
    /// Show everything drawn since the last `clear`
    fn present(&mut self) -> io::Result<()>;
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Up, W, space or enter
    Launch,
    Help,
    NewRound,
    ShowScores,
    Quit,
}

/// Input events, polled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    /// Only left and right releases matter to the game
    KeyUp(Key),
    /// Window (or terminal) closed
    Close,
}

pub trait InputSource {
    /// Everything that happened since the previous poll; never blocks
    fn poll(&mut self) -> io::Result<Vec<InputEvent>>;
}

/// Blocking modal dialogs
pub trait Dialogs {
    /// Ask for a line of text; `None` if cancelled
    fn prompt(&mut self, title: &str, prompt: &str) -> io::Result<Option<String>>;
    fn message(&mut self, title: &str, body: &str) -> io::Result<()>;
}
