//! Half-block pixel canvas
//!
//! Each terminal cell shows two vertically stacked pixels using `▀` with the
//! top pixel as foreground and the bottom one as background. Text is kept in
//! a separate cell grid and printed on top of the pixels.

use std::io::{self, Write};

use crossterm::{cursor, queue, style};
use glam::Vec2;

use super::shapes::{Viewport, circle_bounds, in_circle, on_circle_edge, on_rect_edge};
use crate::platform::{Color, Rect};

pub struct PixelCanvas {
    cols: usize,
    rows: usize,
    /// cols x (rows * 2)
    px: Vec<Color>,
    text: Vec<Option<(char, Color)>>,
    arena: Vec2,
    viewport: Viewport,
}

impl PixelCanvas {
    /// Canvas of `cols` x `rows` terminal cells showing an arena of `arena` units
    pub fn new(cols: usize, rows: usize, arena: Vec2) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            px: vec![Color::BLACK; cols * rows * 2],
            text: vec![None; cols * rows],
            arena,
            viewport: Viewport::new(arena, (cols, rows * 2)),
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        *self = Self::new(cols, rows, self.arena);
    }

    /// Size in pixels (width, height)
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.cols, self.rows * 2)
    }

    /// Size in terminal cells (cols, rows)
    pub fn cell_size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Arena rectangle covered by a block of terminal cells
    pub fn cell_rect(&self, col: usize, row: usize, cols: usize, rows: usize) -> Rect {
        let cell = Vec2::new(self.viewport.scale.x, self.viewport.scale.y * 2.0);
        Rect::new(
            col as f32 * cell.x,
            row as f32 * cell.y,
            cols as f32 * cell.x,
            rows as f32 * cell.y,
        )
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.px[y * self.cols + x]
    }

    pub fn text_at(&self, col: usize, row: usize) -> Option<char> {
        self.text[row * self.cols + col].map(|(ch, _)| ch)
    }

    pub fn clear(&mut self, color: Color) {
        self.px.fill(color);
        self.text.fill(None);
    }

    /// Set every pixel inside `bounds` whose center passes `inside`
    fn paint<F>(&mut self, bounds: Rect, color: Color, inside: F)
    where
        F: Fn(Vec2) -> bool,
    {
        let size = self.pixel_size();
        let (xs, ys) = self.viewport.rect_pixels(bounds, size);
        for y in ys {
            for x in xs.clone() {
                if inside(self.viewport.to_arena(x, y)) {
                    self.px[y * self.cols + x] = color;
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.paint(circle_bounds(center, radius), color, |p| in_circle(p, center, radius));
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, thickness: f32) {
        let pixel = self.viewport.scale;
        self.paint(circle_bounds(center, radius), color, |p| {
            on_circle_edge(p, center, radius, thickness, pixel)
        });
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.paint(rect, color, |p| rect.contains(p));
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32) {
        let pixel = self.viewport.scale;
        self.paint(rect, color, |p| on_rect_edge(p, rect, thickness, pixel));
    }

    /// Place text with its top-left corner at arena position `pos`
    pub fn draw_text(&mut self, text: &str, color: Color, pos: Vec2) {
        let col = (pos.x / self.viewport.scale.x).max(0.0) as usize;
        let row = (pos.y / (self.viewport.scale.y * 2.0)).max(0.0) as usize;
        self.put_text(col, row, text, color);
    }

    /// Place text at a terminal cell, clipped to the canvas
    pub fn put_text(&mut self, col: usize, row: usize, text: &str, color: Color) {
        if row >= self.rows {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let c = col + i;
            if c >= self.cols {
                break;
            }
            self.text[row * self.cols + c] = Some((ch, color));
        }
    }

    /// Write the whole canvas to `out`
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let mut fg: Option<Color> = None;
        let mut bg: Option<Color> = None;

        for row in 0..self.rows {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..self.cols {
                let top = self.pixel(col, row * 2);
                let bottom = self.pixel(col, row * 2 + 1);

                let (ch, want_fg, want_bg) = match self.text[row * self.cols + col] {
                    Some((ch, color)) => (ch, color, top),
                    None if top == bottom => (' ', fg.unwrap_or(top), top),
                    None => ('\u{2580}', top, bottom), // ▀
                };

                if fg != Some(want_fg) {
                    queue!(out, style::SetForegroundColor(to_term(want_fg)))?;
                    fg = Some(want_fg);
                }
                if bg != Some(want_bg) {
                    queue!(out, style::SetBackgroundColor(to_term(want_bg)))?;
                    bg = Some(want_bg);
                }
                queue!(out, style::Print(ch))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

pub fn to_term(c: Color) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> PixelCanvas {
        // 10 arena units per pixel
        PixelCanvas::new(80, 30, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_fill_circle_marks_center() {
        let mut c = canvas();
        c.fill_circle(Vec2::new(400.0, 300.0), 50.0, Color::WHITE);
        assert_eq!(c.pixel(40, 30), Color::WHITE);
        assert_eq!(c.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_stroke_circle_hollow() {
        let mut c = canvas();
        c.stroke_circle(Vec2::new(400.0, 300.0), 50.0, Color::WHITE, 1.0);
        assert_eq!(c.pixel(40, 30), Color::BLACK);
        assert_eq!(c.pixel(44, 30), Color::WHITE);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut c = canvas();
        c.fill_rect(Rect::new(750.0, 575.0, 100.0, 12.0), Color::GREEN);
        assert_eq!(c.pixel(79, 58), Color::GREEN);
        assert_eq!(c.pixel(74, 58), Color::BLACK);
    }

    #[test]
    fn test_text_is_clipped_and_cleared() {
        let mut c = canvas();
        c.draw_text("00:00:00", Color::WHITE, Vec2::ZERO);
        assert_eq!(c.text_at(0, 0), Some('0'));
        assert_eq!(c.text_at(2, 0), Some(':'));
        c.put_text(78, 0, "abc", Color::WHITE);
        assert_eq!(c.text_at(79, 0), Some('b'));
        c.clear(Color::RED);
        assert_eq!(c.text_at(0, 0), None);
        assert_eq!(c.pixel(5, 5), Color::RED);
    }

    #[test]
    fn test_render_writes_every_cell() {
        let mut c = PixelCanvas::new(4, 2, Vec2::new(40.0, 40.0));
        c.fill_rect(Rect::new(0.0, 0.0, 40.0, 10.0), Color::WHITE);
        let mut out = Vec::new();
        c.render(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert_eq!(s.matches('\u{2580}').count(), 4);
    }
}
