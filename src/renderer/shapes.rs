//! Shape rasterization for 2D primitives
//!
//! Shapes are defined in arena coordinates and sampled at pixel centers, so
//! the canvas can stretch the arena over any pixel grid.

use glam::Vec2;

use crate::platform::Rect;

/// Maps pixel indices to arena coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Arena units per pixel
    pub scale: Vec2,
}

impl Viewport {
    pub fn new(arena: Vec2, pixels: (usize, usize)) -> Self {
        let px = Vec2::new(pixels.0.max(1) as f32, pixels.1.max(1) as f32);
        Self { scale: arena / px }
    }

    /// Arena position of the center of pixel (x, y)
    #[inline]
    pub fn to_arena(&self, x: usize, y: usize) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + 0.5) * self.scale
    }

    /// Pixel range covering arena span [lo, hi] on one axis, clipped to `len`
    fn span(lo: f32, hi: f32, scale: f32, len: usize) -> std::ops::Range<usize> {
        let start = (lo / scale).floor().max(0.0) as usize;
        let end = ((hi / scale).ceil().max(0.0) as usize).min(len);
        start.min(end)..end
    }

    /// Pixels whose centers may lie inside `rect`
    pub fn rect_pixels(&self, rect: Rect, size: (usize, usize)) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        (
            Self::span(rect.x, rect.x + rect.w, self.scale.x, size.0),
            Self::span(rect.y, rect.y + rect.h, self.scale.y, size.1),
        )
    }
}

/// Bounding box of a circle
pub fn circle_bounds(center: Vec2, radius: f32) -> Rect {
    Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
}

/// Filled disc test
#[inline]
pub fn in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance_squared(center) <= radius * radius
}

/// Ring test; `thickness` is measured inward from the edge, at least one pixel wide
#[inline]
pub fn on_circle_edge(p: Vec2, center: Vec2, radius: f32, thickness: f32, pixel: Vec2) -> bool {
    let d = p.distance(center);
    let band = thickness.max(pixel.max_element());
    d <= radius && d >= radius - band
}

/// Rectangle outline test; at least one pixel wide on each axis
#[inline]
pub fn on_rect_edge(p: Vec2, rect: Rect, thickness: f32, pixel: Vec2) -> bool {
    if !rect.contains(p) {
        return false;
    }
    let tx = thickness.max(pixel.x);
    let ty = thickness.max(pixel.y);
    p.x < rect.x + tx || p.x >= rect.x + rect.w - tx || p.y < rect.y + ty || p.y >= rect.y + rect.h - ty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_maps_pixel_centers() {
        let vp = Viewport::new(Vec2::new(800.0, 600.0), (80, 60));
        assert_eq!(vp.scale, Vec2::new(10.0, 10.0));
        assert_eq!(vp.to_arena(0, 0), Vec2::new(5.0, 5.0));
        assert_eq!(vp.to_arena(79, 59), Vec2::new(795.0, 595.0));
    }

    #[test]
    fn test_rect_pixels_clipped() {
        let vp = Viewport::new(Vec2::new(800.0, 600.0), (80, 60));
        let (xs, ys) = vp.rect_pixels(Rect::new(-30.0, 580.0, 60.0, 50.0), (80, 60));
        assert_eq!(xs, 0..3);
        assert_eq!(ys, 58..60);

        let (xs, _) = vp.rect_pixels(Rect::new(900.0, 0.0, 10.0, 10.0), (80, 60));
        assert!(xs.is_empty());
    }

    #[test]
    fn test_circle_tests() {
        let c = Vec2::new(100.0, 100.0);
        assert!(in_circle(Vec2::new(105.0, 100.0), c, 10.0));
        assert!(!in_circle(Vec2::new(111.0, 100.0), c, 10.0));

        let pixel = Vec2::splat(1.0);
        assert!(on_circle_edge(Vec2::new(109.5, 100.0), c, 10.0, 1.0, pixel));
        assert!(!on_circle_edge(Vec2::new(100.0, 100.0), c, 10.0, 1.0, pixel));
    }

    #[test]
    fn test_rect_edge() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let pixel = Vec2::splat(1.0);
        assert!(on_rect_edge(Vec2::new(0.5, 5.0), rect, 1.0, pixel));
        assert!(!on_rect_edge(Vec2::new(5.0, 5.0), rect, 1.0, pixel));
        assert!(!on_rect_edge(Vec2::new(11.0, 5.0), rect, 1.0, pixel));
    }
}
