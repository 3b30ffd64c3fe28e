use crate::types::color::Color;

/// Fixed-size color grid. Bounds are `[0, width) × [0, height)`; writes
/// outside them are silently clipped, reads outside them return `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    revision: u64,
}

impl Canvas {
    /// A fresh canvas cleared to white. Dimensions must be positive; the
    /// public `run`/`Session` entry points validate that before building one.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![Color::White; width * height], revision: 0 }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Monotonic change counter. Bumped by every successful mutation, so a
    /// host (or the repaint hook) can detect "something was drawn" cheaply.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Color> {
        if self.in_bounds(x, y) {
            Some(self.pixels[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    /// Returns true when the pixel was inside the canvas and written.
    pub fn set(&mut self, x: i64, y: i64, color: Color) -> bool {
        if self.in_bounds(x, y) {
            self.pixels[y as usize * self.width + x as usize] = color;
            self.revision += 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.revision += 1;
    }

    /// Count of pixels matching `color` in the axis-aligned rectangle with
    /// corners `(x1, y1)` and `(x2, y2)`, accepted in any order. Returns 0
    /// when either corner lies outside the canvas.
    pub fn count_color(&self, color: Color, x1: i64, y1: i64, x2: i64, y2: i64) -> i64 {
        if !self.in_bounds(x1, y1) || !self.in_bounds(x2, y2) {
            return 0;
        }
        let (lo_x, hi_x) = (x1.min(x2), x1.max(x2));
        let (lo_y, hi_y) = (y1.min(y2), y1.max(y2));
        let mut count = 0;
        for y in lo_y..=hi_y {
            for x in lo_x..=hi_x {
                if self.pixels[y as usize * self.width + x as usize] == color {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_white() {
        let canvas = Canvas::new(3, 2);
        assert_eq!(canvas.get(0, 0), Some(Color::White));
        assert_eq!(canvas.get(2, 1), Some(Color::White));
    }

    #[test]
    fn out_of_bounds_reads_and_writes() {
        let mut canvas = Canvas::new(3, 3);
        assert_eq!(canvas.get(3, 0), None);
        assert_eq!(canvas.get(-1, 0), None);
        assert!(!canvas.set(0, 3, Color::Red));
        assert!(canvas.set(2, 2, Color::Red));
    }

    #[test]
    fn revision_tracks_mutations() {
        let mut canvas = Canvas::new(2, 2);
        let r0 = canvas.revision();
        canvas.set(5, 5, Color::Red); // clipped, no change
        assert_eq!(canvas.revision(), r0);
        canvas.set(1, 1, Color::Red);
        assert!(canvas.revision() > r0);
    }

    #[test]
    fn count_color_accepts_corners_in_any_order() {
        let mut canvas = Canvas::new(4, 4);
        canvas.set(1, 1, Color::Blue);
        canvas.set(2, 2, Color::Blue);
        assert_eq!(canvas.count_color(Color::Blue, 0, 0, 3, 3), 2);
        assert_eq!(canvas.count_color(Color::Blue, 3, 3, 0, 0), 2);
        assert_eq!(canvas.count_color(Color::Blue, 3, 0, 0, 3), 2);
    }

    #[test]
    fn count_color_out_of_bounds_corner_is_zero() {
        let canvas = Canvas::new(4, 4);
        assert_eq!(canvas.count_color(Color::White, 0, 0, 4, 3), 0);
        assert_eq!(canvas.count_color(Color::White, -1, 0, 3, 3), 0);
    }
}
