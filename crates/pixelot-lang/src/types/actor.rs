use crate::error::ErrorKind;
use crate::types::canvas::Canvas;
use crate::types::color::Color;

/// The positionable drawing agent. Holds position and brush state; the
/// drawing algorithms live here and mutate the canvas they are handed.
///
/// Until `spawn` succeeds the position is (-1, -1) and no drawing command
/// may run — the interpreter enforces that ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    x: i64,
    y: i64,
    brush: Color,
    size: i64,
}

impl Default for Actor {
    fn default() -> Self {
        Self { x: -1, y: -1, brush: Color::Transparent, size: 1 }
    }
}

impl Actor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    pub fn brush_color(&self) -> Color {
        self.brush
    }

    /// Brush thickness; always odd and at least 1.
    pub fn brush_size(&self) -> i64 {
        self.size
    }

    pub fn spawn(&mut self, canvas: &Canvas, x: i64, y: i64) -> Result<(), ErrorKind> {
        if !canvas.in_bounds(x, y) {
            return Err(ErrorKind::SpawnOutOfBounds {
                x,
                y,
                width: canvas.width(),
                height: canvas.height(),
            });
        }
        self.x = x;
        self.y = y;
        Ok(())
    }

    pub fn set_color(&mut self, name: &str) -> Result<(), ErrorKind> {
        match Color::parse(name) {
            Some(color) => {
                self.brush = color;
                Ok(())
            }
            None => Err(ErrorKind::UnknownColor { name: name.to_string() }),
        }
    }

    /// Coerces even sizes down to the next odd value; anything below 1 is 1.
    pub fn set_size(&mut self, k: i64) {
        let k = if k < 1 { 1 } else if k % 2 == 0 { k - 1 } else { k };
        self.size = k;
    }

    /// Stamps a size×size brush square centered at each cell from the
    /// current position through the end of the line inclusive, then moves
    /// there. A transparent brush moves without drawing.
    ///
    /// The end position is range-checked before anything is painted, and
    /// only steps whose stamp can reach the canvas are walked, so a huge
    /// distance neither overflows nor stalls the run.
    pub fn draw_line(
        &mut self,
        canvas: &mut Canvas,
        dx: i64,
        dy: i64,
        distance: i64,
    ) -> Result<(), ErrorKind> {
        validate_direction(dx, dy)?;
        if distance <= 0 {
            return Err(ErrorKind::InvalidDistance { distance });
        }
        let end_x = self
            .x
            .checked_add(dx * distance)
            .ok_or(ErrorKind::Overflow { op: "DrawLine" })?;
        let end_y = self
            .y
            .checked_add(dy * distance)
            .ok_or(ErrorKind::Overflow { op: "DrawLine" })?;

        let half = (self.size - 1) / 2;
        if let Some((first, last)) = visible_steps(
            (self.x, dx, canvas.width()),
            (self.y, dy, canvas.height()),
            distance,
            half,
        ) {
            for step in first..=last {
                self.stamp(canvas, self.x + dx * step, self.y + dy * step);
            }
        }
        self.x = end_x;
        self.y = end_y;
        Ok(())
    }

    /// Midpoint circle about the current position; the actor then moves
    /// dir·radius onto the circle's edge. Single pixels, no brush thickness.
    pub fn draw_circle(
        &mut self,
        canvas: &mut Canvas,
        dx: i64,
        dy: i64,
        radius: i64,
    ) -> Result<(), ErrorKind> {
        validate_direction_components(dx, dy)?;
        if radius < 0 {
            return Err(ErrorKind::NegativeRadius { radius });
        }
        // Radius and end position are range-checked before any pixel is
        // touched; a radius whose square cannot be represented is rejected.
        let r_sq = radius
            .checked_mul(radius)
            .ok_or(ErrorKind::Overflow { op: "DrawCircle" })?;
        let end_x = self
            .x
            .checked_add(dx * radius)
            .ok_or(ErrorKind::Overflow { op: "DrawCircle" })?;
        let end_y = self
            .y
            .checked_add(dy * radius)
            .ok_or(ErrorKind::Overflow { op: "DrawCircle" })?;

        let (cx, cy) = (self.x, self.y);
        let mut x: i64 = 0;
        let mut y: i64 = -radius;
        while x < -y {
            // Half-integer midpoint decides whether the secondary axis steps in.
            let y_mid = y as f64 + 0.5;
            if (x * x) as f64 + y_mid * y_mid > r_sq as f64 {
                y += 1;
            }

            // Saturated coordinates lie far outside the canvas and clip.
            self.plot(canvas, cx.saturating_add(x), cy.saturating_add(y));
            self.plot(canvas, cx.saturating_sub(x), cy.saturating_add(y));
            self.plot(canvas, cx.saturating_add(x), cy.saturating_sub(y));
            self.plot(canvas, cx.saturating_sub(x), cy.saturating_sub(y));
            self.plot(canvas, cx.saturating_add(y), cy.saturating_add(x));
            self.plot(canvas, cx.saturating_add(y), cy.saturating_sub(x));
            self.plot(canvas, cx.saturating_sub(y), cy.saturating_add(x));
            self.plot(canvas, cx.saturating_sub(y), cy.saturating_sub(x));

            x += 1;
        }

        self.x = end_x;
        self.y = end_y;
        Ok(())
    }

    /// Outline of a width×height rectangle centered on the actor, sides
    /// stamped with the brush square. The actor does not move.
    pub fn draw_rectangle(
        &mut self,
        canvas: &mut Canvas,
        width: i64,
        height: i64,
    ) -> Result<(), ErrorKind> {
        if width <= 0 || height <= 0 {
            return Err(ErrorKind::InvalidRectangle { width, height });
        }
        // Corners in i128: an oversized rectangle clips rather than wrapping.
        let x0 = self.x as i128 - (width / 2) as i128;
        let y0 = self.y as i128 - (height / 2) as i128;
        let x1 = x0 + width as i128 - 1;
        let y1 = y0 + height as i128 - 1;

        let half = (self.size - 1) / 2;
        if let Some((lo, hi)) = side_cells(x0, x1, canvas.width(), half) {
            for x in lo..=hi {
                self.stamp(canvas, x, clamp_i64(y0));
                self.stamp(canvas, x, clamp_i64(y1));
            }
        }
        if let Some((lo, hi)) = side_cells(y0, y1, canvas.height(), half) {
            for y in lo..=hi {
                self.stamp(canvas, clamp_i64(x0), y);
                self.stamp(canvas, clamp_i64(x1), y);
            }
        }
        Ok(())
    }

    /// 4-directional flood fill of the region under the actor with the brush
    /// color. Iterative with an explicit pending-cell stack, so a fill
    /// spanning the whole canvas cannot overflow the call stack.
    pub fn fill(&mut self, canvas: &mut Canvas) {
        let replacement = self.brush;
        if replacement == Color::Transparent {
            return;
        }
        let Some(target) = canvas.get(self.x, self.y) else { return };
        if target == replacement {
            return;
        }

        let mut pending = vec![(self.x, self.y)];
        while let Some((x, y)) = pending.pop() {
            if canvas.get(x, y) != Some(target) {
                continue;
            }
            canvas.set(x, y, replacement);
            pending.push((x, y + 1));
            pending.push((x, y - 1));
            pending.push((x + 1, y));
            pending.push((x - 1, y));
        }
    }

    /// Brush square of side `size` centered at (cx, cy), clipped to the
    /// canvas. Transparent stamps nothing. Walks only the clipped
    /// intersection, so an enormous brush costs at most one canvas sweep.
    fn stamp(&self, canvas: &mut Canvas, cx: i64, cy: i64) {
        if self.brush == Color::Transparent {
            return;
        }
        let half = (self.size - 1) / 2;
        let Some((x_lo, x_hi)) = brush_span(cx, half, canvas.width()) else { return };
        let Some((y_lo, y_hi)) = brush_span(cy, half, canvas.height()) else { return };
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                canvas.set(x, y, self.brush);
            }
        }
    }

    fn plot(&self, canvas: &mut Canvas, x: i64, y: i64) {
        if self.brush == Color::Transparent {
            return;
        }
        canvas.set(x, y, self.brush);
    }
}

/// Line directions: components in {-1, 0, 1} and not both zero.
fn validate_direction(dx: i64, dy: i64) -> Result<(), ErrorKind> {
    validate_direction_components(dx, dy)?;
    if dx == 0 && dy == 0 {
        return Err(ErrorKind::InvalidDirection { dx, dy });
    }
    Ok(())
}

/// Circle directions allow (0, 0) — the actor simply stays on the center.
fn validate_direction_components(dx: i64, dy: i64) -> Result<(), ErrorKind> {
    if dx.abs() > 1 || dy.abs() > 1 {
        return Err(ErrorKind::InvalidDirection { dx, dy });
    }
    Ok(())
}

/// Steps of a line walk whose brush stamp can reach the canvas, or `None`
/// when the whole walk is invisible. Intermediate math is i128 so extreme
/// positions and distances cannot wrap.
fn visible_steps(
    x_axis: (i64, i64, usize),
    y_axis: (i64, i64, usize),
    distance: i64,
    half: i64,
) -> Option<(i64, i64)> {
    let (x_lo, x_hi) = axis_steps(x_axis, distance, half)?;
    let (y_lo, y_hi) = axis_steps(y_axis, distance, half)?;
    let (lo, hi) = (x_lo.max(y_lo), x_hi.min(y_hi));
    if lo > hi { None } else { Some((lo, hi)) }
}

fn axis_steps((start, dir, len): (i64, i64, usize), distance: i64, half: i64) -> Option<(i64, i64)> {
    let start = start as i128;
    let lo_cell = -(half as i128);
    let hi_cell = len as i128 - 1 + half as i128;
    match dir {
        0 => {
            if start < lo_cell || start > hi_cell {
                None
            } else {
                Some((0, distance))
            }
        }
        1 => clamp_steps(lo_cell - start, hi_cell - start, distance),
        _ => clamp_steps(start - hi_cell, start - lo_cell, distance),
    }
}

fn clamp_steps(lo: i128, hi: i128, distance: i64) -> Option<(i64, i64)> {
    let lo = lo.max(0);
    let hi = hi.min(distance as i128);
    if lo > hi { None } else { Some((lo as i64, hi as i64)) }
}

/// Intersection of the brush extent around `center` with `[0, len)`.
fn brush_span(center: i64, half: i64, len: usize) -> Option<(i64, i64)> {
    let lo = (center as i128 - half as i128).max(0);
    let hi = (center as i128 + half as i128).min(len as i128 - 1);
    if lo > hi { None } else { Some((lo as i64, hi as i64)) }
}

/// Cells of a rectangle side run that can reach the canvas on their axis.
fn side_cells(a: i128, b: i128, len: usize, half: i64) -> Option<(i64, i64)> {
    let lo = a.max(-(half as i128));
    let hi = b.min(len as i128 - 1 + half as i128);
    if lo > hi { None } else { Some((lo as i64, hi as i64)) }
}

fn clamp_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
