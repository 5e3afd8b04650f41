//! A tiny immediate-mode rasterizer for baking textures from primitives.
//!
//! Coordinates are integer pixels with the origin at the top-left. Anything
//! drawn outside the canvas is clipped. Every draw is an opaque overwrite.

use image::{Rgba, RgbaImage};

use crate::palette;

/// One primitive operation in a texture recipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawStep {
    FillStyle(Rgba<u8>),
    LineStyle { width: u32, color: Rgba<u8> },
    FillRect { x: i32, y: i32, w: u32, h: u32 },
    FillCircle { cx: i32, cy: i32, r: u32 },
    StrokeCircle { cx: i32, cy: i32, r: u32 },
    Line { from: (i32, i32), to: (i32, i32) },
}

pub struct Canvas {
    image: RgbaImage,
    fill: Rgba<u8>,
    stroke: Rgba<u8>,
    line_width: u32,
}

impl Canvas {
    /// A fully transparent canvas. Callers validate the size beforehand.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            fill: palette::BLACK,
            stroke: palette::BLACK,
            line_width: 1,
        }
    }

    pub fn apply(&mut self, step: &DrawStep) {
        match *step {
            DrawStep::FillStyle(color) => self.fill = color,
            DrawStep::LineStyle { width, color } => {
                self.line_width = width.max(1);
                self.stroke = color;
            }
            DrawStep::FillRect { x, y, w, h } => self.fill_rect(x, y, w, h),
            DrawStep::FillCircle { cx, cy, r } => self.fill_circle(cx, cy, r),
            DrawStep::StrokeCircle { cx, cy, r } => self.stroke_circle(cx, cy, r),
            DrawStep::Line { from, to } => self.line(from, to),
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        let color = self.fill;
        for py in y..y.saturating_add(h as i32) {
            for px in x..x.saturating_add(w as i32) {
                self.put(px, py, color);
            }
        }
    }

    /// Fills every pixel whose center lies within `r` of (cx, cy).
    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: u32) {
        let color = self.fill;
        let r = r as i32;
        let limit = (r as f32) * (r as f32);
        for py in (cy - r)..=(cy + r) {
            for px in (cx - r)..=(cx + r) {
                if distance_sq_to_pixel_center(px, py, cx, cy) <= limit {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Strokes a ring `line_width` pixels wide centered on radius `r`.
    pub fn stroke_circle(&mut self, cx: i32, cy: i32, r: u32) {
        let color = self.stroke;
        let half = self.line_width as f32 / 2.0;
        let reach = r as i32 + self.line_width as i32;
        for py in (cy - reach)..=(cy + reach) {
            for px in (cx - reach)..=(cx + reach) {
                let d = distance_sq_to_pixel_center(px, py, cx, cy).sqrt();
                if (d - r as f32).abs() <= half {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Bresenham line. Endpoints past the far edge are pulled onto the canvas
    /// so a line "to 32" on a 32px canvas ends on the last pixel.
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32)) {
        let (mut x0, mut y0) = self.clamp_point(from);
        let (x1, y1) = self.clamp_point(to);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.image.width() && y < self.image.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn stamp(&mut self, x: i32, y: i32) {
        let color = self.stroke;
        let w = self.line_width as i32;
        let start = -(w - 1) / 2;
        for oy in start..start + w {
            for ox in start..start + w {
                self.put(x + ox, y + oy, color);
            }
        }
    }

    fn clamp_point(&self, (x, y): (i32, i32)) -> (i32, i32) {
        let max_x = self.image.width().saturating_sub(1) as i32;
        let max_y = self.image.height().saturating_sub(1) as i32;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, color);
        }
    }
}

fn distance_sq_to_pixel_center(px: i32, py: i32, cx: i32, cy: i32) -> f32 {
    let dx = px as f32 + 0.5 - cx as f32;
    let dy = py as f32 + 0.5 - cy as f32;
    dx * dx + dy * dy
}
