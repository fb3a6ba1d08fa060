//! Outline drawing onto a [`Bitmap`].
//!
//! Coordinates are signed so shapes may hang off the edge of the image;
//! anything outside is clipped without error.

use crate::picture::{Bitmap, Rgb};

/// Width and color used by every drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenState {
    pub width: u32,
    pub color: Rgb,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            width: 1,
            color: Rgb::BLACK,
        }
    }
}

/// Draws shapes onto one image with the current pen.
pub struct Drawer<'a> {
    image: &'a mut Bitmap,
    pen: PenState,
}

impl<'a> Drawer<'a> {
    pub fn new(image: &'a mut Bitmap) -> Self {
        Self {
            image,
            pen: PenState::default(),
        }
    }

    /// Set the pen width. Widths below 1 are raised to 1.
    pub fn pen_width(&mut self, width: u32) {
        self.pen.width = width.max(1);
    }

    pub fn pen_color(&mut self, color: Rgb) {
        self.pen.color = color;
    }

    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Stamp the pen at `(x, y)`: a single pixel for a width of 1, otherwise a
    /// `width` × `width` square around the point.
    pub fn plot_pen_pixel(&mut self, x: i32, y: i32) {
        self.stamp(x as i64, y as i64);
    }

    fn stamp(&mut self, x: i64, y: i64) {
        let width = self.pen.width as i64;
        if width == 1 {
            self.image.plot(x, y, self.pen.color);
            return;
        }

        let low = -(width - 1) / 2;
        let high = width / 2;
        for dy in low..=high {
            for dx in low..=high {
                self.image.plot(x + dx, y + dy, self.pen.color);
            }
        }
    }

    /// Distance past the image edge at which a stamped point can still
    /// touch a pixel, plus one.
    fn reach(&self) -> i64 {
        self.pen.width as i64 / 2 + 1
    }

    /// Clamp the span `low..=high` along an axis of `extent` pixels to the
    /// part where stamps can land.
    fn clip_span(&self, low: i64, high: i64, extent: u32) -> (i64, i64) {
        let reach = self.reach();
        (low.max(-reach), high.min(extent as i64 - 1 + reach))
    }

    /// Largest offset from `center` that can still be visible along an axis
    /// of `extent` pixels.
    fn farthest(&self, center: i64, extent: u32) -> i64 {
        let reach = self.reach();
        (center + reach).max(extent as i64 - 1 + reach - center)
    }

    /// True if the outline of the ellipse with radii `rx`, `ry` around
    /// `(cx, cy)` cannot touch the image.
    fn outline_misses(&self, cx: i64, cy: i64, rx: i64, ry: i64) -> bool {
        let reach = self.reach();
        let right = self.image.width() as i64 - 1 + reach;
        let bottom = self.image.height() as i64 - 1 + reach;

        if cx + rx < -reach || cx - rx > right || cy + ry < -reach || cy - ry > bottom {
            return true;
        }

        // Everything inside the half-size ellipse is at least half the
        // smaller radius away from the outline
        let (hx, hy) = (rx as f64 / 2.0, ry as f64 / 2.0);
        if hx.min(hy) <= self.pen.width as f64 + 2.0 {
            return false;
        }
        [(-reach, -reach), (right, -reach), (-reach, bottom), (right, bottom)]
            .iter()
            .all(|&(px, py)| {
                let dx = (px - cx) as f64 / hx;
                let dy = (py - cy) as f64 / hy;
                dx * dx + dy * dy < 1.0
            })
    }

    /// Bresenham line from `(x1, y1)` to `(x2, y2)`, both ends included.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);
        let (left, right) = self.clip_span(x1.min(x2), x1.max(x2), self.image.width());
        let (top, bottom) = self.clip_span(y1.min(y2), y1.max(y2), self.image.height());
        if left > right || top > bottom {
            return;
        }

        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x1, y1);

        loop {
            self.stamp(x, y);
            if x == x2 && y == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn horizontal_line_segment(&mut self, x1: i32, x2: i32, y: i32) {
        self.horizontal_span(x1.min(x2) as i64, x1.max(x2) as i64, y as i64);
    }

    fn horizontal_span(&mut self, x1: i64, x2: i64, y: i64) {
        let (left, right) = self.clip_span(x1, x2, self.image.width());
        for x in left..=right {
            self.stamp(x, y);
        }
    }

    pub fn vertical_line_segment(&mut self, y1: i32, y2: i32, x: i32) {
        let (top, bottom) = self.clip_span(y1.min(y2) as i64, y1.max(y2) as i64, self.image.height());
        for y in top..=bottom {
            self.stamp(x as i64, y);
        }
    }

    /// Midpoint circle outline of radius `radius` around `(cx, cy)`.
    pub fn circle(&mut self, cx: i32, cy: i32, radius: i32) {
        if radius < 0 {
            return;
        }

        let (cx, cy) = (cx as i64, cy as i64);
        let mut x = radius as i64;
        if self.outline_misses(cx, cy, x, x) {
            return;
        }

        // Past this offset every one of the eight points is off the image
        let limit = self.farthest(cx, self.image.width()).max(self.farthest(cy, self.image.height()));

        let mut y = 0;
        let mut err = 1 - x;

        while x >= y && y <= limit {
            self.stamp(cx + x, cy + y);
            self.stamp(cx + y, cy + x);
            self.stamp(cx - y, cy + x);
            self.stamp(cx - x, cy + y);
            self.stamp(cx - x, cy - y);
            self.stamp(cx - y, cy - x);
            self.stamp(cx + y, cy - x);
            self.stamp(cx + x, cy - y);

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Midpoint ellipse outline with horizontal radius `rx` and vertical
    /// radius `ry`.
    pub fn ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32) {
        if rx < 0 || ry < 0 {
            return;
        }

        let (cx, cy) = (cx as i64, cy as i64);
        let (rx, ry) = (rx as i64, ry as i64);
        if ry == 0 {
            self.horizontal_span(cx - rx, cx + rx, cy);
            return;
        }
        if self.outline_misses(cx, cy, rx, ry) {
            return;
        }

        // x never decreases, and past this every point is off the image
        let limit = self.farthest(cx, self.image.width());

        // Decision variables are scaled by 4 to stay integral
        let (rx2, ry2) = (rx as i128 * rx as i128, ry as i128 * ry as i128);
        let (mut x, mut y) = (0i64, ry);
        let mut dx = 0i128;
        let mut dy = 2 * rx2 * y as i128;

        // Shallow part, slope above -1
        let mut p = 4 * ry2 - 4 * rx2 * ry as i128 + rx2;
        while dx < dy {
            if x > limit {
                return;
            }
            self.plot_ellipse_points(cx, cy, x, y);

            x += 1;
            dx += 2 * ry2;
            if p < 0 {
                p += 4 * (dx + ry2);
            } else {
                y -= 1;
                dy -= 2 * rx2;
                p += 4 * (dx - dy + ry2);
            }
        }

        // Steep part
        let (x_wide, y_wide) = (x as i128, y as i128);
        let mut p = ry2 * (2 * x_wide + 1) * (2 * x_wide + 1) + 4 * rx2 * (y_wide - 1) * (y_wide - 1)
            - 4 * rx2 * ry2;
        while y >= 0 {
            if x > limit {
                return;
            }
            self.plot_ellipse_points(cx, cy, x, y);

            y -= 1;
            dy -= 2 * rx2;
            if p > 0 {
                p += 4 * (rx2 - dy);
            } else {
                x += 1;
                dx += 2 * ry2;
                p += 4 * (dx - dy + rx2);
            }
        }

        // Very flat ellipses leave the steep part before reaching the tips
        for tip in x..=rx.min(limit) {
            self.plot_ellipse_points(cx, cy, tip, 0);
        }
    }

    fn plot_ellipse_points(&mut self, cx: i64, cy: i64, x: i64, y: i64) {
        self.stamp(cx + x, cy + y);
        self.stamp(cx - x, cy + y);
        self.stamp(cx + x, cy - y);
        self.stamp(cx - x, cy - y);
    }

    /// Outline of the axis aligned rectangle with opposite corners
    /// `(x1, y1)` and `(x2, y2)`.
    pub fn rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.line(x1, y1, x2, y1);
        self.line(x2, y1, x2, y2);
        self.line(x2, y2, x1, y2);
        self.line(x1, y2, x1, y1);
    }

    /// Like [`Drawer::rectangle`], but the inside is filled with the pen color
    /// as well.
    pub fn fill_rectangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (top, bottom) = self.clip_span(y1.min(y2) as i64, y1.max(y2) as i64, self.image.height());
        for y in top..=bottom {
            self.horizontal_span(x1.min(x2) as i64, x1.max(x2) as i64, y);
        }
    }

    pub fn triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.line(x1, y1, x2, y2);
        self.line(x2, y2, x3, y3);
        self.line(x3, y3, x1, y1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn painted(image: &Bitmap) -> Vec<(u32, u32)> {
        let mut points = Vec::new();
        for y in 0..image.height() {
            for x in 0..image.width() {
                if image.get_pixel(x, y) != Some(Rgb::BLACK) {
                    points.push((x, y));
                }
            }
        }
        points
    }

    #[test]
    fn pen_defaults_and_width_floor() {
        let mut image = Bitmap::new(4, 4).unwrap();
        let mut draw = Drawer::new(&mut image);
        assert_eq!(draw.pen(), PenState::default());

        draw.pen_width(0);
        assert_eq!(draw.pen().width, 1);
    }

    #[test]
    fn diagonal_line() {
        let mut image = Bitmap::new(5, 5).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.line(0, 0, 4, 4);

        assert_eq!(painted(&image), vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
    }

    #[test]
    fn reversed_line_matches_length() {
        let mut image = Bitmap::new(10, 4).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.line(9, 3, 0, 0);

        let points = painted(&image);
        assert_eq!(points.len(), 10);
        assert!(points.contains(&(0, 0)));
        assert!(points.contains(&(9, 3)));
    }

    #[test]
    fn line_clips_silently() {
        let mut image = Bitmap::new(4, 4).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.line(-10, 1, 20, 1);
        draw.line(-10, -10, -5, -20);

        assert_eq!(painted(&image), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn thick_pen_stamps_square() {
        let mut image = Bitmap::new(5, 5).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.pen_width(3);
        draw.plot_pen_pixel(2, 2);

        assert_eq!(painted(&image).len(), 9);
        assert_eq!(image.get_pixel(1, 1), Some(RED));
        assert_eq!(image.get_pixel(3, 3), Some(RED));
        assert_eq!(image.get_pixel(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn thick_line_is_wider() {
        let mut image = Bitmap::new(10, 10).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.pen_width(2);
        draw.horizontal_line_segment(2, 7, 5);

        // 2x2 brush: columns 2..=8, rows 5..=6
        assert_eq!(painted(&image).len(), 14);
        assert_eq!(image.get_pixel(8, 6), Some(RED));
    }

    #[test]
    fn circle_is_symmetric() {
        let mut image = Bitmap::new(21, 21).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.circle(10, 10, 7);

        for (x, y) in [(17, 10), (3, 10), (10, 17), (10, 3)] {
            assert_eq!(image.get_pixel(x, y), Some(RED));
        }
        assert_eq!(image.get_pixel(10, 10), Some(Rgb::BLACK));

        let mut mirrored = image.clone();
        mirrored.horizontal_flip();
        assert_eq!(mirrored, image);
        mirrored.vertical_flip();
        assert_eq!(mirrored, image);
    }

    #[test]
    fn zero_radius_circle_is_a_point() {
        let mut image = Bitmap::new(3, 3).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.circle(1, 1, 0);
        draw.circle(1, 1, -3);

        assert_eq!(painted(&image), vec![(1, 1)]);
    }

    #[test]
    fn ellipse_extremes() {
        let mut image = Bitmap::new(31, 21).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.ellipse(15, 10, 12, 6);

        for (x, y) in [(27, 10), (3, 10), (15, 16), (15, 4)] {
            assert_eq!(image.get_pixel(x, y), Some(RED), "({x}, {y})");
        }
        assert_eq!(image.get_pixel(15, 10), Some(Rgb::BLACK));

        let mut mirrored = image.clone();
        mirrored.horizontal_flip();
        assert_eq!(mirrored, image);
        mirrored.vertical_flip();
        assert_eq!(mirrored, image);
    }

    #[test]
    fn degenerate_ellipses_are_lines() {
        let mut image = Bitmap::new(9, 9).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.ellipse(4, 4, 3, 0);
        assert_eq!(painted(&image).len(), 7);

        let mut image = Bitmap::new(9, 9).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.ellipse(4, 4, 0, 3);
        assert_eq!(painted(&image), vec![(4, 1), (4, 2), (4, 3), (4, 4), (4, 5), (4, 6), (4, 7)]);
    }

    #[test]
    fn huge_shapes_do_not_overflow() {
        let mut image = Bitmap::new(16, 16).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);

        // Whole image inside the outline
        draw.circle(5, 5, i32::MAX);
        draw.ellipse(8, 8, i32::MAX, i32::MAX);
        // Entirely off the image
        draw.circle(i32::MIN, i32::MIN, 1000);
        draw.ellipse(i32::MAX, 8, 1000, i32::MAX);
        draw.line(i32::MIN, i32::MIN, i32::MAX, i32::MIN);
        assert!(painted(&image).is_empty());

        // Only the crossing of a huge flat ellipse is drawn
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.ellipse(8, 8, i32::MAX, 3);
        for x in 0..16 {
            assert_eq!(image.get_pixel(x, 5), Some(RED));
            assert_eq!(image.get_pixel(x, 11), Some(RED));
        }

        // Arc of a circle centered far to the left
        let mut image = Bitmap::new(16, 16).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.pen_width(3);
        draw.circle(-1_000_000, 8, 1_000_005);
        assert_eq!(image.get_pixel(5, 8), Some(RED));
        assert_eq!(image.get_pixel(12, 8), Some(Rgb::BLACK));

        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.horizontal_line_segment(i32::MIN, i32::MAX, 0);
        draw.fill_rectangle(i32::MIN, 15, i32::MAX, i32::MAX);
        assert_eq!(image.get_pixel(15, 0), Some(RED));
        assert_eq!(image.get_pixel(0, 15), Some(RED));
    }

    #[test]
    fn rectangle_outline_and_fill() {
        let mut image = Bitmap::new(6, 6).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.rectangle(1, 1, 4, 3);

        assert_eq!(painted(&image).len(), 10);
        assert_eq!(image.get_pixel(2, 2), Some(Rgb::BLACK));

        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.fill_rectangle(4, 3, 1, 1);
        assert_eq!(painted(&image).len(), 12);
        assert_eq!(image.get_pixel(2, 2), Some(RED));
    }

    #[test]
    fn triangle_corners() {
        let mut image = Bitmap::new(8, 8).unwrap();
        let mut draw = Drawer::new(&mut image);
        draw.pen_color(RED);
        draw.triangle(0, 0, 7, 0, 0, 7);

        for (x, y) in [(0, 0), (7, 0), (0, 7), (3, 4)] {
            assert_eq!(image.get_pixel(x, y), Some(RED), "({x}, {y})");
        }
        assert_eq!(image.get_pixel(5, 5), Some(Rgb::BLACK));
    }
}
