//! Diamond-square plasma fractal.

use tracing::debug;

use crate::{
    colormap::Colormap,
    picture::{Bitmap, Error},
    util::Rng,
};

/// Parameters to pass to the [`plasma`] function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlasmaParameters {
    /// Intensities at the top-left, top-right, bottom-right and bottom-left
    /// corners, each in `[0, 1]`.
    pub corners: [f64; 4],

    /// Scale of the random displacement. 0 gives a smooth gradient between
    /// the corners. Default value is 3.0.
    pub roughness: f64,
}

impl Default for PlasmaParameters {
    fn default() -> Self {
        Self {
            corners: [0.9, 0.5, 0.3, 0.7],
            roughness: 3.0,
        }
    }
}

impl PlasmaParameters {
    fn validate(&self) -> Result<(), Error> {
        for (i, corner) in self.corners.iter().enumerate() {
            if !(0.0..=1.0).contains(corner) {
                return Err(Error::OutOfRange(format!(
                    "corner {} intensity {corner} is not in [0, 1]",
                    i + 1
                )));
            }
        }

        if !self.roughness.is_finite() || self.roughness < 0.0 {
            return Err(Error::OutOfRange(format!(
                "roughness {} must be finite and non-negative",
                self.roughness
            )));
        }

        Ok(())
    }
}

/// Square grid of intensities refined by diamond-square subdivision.
struct Heightmap {
    size: usize,
    values: Vec<f64>,
}

impl Heightmap {
    /// Allocate a `(size + 1)` × `(size + 1)` grid with the corners set.
    /// Returns [`None`] if the grid does not fit in memory.
    fn new(size: usize, corners: [f64; 4]) -> Option<Self> {
        let len = (size + 1).checked_mul(size + 1)?;
        let mut values = Vec::new();
        values.try_reserve_exact(len).ok()?;
        values.resize(len, 0.0);

        let mut map = Self { size, values };
        map.set(0, 0, corners[0]);
        map.set(size, 0, corners[1]);
        map.set(size, size, corners[2]);
        map.set(0, size, corners[3]);

        Some(map)
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * (self.size + 1) + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, value: f64) {
        self.values[y * (self.size + 1) + x] = value;
    }

    /// Refine the grid until every cell is 1×1. Displacement shrinks with the
    /// cell size, so it halves at every level.
    fn subdivide(&mut self, roughness: f64, rng: &mut Rng) {
        let size = self.size;
        let mut step = size;

        while step > 1 {
            let half = step / 2;
            let scale = roughness * step as f64 / (2 * size) as f64;
            let mut displace = |average: f64| {
                (average + (rng.next_f64() - 0.5) * scale).clamp(0.0, 1.0)
            };

            // Diamond step: the center of each square
            for y in (half..size).step_by(step) {
                for x in (half..size).step_by(step) {
                    let average = (self.get(x - half, y - half)
                        + self.get(x + half, y - half)
                        + self.get(x + half, y + half)
                        + self.get(x - half, y + half))
                        / 4.0;
                    self.set(x, y, displace(average));
                }
            }

            // Square step: the midpoint of each edge
            for y in (0..=size).step_by(half) {
                let offset = if (y / half) % 2 == 0 { half } else { 0 };
                for x in (offset..=size).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0.0;

                    if x >= half {
                        sum += self.get(x - half, y);
                        count += 1.0;
                    }
                    if x + half <= size {
                        sum += self.get(x + half, y);
                        count += 1.0;
                    }
                    if y >= half {
                        sum += self.get(x, y - half);
                        count += 1.0;
                    }
                    if y + half <= size {
                        sum += self.get(x, y + half);
                        count += 1.0;
                    }

                    self.set(x, y, displace(sum / count));
                }
            }

            step = half;
        }
    }
}

/// Fill the `width` × `height` rectangle at `(x, y)` with a plasma cloud,
/// coloring each pixel through `colormap`.
///
/// The rectangle is clipped to the image first and the cloud spans what is
/// left, with the four corner intensities landing on its corner pixels.
/// Output depends only on the parameters and the state of `rng`, so seeding
/// it identically reproduces the image exactly.
pub fn plasma(
    image: &mut Bitmap,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    parameters: &PlasmaParameters,
    colormap: &Colormap,
    rng: &mut Rng,
) -> Result<(), Error> {
    parameters.validate()?;
    if width == 0 || height == 0 {
        return Err(Error::EmptyRegion);
    }

    let x_end = x.saturating_add(width).min(image.width());
    let y_end = y.saturating_add(height).min(image.height());
    if x >= x_end || y >= y_end {
        return Ok(());
    }
    let (width, height) = (x_end - x, y_end - y);

    let size = (width.max(height) as usize).next_power_of_two();
    debug!(width, height, grid = size, roughness = parameters.roughness, "generating plasma");

    let mut map = Heightmap::new(size, parameters.corners)
        .ok_or(Error::InvalidDimensions(width, height))?;
    map.subdivide(parameters.roughness, rng);

    // Stretch the square grid over the rectangle, first and last pixels on
    // the grid edges
    let scale = |offset: u32, extent: u32| match extent {
        1 => 0,
        _ => (offset as u64 * size as u64 / (extent - 1) as u64) as usize,
    };
    for py in y..y_end {
        let gy = scale(py - y, height);
        for px in x..x_end {
            let gx = scale(px - x, width);
            image.put_pixel(px, py, colormap.lookup(map.get(gx, gy)));
        }
    }

    Ok(())
}
