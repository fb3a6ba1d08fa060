//! Geometric transforms: flips, cropping and resampling.

use tracing::debug;

use crate::{
    picture::{Bitmap, Error, Rgb},
    util::{mean2, mean4},
};

impl Bitmap {
    /// Reverse the order of the rows.
    pub fn vertical_flip(&mut self) {
        let row_len = self.row_len();
        let height = self.height as usize;

        for y in 0..height / 2 {
            let (top, bottom) = self.data.split_at_mut((height - 1 - y) * row_len);
            top[y * row_len..(y + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
        }
    }

    /// Reverse the order of the pixels within every row.
    pub fn horizontal_flip(&mut self) {
        let width = self.width as usize;
        let row_len = self.row_len();

        for row in self.data.chunks_exact_mut(row_len) {
            for x in 0..width / 2 {
                let left = x * 3;
                let right = (width - 1 - x) * 3;
                for c in 0..3 {
                    row.swap(left + c, right + c);
                }
            }
        }
    }

    /// Copy out the `width` × `height` rectangle whose top-left corner is at
    /// `(x, y)`. The rectangle is clamped to the image; if nothing is left the
    /// call fails with [`Error::EmptyRegion`].
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Bitmap, Error> {
        if x >= self.width || y >= self.height {
            return Err(Error::EmptyRegion);
        }

        let width = width.min(self.width - x);
        let height = height.min(self.height - y);
        if width == 0 || height == 0 {
            return Err(Error::EmptyRegion);
        }

        let mut out = Bitmap::new(width, height)?;
        let out_row_len = out.row_len();
        for (row, dst) in out.data.chunks_exact_mut(out_row_len).enumerate() {
            let start = self.index(x, y + row as u32);
            dst.copy_from_slice(&self.data[start..start + out_row_len]);
        }

        Ok(out)
    }

    /// Set every pixel of a rectangle to `color`. Parts of the rectangle
    /// outside the image are ignored.
    pub fn fill_region(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);

        for py in y..y_end {
            for px in x..x_end {
                self.put_pixel(px, py, color);
            }
        }
    }

    /// Paste `source` with its top-left corner at `(x, y)`, clipping whatever
    /// falls outside this image.
    pub fn copy_from(&mut self, source: &Bitmap, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }

        let copy_width = source.width.min(self.width - x) as usize * 3;
        let rows = source.height.min(self.height - y);

        for row in 0..rows {
            let src = source.index(0, row);
            let dst = self.index(x, y + row);
            self.data[dst..dst + copy_width].copy_from_slice(&source.data[src..src + copy_width]);
        }
    }

    /// Halve both dimensions by averaging each 2×2 block. An odd trailing
    /// row or column is dropped.
    pub fn subsample(&self) -> Result<Bitmap, Error> {
        if self.width < 2 || self.height < 2 {
            return Err(Error::InvalidDimensions(self.width, self.height));
        }

        let mut out = Bitmap::new(self.width / 2, self.height / 2)?;
        debug!(width = out.width, height = out.height, "subsampling");

        for y in 0..out.height {
            for x in 0..out.width {
                let top_left = self.index(2 * x, 2 * y);
                let top_right = top_left + 3;
                let bottom_left = self.index(2 * x, 2 * y + 1);
                let bottom_right = bottom_left + 3;

                let dst = out.index(x, y);
                for c in 0..3 {
                    out.data[dst + c] = mean4(
                        self.data[top_left + c],
                        self.data[top_right + c],
                        self.data[bottom_left + c],
                        self.data[bottom_right + c],
                    );
                }
            }
        }

        Ok(out)
    }

    /// Enlarge to `(2w - 1)` × `(2h - 1)`. Source pixels land on even
    /// coordinates, the pixels between two of them get their mean, and the
    /// pixels between four get the mean of all four.
    pub fn upsample(&self) -> Result<Bitmap, Error> {
        let (Ok(width), Ok(height)) = (
            u32::try_from(2 * self.width as u64 - 1),
            u32::try_from(2 * self.height as u64 - 1),
        ) else {
            return Err(Error::InvalidDimensions(self.width, self.height));
        };

        let mut out = Bitmap::new(width, height)?;
        debug!(width = out.width, height = out.height, "upsampling");

        for y in 0..out.height {
            for x in 0..out.width {
                let (sx, sy) = (x / 2, y / 2);
                let a = self.index(sx, sy);
                let dst = out.index(x, y);

                for c in 0..3 {
                    out.data[dst + c] = match (x % 2, y % 2) {
                        (0, 0) => self.data[a + c],
                        (1, 0) => mean2(self.data[a + c], self.data[a + 3 + c]),
                        (0, 1) => {
                            let below = self.index(sx, sy + 1);
                            mean2(self.data[a + c], self.data[below + c])
                        }
                        _ => {
                            let below = self.index(sx, sy + 1);
                            mean4(
                                self.data[a + c],
                                self.data[a + 3 + c],
                                self.data[below + c],
                                self.data[below + 3 + c],
                            )
                        }
                    };
                }
            }
        }

        Ok(out)
    }
}
