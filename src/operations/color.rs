//! Per-pixel color operations.

use tracing::debug;

use crate::{
    picture::{Bitmap, ColorPlane, Error},
    util::clamp_channel,
};

/// Rec. 601 luma weights.
const LUMA_RED: f64 = 0.299;
const LUMA_GREEN: f64 = 0.587;
const LUMA_BLUE: f64 = 0.114;

impl Bitmap {
    /// Make a grey image showing a single channel of this one.
    pub fn export_color_plane(&self, plane: ColorPlane) -> Bitmap {
        let offset = plane.offset();
        let mut out = self.clone();

        for pixel in out.data.chunks_exact_mut(3) {
            let value = pixel[offset];
            pixel.fill(value);
        }

        out
    }

    /// Add `delta` to one channel of every pixel, saturating at 0 and 255.
    pub fn add_to_color_plane(&mut self, plane: ColorPlane, delta: i32) {
        let offset = plane.offset();

        for pixel in self.data.chunks_exact_mut(3) {
            pixel[offset] = (pixel[offset] as i32).saturating_add(delta).clamp(0, 255) as u8;
        }
    }

    /// Clear bits `0..=bit` of every channel.
    pub fn set_all_ith_bits_low(&mut self, bit: u32) -> Result<(), Error> {
        if bit > 7 {
            return Err(Error::OutOfRange(format!("bit index {bit} is not in 0..=7")));
        }

        let mask = !((1u16 << (bit + 1)) - 1) as u8;
        for value in &mut self.data {
            *value &= mask;
        }

        Ok(())
    }

    pub fn convert_to_grayscale(&mut self) {
        debug!(width = self.width, height = self.height, "converting to grayscale");

        for pixel in self.data.chunks_exact_mut(3) {
            let luma = LUMA_RED * pixel[0] as f64
                + LUMA_GREEN * pixel[1] as f64
                + LUMA_BLUE * pixel[2] as f64;
            pixel.fill(clamp_channel(luma));
        }
    }

    pub fn invert_color_planes(&mut self) {
        for value in &mut self.data {
            *value = 255 - *value;
        }
    }

    /// Convert every pixel to full-range YCbCr, writing the planes into the
    /// given slices. Each slice must hold exactly [`Bitmap::pixel_count`]
    /// values.
    pub fn export_ycbcr(&self, y: &mut [f64], cb: &mut [f64], cr: &mut [f64]) -> Result<(), Error> {
        self.check_plane_lengths(y.len(), cb.len(), cr.len())?;

        for (i, pixel) in self.data.chunks_exact(3).enumerate() {
            let (r, g, b) = (pixel[0] as f64, pixel[1] as f64, pixel[2] as f64);

            y[i] = LUMA_RED * r + LUMA_GREEN * g + LUMA_BLUE * b;
            cb[i] = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
            cr[i] = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
        }

        Ok(())
    }

    /// Replace every pixel with the RGB value of the given YCbCr planes,
    /// rounding and clamping each channel.
    pub fn import_ycbcr(&mut self, y: &[f64], cb: &[f64], cr: &[f64]) -> Result<(), Error> {
        self.check_plane_lengths(y.len(), cb.len(), cr.len())?;

        for (i, pixel) in self.data.chunks_exact_mut(3).enumerate() {
            let (luma, blue_diff, red_diff) = (y[i], cb[i] - 128.0, cr[i] - 128.0);

            pixel[0] = clamp_channel(luma + 1.402 * red_diff);
            pixel[1] = clamp_channel(luma - 0.344136 * blue_diff - 0.714136 * red_diff);
            pixel[2] = clamp_channel(luma + 1.772 * blue_diff);
        }

        Ok(())
    }

    fn check_plane_lengths(&self, y: usize, cb: usize, cr: usize) -> Result<(), Error> {
        let expected = self.pixel_count();
        for got in [y, cb, cr] {
            if got != expected {
                return Err(Error::BufferLength { expected, got });
            }
        }

        Ok(())
    }

    /// Mix `other` into this image. An `alpha` of 0 keeps this image, 1
    /// replaces it with `other`.
    pub fn alpha_blend(&mut self, alpha: f64, other: &Bitmap) -> Result<(), Error> {
        if (self.width, self.height) != (other.width, other.height) {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                got: (other.width, other.height),
            });
        }
        if !(0.0..=1.0).contains(&alpha) {
            return Err(Error::OutOfRange(format!("alpha {alpha} is not in [0, 1]")));
        }

        let keep = 1.0 - alpha;
        for (dst, src) in self.data.iter_mut().zip(&other.data) {
            *dst = clamp_channel(keep * *dst as f64 + alpha * *src as f64);
        }

        Ok(())
    }
}
