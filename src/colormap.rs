use std::ops::Index;

use crate::picture::{Error, Rgb};

/// Number of entries in a [`Colormap`].
pub const COLORMAP_LEN: usize = 256;

/// A read-only table of 256 colors, indexed by a byte intensity.
///
/// The table contents come from the caller; this type only guarantees the
/// length and never changes the entries after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormap {
    entries: [Rgb; COLORMAP_LEN],
}

impl Colormap {
    pub const fn new(entries: [Rgb; COLORMAP_LEN]) -> Self {
        Self { entries }
    }

    /// Build a colormap from 768 packed R,G,B bytes.
    pub fn from_rgb_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != COLORMAP_LEN * 3 {
            return Err(Error::BufferLength {
                expected: COLORMAP_LEN * 3,
                got: bytes.len(),
            });
        }

        let mut entries = [Rgb::BLACK; COLORMAP_LEN];
        for (entry, rgb) in entries.iter_mut().zip(bytes.chunks_exact(3)) {
            *entry = Rgb::new(rgb[0], rgb[1], rgb[2]);
        }

        Ok(Self { entries })
    }

    /// Linear ramp from black to white.
    pub fn grayscale() -> Self {
        let mut entries = [Rgb::BLACK; COLORMAP_LEN];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = Rgb::new(i as u8, i as u8, i as u8);
        }

        Self { entries }
    }

    pub fn get(&self, index: u8) -> Rgb {
        self.entries[index as usize]
    }

    /// Look up a scalar intensity in `[0, 1]`. Values outside the range are
    /// clamped to the first or last entry.
    pub fn lookup(&self, intensity: f64) -> Rgb {
        let index = if intensity.is_nan() {
            0
        } else {
            (intensity * 255.0).round().clamp(0.0, 255.0) as u8
        };

        self.get(index)
    }

    pub fn entries(&self) -> &[Rgb; COLORMAP_LEN] {
        &self.entries
    }
}

impl Index<u8> for Colormap {
    type Output = Rgb;

    fn index(&self, index: u8) -> &Self::Output {
        &self.entries[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes() {
        let bytes: Vec<u8> = (0..768).map(|i| (i % 251) as u8).collect();
        let map = Colormap::from_rgb_bytes(&bytes).unwrap();

        assert_eq!(map[0], Rgb::new(0, 1, 2));
        assert_eq!(map.get(255), Rgb::new(bytes[765], bytes[766], bytes[767]));
    }

    #[test]
    fn from_bytes_wrong_length() {
        assert!(matches!(
            Colormap::from_rgb_bytes(&[0; 767]),
            Err(Error::BufferLength { expected: 768, got: 767 })
        ));
    }

    #[test]
    fn lookup_scales_and_clamps() {
        let map = Colormap::grayscale();

        assert_eq!(map.lookup(0.0), Rgb::BLACK);
        assert_eq!(map.lookup(1.0), Rgb::WHITE);
        assert_eq!(map.lookup(0.5), Rgb::new(128, 128, 128));
        assert_eq!(map.lookup(-4.0), Rgb::BLACK);
        assert_eq!(map.lookup(7.0), Rgb::WHITE);
    }
}
