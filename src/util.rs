//! Shared helpers used by the pixel operations.

/// Deterministic xorshift64 generator.
///
/// Every fractal fill takes one of these by `&mut`, so two runs seeded with the
/// same value produce the same image.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new generator from a seed. A zero seed is replaced by 1, as
    /// xorshift never leaves the all-zero state.
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random f64 in [0, 1)
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // 53 significant bits
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Round a floating point channel value and clamp it into `0..=255`.
#[inline]
pub(crate) fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Rounded mean of two channel values.
#[inline]
pub(crate) fn mean2(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16 + 1) / 2) as u8
}

/// Rounded mean of four channel values.
#[inline]
pub(crate) fn mean4(a: u8, b: u8, c: u8, d: u8) -> u8 {
    ((a as u16 + b as u16 + c as u16 + d as u16 + 2) / 4) as u8
}
