//! Randomness source for phrase selection and pacing.
//!
//! Everything random in a campaign goes through [`Randomness`], so tests can
//! pin both the chosen phrases and the pause lengths.

/// A source of uniform random draws.
pub trait Randomness: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Returns a value drawn uniformly from `min..=max`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

/// Unseeded randomness backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandomness;

impl Randomness for ThreadRandomness {
    fn pick(&mut self, len: usize) -> usize {
        use rand::Rng;
        rand::rng().random_range(0..len)
    }

    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        use rand::Rng;
        if min >= max {
            return min;
        }
        rand::rng().random_range(min..=max)
    }
}

/// Deterministic randomness: always the same index and the same value.
///
/// The index is clamped to the pool size and the value to the requested
/// range, so one instance works for every pool and every delay window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRandomness {
    index: usize,
    value: Option<f64>,
}

impl FixedRandomness {
    /// Always picks `index`; `uniform` returns the lower bound.
    pub fn new(index: usize) -> Self {
        Self { index, value: None }
    }

    /// Makes `uniform` return `value`, clamped to the requested range.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

impl Randomness for FixedRandomness {
    fn pick(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        match self.value {
            Some(value) => value.clamp(min, max.max(min)),
            None => min,
        }
    }
}
