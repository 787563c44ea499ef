/// Source of the randomness used by fault injection and synthetic errors.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl RandomSource for fastrand::Rng {
    fn next_f64(&mut self) -> f64 {
        self.f64()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.usize(..len)
    }
}

/// Deterministic source: a constant sample and indices that walk `0, 1, 2, …`.
#[derive(Debug, Clone)]
pub struct FixedSource {
    sample: f64,
    counter: usize,
}

impl FixedSource {
    pub fn new(sample: f64) -> Self {
        Self { sample, counter: 0 }
    }
}

impl RandomSource for FixedSource {
    fn next_f64(&mut self) -> f64 {
        self.sample
    }

    fn next_index(&mut self, len: usize) -> usize {
        let idx = self.counter % len.max(1);
        self.counter = self.counter.wrapping_add(1);
        idx
    }
}
