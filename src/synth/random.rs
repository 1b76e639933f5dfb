//! Injectable randomness for probabilistic hits and pad detune.

/// Source of random decisions for the sequencer and voice recipes.
///
/// Implemented for `fastrand::Rng` (seed it for reproducible runs). Tests
/// use fixed sources to pin probabilistic hits on or off.
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`
    fn unit(&mut self) -> f32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform value in `[-amount, amount)`
    fn spread(&mut self, amount: f32) -> f32 {
        (self.unit() * 2.0 - 1.0) * amount
    }
}

impl RandomSource for fastrand::Rng {
    fn unit(&mut self) -> f32 {
        self.f32()
    }
}

/// Always returns the same value. `Fixed(0.0)` fires every chance,
/// `Fixed(0.999)` fires none.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub f32);

impl RandomSource for Fixed {
    fn unit(&mut self) -> f32 {
        self.0
    }
}
