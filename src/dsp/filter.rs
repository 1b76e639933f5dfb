use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | passes       | rejects      | used by                        |
| --------- | ------------ | ------------ | ------------------------------ |
| low-pass  | below cutoff | above cutoff | pad sweep, bass grit, boot     |
| high-pass | above cutoff | below cutoff | hats                           |

Topology-preserving-transform state-variable filter. Cutoff is passed per
sample because every filter in the soundtrack is swept by an envelope.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}

struct FilterOutputs {
    lowpass: f32,
    highpass: f32,
}

/// Default Q, matching the browser biquad the sounds were voiced on
pub const DEFAULT_Q: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            q: DEFAULT_Q,
            filter_type,
        }
    }

    pub fn lowpass() -> Self {
        Self::new(FilterType::LowPass)
    }

    pub fn highpass() -> Self {
        Self::new(FilterType::HighPass)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q.max(0.05);
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    #[inline]
    fn compute_g(cutoff_hz: f32, sample_rate: f32) -> f32 {
        let nyquist_guard = sample_rate * 0.49;
        let cutoff = cutoff_hz.clamp(10.0, nyquist_guard);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    fn tick(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter one sample with the cutoff in effect at that sample.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, cutoff_hz: f32, sample_rate: f32) -> f32 {
        let g = Self::compute_g(cutoff_hz, sample_rate);
        let k = 1.0 / self.q;
        let outputs = self.tick(sample, k, g);

        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
        }
    }

    /// Filter a block at a fixed cutoff.
    pub fn render(&mut self, buffer: &mut [f32], cutoff_hz: f32, sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, cutoff_hz, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
