use crate::config::CompressorConfig;

/*
Dynamics Compressor
===================

Sits between the master bus and the output and keeps stacked kicks, bass
and effects from clipping.

Gain computer (static curve, soft knee of width W centred on threshold T):

    over = level_db - T

    2·over < -W        →  0 dB                          (below knee)
    2·|over| <= W      →  (1/R - 1) · (over + W/2)² / 2W  (inside knee)
    2·over > W         →  (1/R - 1) · over               (above knee)

The result is a gain reduction in dB (<= 0). It is smoothed with one-pole
attack/release coefficients before being applied:

    coeff = e^(-1 / (time · sample_rate))

Attack when reduction is increasing, release when it is relaxing.
*/

#[derive(Debug, Clone)]
pub struct Compressor {
    threshold_db: f32,
    knee_db: f32,
    ratio: f32,
    attack: f32,
    release: f32,
    attack_coeff: f32,
    release_coeff: f32,
    /// Smoothed gain reduction in dB (<= 0)
    reduction_db: f32,
}

#[inline]
fn to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.max(1e-6).log10()
}

#[inline]
fn from_db(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

fn smoothing_coeff(time: f32, sample_rate: f32) -> f32 {
    if time <= 0.0 {
        0.0
    } else {
        (-1.0 / (time * sample_rate)).exp()
    }
}

impl Compressor {
    pub fn new(config: &CompressorConfig, sample_rate: f32) -> Self {
        Self {
            threshold_db: config.threshold_db,
            knee_db: config.knee_db.max(0.0),
            ratio: config.ratio.max(1.0),
            attack: config.attack,
            release: config.release,
            attack_coeff: smoothing_coeff(config.attack, sample_rate),
            release_coeff: smoothing_coeff(config.release, sample_rate),
            reduction_db: 0.0,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.attack_coeff = smoothing_coeff(self.attack, sample_rate);
        self.release_coeff = smoothing_coeff(self.release, sample_rate);
    }

    /// Static gain reduction (dB) for an input level (dB).
    pub fn static_reduction(&self, level_db: f32) -> f32 {
        let over = level_db - self.threshold_db;
        let slope = 1.0 / self.ratio - 1.0;

        if 2.0 * over < -self.knee_db {
            0.0
        } else if self.knee_db > 0.0 && 2.0 * over.abs() <= self.knee_db {
            let x = over + self.knee_db / 2.0;
            slope * x * x / (2.0 * self.knee_db)
        } else {
            slope * over
        }
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let target = self.static_reduction(to_db(sample.abs()));
        let coeff = if target < self.reduction_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.reduction_db = coeff * self.reduction_db + (1.0 - coeff) * target;
        sample * from_db(self.reduction_db)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    /// Current gain reduction in dB (<= 0).
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    pub fn reset(&mut self) {
        self.reduction_db = 0.0;
    }
}
