//! Spectrum analyzer widget
//!
//! FFT-based frequency spectrum of the master output with log-spaced bins.
//! The soundtrack lives mostly below 1 kHz, so the display starts at 20 Hz
//! and gives the low end most of the width.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 48;
const MIN_FREQ: f64 = 20.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin index for each displayed bin
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB) per displayed bin
    spectrum: Vec<(f64, f64)>,
    sample_rate: f32,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the visualisation window.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();

        let max_freq = (sample_rate as f64 / 2.0).clamp(MIN_FREQ * 2.0, 20_000.0);
        let ratio = max_freq / MIN_FREQ;
        let half = buffer_len / 2;

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = MIN_FREQ * ratio.powf(t);
            let index = (freq * buffer_len as f64 / sample_rate.max(1.0) as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Recompute from `buffer`; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for ((_, magnitude_db), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let bin = self.scratch[index];
            let power = (bin.re * bin.re + bin.im * bin.im).max(1e-12);
            *magnitude_db = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (min_x, max_x) = spectrum
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    let max_db = spectrum.iter().map(|(_, db)| *db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x.min(max_x), max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
