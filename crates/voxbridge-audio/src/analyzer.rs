//! FFT spectrum analyzer feeding the level meter.
//!
//! Keeps a rolling window of the most recent samples and, once per tick,
//! produces a frame of byte-scaled frequency-bin magnitudes: Hann window,
//! forward FFT, magnitude smoothing, then a dB mapping of [-100, -30]
//! onto 0..=255.

use std::collections::VecDeque;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use voxbridge_vad::constants::FFT_SIZE;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT transform size; the output frame has `fft_size / 2` bins.
    pub fft_size: usize,
    /// Exponential smoothing applied to bin magnitudes between ticks.
    pub smoothing: f32,
    /// dB value mapped to byte 0.
    pub min_db: f32,
    /// dB value mapped to byte 255.
    pub max_db: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: FFT_SIZE,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    ring: VecDeque<f32>,
    smoothed: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(config.fft_size);
        let window: Vec<f32> = (0..config.fft_size)
            .map(|i| {
                let phase =
                    2.0 * std::f32::consts::PI * i as f32 / (config.fft_size - 1) as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();
        let bins = config.fft_size / 2;

        Self {
            fft,
            window,
            ring: VecDeque::with_capacity(config.fft_size),
            smoothed: vec![0.0; bins],
            scratch: vec![Complex::new(0.0, 0.0); config.fft_size],
            config,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.config.fft_size / 2
    }

    /// Feed freshly captured mono samples into the rolling window.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            if self.ring.len() == self.config.fft_size {
                self.ring.pop_front();
            }
            self.ring.push_back(sample);
        }
    }

    /// Produce one analysis frame from the current window. The window is
    /// zero-padded at the front until enough samples have arrived, so
    /// this is always defined.
    pub fn frame(&mut self) -> Vec<u8> {
        let size = self.config.fft_size;
        let pad = size - self.ring.len();

        for slot in self.scratch.iter_mut().take(pad) {
            *slot = Complex::new(0.0, 0.0);
        }
        for (i, &sample) in self.ring.iter().enumerate() {
            let idx = pad + i;
            self.scratch[idx] = Complex::new(sample * self.window[idx], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let tau = self.config.smoothing;
        let range = self.config.max_db - self.config.min_db;
        let mut frame = Vec::with_capacity(self.bin_count());

        for (i, slot) in self.scratch.iter().take(self.bin_count()).enumerate() {
            let magnitude = slot.norm() / size as f32;
            self.smoothed[i] = tau * self.smoothed[i] + (1.0 - tau) * magnitude;

            let db = if self.smoothed[i] > 0.0 {
                20.0 * self.smoothed[i].log10()
            } else {
                self.config.min_db
            };
            let scaled = 255.0 * (db - self.config.min_db) / range;
            frame.push(scaled.clamp(0.0, 255.0) as u8);
        }

        frame
    }

    pub fn reset(&mut self) {
        self.ring.clear();
        self.smoothed.fill(0.0);
    }
}
