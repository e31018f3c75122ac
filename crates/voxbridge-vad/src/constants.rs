//! Analysis constants shared across the pipeline.

/// FFT transform size used by the spectrum analyzer.
pub const FFT_SIZE: usize = 512;

/// Number of frequency-bin magnitudes per analysis frame.
pub const FREQUENCY_BINS: usize = FFT_SIZE / 2;

/// Target interval between VAD ticks (best effort, ~60 Hz).
pub const TICK_INTERVAL_MS: u64 = 16;
