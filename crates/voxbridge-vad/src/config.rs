use serde::{Deserialize, Serialize};

use super::constants::FREQUENCY_BINS;

/// Tunables for the hysteresis detector.
///
/// Levels are mean frequency-bin magnitudes in the 0-255 byte range, so
/// the thresholds live on that scale rather than in dBFS. Start and stop
/// thresholds differ on purpose: a level between the two keeps an active
/// utterance alive without being loud enough to begin a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    /// Loudness above which a frame counts as speech-like.
    pub start_threshold: f32,
    /// Loudness below which a frame counts as silence-like while recording.
    pub stop_threshold: f32,
    /// Continuous speech required before an utterance starts (ms).
    pub min_speech_duration_ms: u64,
    /// Continuous silence required before an utterance ends (ms).
    pub min_silence_duration_ms: u64,
    /// Frequency bins per analysis frame.
    pub frequency_bins: usize,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            start_threshold: 30.0,
            stop_threshold: 25.0,
            min_speech_duration_ms: 500,
            min_silence_duration_ms: 2000,
            frequency_bins: FREQUENCY_BINS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_tunables() {
        let cfg = VadConfig::default();
        assert_eq!(cfg.start_threshold, 30.0);
        assert_eq!(cfg.stop_threshold, 25.0);
        assert_eq!(cfg.min_speech_duration_ms, 500);
        assert_eq!(cfg.min_silence_duration_ms, 2000);
        assert_eq!(cfg.frequency_bins, 256);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let cfg = VadConfig {
            start_threshold: 42.0,
            ..Default::default()
        };
        let text = serde_json::to_string(&cfg).unwrap();
        let back: VadConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.start_threshold, 42.0);
        assert_eq!(back.stop_threshold, cfg.stop_threshold);
    }
}
