use std::time::{Duration, Instant};

use crate::config::VadConfig;
use crate::types::{VadEvent, VadMetrics, VadState};

/// Hysteresis state machine deciding, tick by tick, when an utterance
/// begins and ends.
///
/// `evaluate` must be called with strictly increasing `now` values; the
/// machine itself never fails. At most one of the two pending timestamps
/// is set at any time, and whichever is set is cleared the moment the
/// opposite condition is observed.
pub struct VadStateMachine {
    config: VadConfig,
    state: VadState,
    speech_started: Option<Instant>,
    silence_started: Option<Instant>,
    last_tick: Option<Instant>,
    metrics: VadMetrics,
}

impl VadStateMachine {
    pub fn new(config: VadConfig) -> Self {
        Self {
            config,
            state: VadState::Idle,
            speech_started: None,
            silence_started: None,
            last_tick: None,
            metrics: VadMetrics::default(),
        }
    }

    pub fn current_state(&self) -> VadState {
        self.state
    }

    pub fn metrics(&self) -> &VadMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &VadConfig {
        &self.config
    }

    /// One tick of the detector. Returns at most one event.
    pub fn evaluate(&mut self, level: f32, now: Instant) -> Option<VadEvent> {
        // Non-finite input reads as silence.
        let level = if level.is_finite() { level } else { 0.0 };

        self.metrics.ticks_processed += 1;
        self.metrics.last_level = level;

        if let Some(prev) = self.last_tick {
            let elapsed_ms = now.duration_since(prev).as_millis() as u64;
            if self.state.is_recording() {
                self.metrics.total_speech_ms += elapsed_ms;
            } else {
                self.metrics.total_idle_ms += elapsed_ms;
            }
        }
        self.last_tick = Some(now);

        match self.state {
            VadState::Idle => {
                if level > self.config.start_threshold {
                    self.speech_started = Some(now);
                    self.state = VadState::PendingSpeech;
                }
                None
            }

            VadState::PendingSpeech => {
                if level > self.config.start_threshold {
                    let started = self
                        .speech_started
                        .unwrap_or(now);
                    if now.duration_since(started) > self.min_speech() {
                        self.speech_started = None;
                        self.silence_started = None;
                        self.state = VadState::Recording;
                        self.metrics.utterances_started += 1;
                        return Some(VadEvent::StartUtterance { at: now });
                    }
                    None
                } else {
                    // Noise blip, debounce failed.
                    self.speech_started = None;
                    self.state = VadState::Idle;
                    None
                }
            }

            VadState::Recording => {
                if level < self.config.stop_threshold {
                    self.silence_started = Some(now);
                    self.state = VadState::PendingSilence;
                }
                None
            }

            VadState::PendingSilence => {
                if level < self.config.stop_threshold {
                    let started = self
                        .silence_started
                        .unwrap_or(now);
                    if now.duration_since(started) > self.min_silence() {
                        self.silence_started = None;
                        self.state = VadState::Idle;
                        self.metrics.utterances_completed += 1;
                        return Some(VadEvent::StopUtterance { at: now });
                    }
                    None
                } else {
                    self.silence_started = None;
                    self.state = VadState::Recording;
                    None
                }
            }
        }
    }

    /// Close out an in-flight utterance, used at session teardown.
    pub fn force_end(&mut self, now: Instant) -> Option<VadEvent> {
        if self.state.is_recording() {
            self.state = VadState::Idle;
            self.speech_started = None;
            self.silence_started = None;
            self.metrics.utterances_completed += 1;
            return Some(VadEvent::StopUtterance { at: now });
        }
        None
    }

    pub fn reset(&mut self) {
        self.state = VadState::Idle;
        self.speech_started = None;
        self.silence_started = None;
        self.last_tick = None;
        self.metrics = VadMetrics::default();
    }

    fn min_speech(&self) -> Duration {
        Duration::from_millis(self.config.min_speech_duration_ms)
    }

    fn min_silence(&self) -> Duration {
        Duration::from_millis(self.config.min_silence_duration_ms)
    }
}
