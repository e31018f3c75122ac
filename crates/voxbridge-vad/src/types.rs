use std::time::Instant;

/// Detector state, made explicit rather than inferred from a recording
/// flag plus nullable timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadState {
    /// Not recording, no pending speech timer.
    Idle,
    /// Above-threshold run in progress, start not yet confirmed.
    PendingSpeech,
    /// Utterance in progress.
    Recording,
    /// Below-threshold run in progress, stop not yet confirmed.
    PendingSilence,
}

impl VadState {
    pub fn is_recording(&self) -> bool {
        matches!(self, VadState::Recording | VadState::PendingSilence)
    }
}

/// Events emitted by the state machine, at most one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadEvent {
    StartUtterance { at: Instant },
    StopUtterance { at: Instant },
}

/// Running counters, updated on every tick. Time between consecutive
/// ticks is attributed to the state the machine was in when the
/// interval elapsed.
#[derive(Debug, Clone, Copy, Default)]
pub struct VadMetrics {
    pub ticks_processed: u64,
    pub utterances_started: u64,
    pub utterances_completed: u64,
    pub last_level: f32,
    pub total_speech_ms: u64,
    pub total_idle_ms: u64,
}
