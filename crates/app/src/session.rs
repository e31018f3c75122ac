//! The single owner of all per-session mutable state.
//!
//! One logical thread of control: `tick` runs the level meter and the
//! VAD once per frame, and `drain_events` empties the session queue on
//! the same loop. The only things that happen off this loop are the
//! capture callback (which only feeds the sample ring) and detached
//! upload tasks, whose results come back through the queue.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use voxbridge_audio::{AnalyzerConfig, SpectrumAnalyzer, UtteranceRecorder, WavEncoder};
use voxbridge_translate::{TranslateError, Uploader};
use voxbridge_vad::{LevelMeter, VadConfig, VadEvent, VadState, VadStateMachine};

use crate::status::{cache_busted, PlaybackSink, StatusSink};

/// Messages drained by the control loop, in delivery order.
#[derive(Debug)]
pub enum SessionEvent {
    /// Encoded audio chunk from the capture side.
    Chunk(Vec<u8>),
    /// The capture side has emitted its final chunk for this utterance.
    Finalized,
    /// A detached upload task finished.
    UploadDone(Result<String, TranslateError>),
}

/// Shared handle to the target-language code. The session reads it when
/// a clip is finalized, not when recording starts, so changing it while
/// an utterance is being recorded affects that utterance's upload.
#[derive(Clone)]
pub struct LanguageSelector(Arc<RwLock<String>>);

impl LanguageSelector {
    pub fn new(code: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(code.into())))
    }

    pub fn set(&self, code: impl Into<String>) {
        *self.0.write() = code.into();
    }

    pub fn current(&self) -> String {
        self.0.read().clone()
    }
}

pub struct VadSession {
    vad: VadStateMachine,
    meter: LevelMeter,
    analyzer: SpectrumAnalyzer,
    encoder: WavEncoder,
    recorder: UtteranceRecorder,
    uploader: Arc<dyn Uploader>,
    language: LanguageSelector,
    status: Arc<dyn StatusSink>,
    playback: Arc<dyn PlaybackSink>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl VadSession {
    pub fn new(
        vad_config: VadConfig,
        sample_rate: u32,
        uploader: Arc<dyn Uploader>,
        language: LanguageSelector,
        status: Arc<dyn StatusSink>,
        playback: Arc<dyn PlaybackSink>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let analyzer_config = AnalyzerConfig {
            fft_size: vad_config.frequency_bins * 2,
            ..AnalyzerConfig::default()
        };
        Self {
            vad: VadStateMachine::new(vad_config),
            meter: LevelMeter::new(),
            analyzer: SpectrumAnalyzer::new(analyzer_config),
            encoder: WavEncoder::new(sample_rate),
            recorder: UtteranceRecorder::new(),
            uploader,
            language,
            status,
            playback,
            event_tx,
            event_rx,
        }
    }

    pub fn state(&self) -> VadState {
        self.vad.current_state()
    }

    /// One frame tick: analyze the newest samples, evaluate the VAD, and
    /// start or stop the utterance capture accordingly.
    pub fn tick(&mut self, samples: &[f32], now: Instant) {
        self.analyzer.push_samples(samples);
        self.encoder.append(samples);

        let frame = self.analyzer.frame();
        let level = self.meter.average(&frame);

        match self.vad.evaluate(level, now) {
            Some(VadEvent::StartUtterance { .. }) => {
                tracing::debug!(level, "Utterance started");
                self.encoder.start();
                self.recorder.begin();
                self.status.update("Recording...");
            }
            Some(VadEvent::StopUtterance { .. }) => {
                tracing::debug!(level, "Utterance stopped");
                self.status.update("Processing...");
                self.finish_capture();
            }
            None => {}
        }
    }

    /// Drain the session queue. Called once per tick, after `tick`.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                SessionEvent::Chunk(bytes) => self.recorder.push_chunk(bytes),
                SessionEvent::Finalized => self.dispatch_upload(),
                SessionEvent::UploadDone(Ok(url)) => {
                    self.status
                        .update("Translation complete! Playing audio...");
                    self.playback.play(&cache_busted(&url));
                }
                SessionEvent::UploadDone(Err(e)) => {
                    tracing::warn!("Upload failed: {}", e);
                    self.status.update(&format!("Error: {}", e));
                }
            }
        }
    }

    /// Close out an in-flight utterance at teardown. Uploads already
    /// dispatched are not cancelled and complete on their own.
    pub fn shutdown(&mut self, now: Instant) {
        if self.vad.force_end(now).is_some() {
            tracing::info!("Discarding unfinished utterance at shutdown");
            if self.encoder.is_active() {
                let _ = self.encoder.stop();
            }
            if self.recorder.is_active() {
                let _ = self.recorder.finalize();
            }
        }
    }

    /// Stop the encoder and route its single chunk plus the finalize
    /// signal through the queue, preserving delivery order with any
    /// other pending events.
    fn finish_capture(&mut self) {
        match self.encoder.stop() {
            Ok(bytes) => {
                let _ = self.event_tx.send(SessionEvent::Chunk(bytes));
                let _ = self.event_tx.send(SessionEvent::Finalized);
            }
            Err(e) => {
                tracing::error!("Failed to finalize utterance audio: {}", e);
                self.status.update(&format!("Error: {}", e));
                self.recorder.finalize();
            }
        }
    }

    /// Finalize the clip, read the current language selection, and hand
    /// the upload to a detached task. The session does not block on it;
    /// the VAD is already back in `Idle` and can start a new utterance
    /// while this one is still in flight.
    fn dispatch_upload(&mut self) {
        let clip = self.recorder.finalize();
        let language = self.language.current();

        self.status.update("Uploading and translating...");
        tracing::info!(
            bytes = clip.data.len(),
            language = %language,
            "Dispatching utterance upload"
        );

        let uploader = Arc::clone(&self.uploader);
        let results = self.event_tx.clone();
        tokio::spawn(async move {
            let result = uploader.upload(clip.data, &language).await;
            let _ = results.send(SessionEvent::UploadDone(result));
        });
    }
}
