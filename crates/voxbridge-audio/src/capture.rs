use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use voxbridge_foundation::AudioError;

/// Ring capacity in samples; about four seconds at 48 kHz.
const RING_CAPACITY: usize = 48_000 * 4;

/// Handle to the dedicated microphone capture thread.
///
/// The cpal stream lives entirely on that thread (it is not `Send`); the
/// rest of the pipeline sees only the rtrb consumer handed back from
/// `spawn` and drains it once per tick.
pub struct CaptureThread {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl CaptureThread {
    /// Open the named (or default) input device and start capturing.
    ///
    /// Returns the thread handle, the consumer side of the sample ring,
    /// and the negotiated sample rate. Device or permission failures are
    /// reported here, before any ticking starts; they are fatal to the
    /// session and are not retried.
    pub fn spawn(
        device_name: Option<String>,
    ) -> Result<(Self, Consumer<f32>, u32), AudioError> {
        let (producer, consumer) = RingBuffer::<f32>::new(RING_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, AudioError>>();

        let handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || {
                run_capture(device_name, producer, shutdown_flag, ready_tx);
            })
            .map_err(|e| AudioError::Fatal(format!("spawning capture thread: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(sample_rate)) => Ok((
                Self {
                    handle: Some(handle),
                    shutdown,
                },
                consumer,
                sample_rate,
            )),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(AudioError::Fatal(
                    "capture thread exited before reporting a device".into(),
                ))
            }
        }
    }

    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CaptureThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_capture(
    device_name: Option<String>,
    mut producer: Producer<f32>,
    shutdown: Arc<AtomicBool>,
    ready_tx: mpsc::Sender<Result<u32, AudioError>>,
) {
    let host = cpal::default_host();

    let device = match device_name {
        Some(ref name) => {
            let found = host.input_devices().ok().and_then(|mut devices| {
                devices.find(|d| d.name().map(|n| n == *name).unwrap_or(false))
            });
            match found {
                Some(d) => d,
                None => {
                    let _ = ready_tx.send(Err(AudioError::DeviceNotFound {
                        name: Some(name.clone()),
                    }));
                    return;
                }
            }
        }
        None => match host.default_input_device() {
            Some(d) => d,
            None => {
                let _ = ready_tx.send(Err(AudioError::DeviceNotFound { name: None }));
                return;
            }
        },
    };

    let supported = match device.default_input_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            let _ = ready_tx.send(Err(config_error(e)));
            return;
        }
    };

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let sample_rate = config.sample_rate.0;
    let channels = config.channels as usize;

    tracing::info!(
        device = %device.name().unwrap_or_else(|_| "<unknown>".into()),
        sample_rate,
        channels,
        "Opening input stream"
    );

    let err_fn = |e: cpal::StreamError| match e {
        cpal::StreamError::DeviceNotAvailable => {
            tracing::error!("{}", AudioError::DeviceDisconnected)
        }
        other => tracing::error!("Input stream error: {}", other),
    };

    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_cb = Arc::clone(&dropped);

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _| {
                let lost = push_mono(&mut producer, data, channels);
                if lost > 0 {
                    dropped_cb.fetch_add(lost, Ordering::Relaxed);
                }
            },
            err_fn,
            None,
        ),
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _| {
                let converted: Vec<f32> =
                    data.iter().map(|&s| s as f32 / 32768.0).collect();
                let lost = push_mono(&mut producer, &converted, channels);
                if lost > 0 {
                    dropped_cb.fetch_add(lost, Ordering::Relaxed);
                }
            },
            err_fn,
            None,
        ),
        other => {
            let _ = ready_tx.send(Err(AudioError::FormatNotSupported {
                format: format!("{:?}", other),
            }));
            return;
        }
    };

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(build_error(e)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(e.into()));
        return;
    }

    let _ = ready_tx.send(Ok(sample_rate));

    let mut reported: u64 = 0;
    while !shutdown.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(50));
        let total = dropped.load(Ordering::Relaxed);
        if total > reported {
            tracing::warn!(
                dropped = total - reported,
                total,
                "Sample ring full, dropping newest samples"
            );
            reported = total;
        }
    }

    drop(stream);
    tracing::info!("Capture thread stopped");
}

/// Downmix interleaved frames to mono and push into the ring. Returns
/// the number of samples that did not fit.
///
/// The producer half of an rtrb ring cannot evict, so overflow drops the
/// newest samples and keeps the oldest. The control loop drains the ring
/// every 16 ms and the ring holds seconds of audio, so this only happens
/// when the consumer has stalled; the capture thread counts and reports
/// it rather than hiding it.
fn push_mono(producer: &mut Producer<f32>, data: &[f32], channels: usize) -> u64 {
    let mut lost = 0u64;
    if channels <= 1 {
        for &sample in data {
            if producer.push(sample).is_err() {
                lost += 1;
            }
        }
        return lost;
    }
    for frame in data.chunks_exact(channels) {
        let mono = frame.iter().sum::<f32>() / channels as f32;
        if producer.push(mono).is_err() {
            lost += 1;
        }
    }
    lost
}

fn config_error(e: cpal::DefaultStreamConfigError) -> AudioError {
    match e {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => {
            AudioError::AccessDenied("input device not available".into())
        }
        other => other.into(),
    }
}

fn build_error(e: cpal::BuildStreamError) -> AudioError {
    match e {
        cpal::BuildStreamError::DeviceNotAvailable => {
            AudioError::AccessDenied("input device not available".into())
        }
        other => other.into(),
    }
}
