use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use voxbridge_app::config::AppConfig;
use voxbridge_app::session::{LanguageSelector, VadSession};
use voxbridge_app::status::{LogPlaybackSink, StatusSink, TracingStatusSink};
use voxbridge_audio::CaptureThread;
use voxbridge_foundation::{SessionState, ShutdownHandler, StateManager};
use voxbridge_translate::TranslateClient;
use voxbridge_vad::TICK_INTERVAL_MS;

#[derive(Parser, Debug)]
#[command(name = "voxbridge", about = "Voice-activated speech-to-speech translation")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Translation endpoint URL.
    #[arg(long, env = "VOXBRIDGE_ENDPOINT")]
    endpoint: Option<String>,

    /// Target language code, e.g. hi-IN.
    #[arg(long, short = 'l', env = "VOXBRIDGE_TARGET_LANGUAGE")]
    target_language: Option<String>,

    /// Input device name; defaults to the host's default microphone.
    #[arg(long)]
    device: Option<String>,
}

fn init_logging() -> anyhow::Result<()> {
    std::fs::create_dir_all("logs").context("creating logs directory")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "voxbridge.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(guard);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("Starting voxbridge");

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.translate.endpoint = endpoint;
    }
    if let Some(language) = cli.target_language {
        config.target_language = language;
    }
    if let Some(device) = cli.device {
        config.input_device = Some(device);
    }

    let state_manager = StateManager::new();
    let shutdown = ShutdownHandler::new().install().await;

    let status: Arc<dyn StatusSink> = Arc::new(TracingStatusSink);

    // Device access failure is fatal to the session: report and exit.
    let (mut capture, mut samples_rx, sample_rate) =
        match CaptureThread::spawn(config.input_device.clone()) {
            Ok(parts) => parts,
            Err(e) => {
                status.update(&format!("Error accessing microphone: {}", e));
                return Err(e.into());
            }
        };
    tracing::info!(sample_rate, "Audio capture started");

    let client = TranslateClient::new(&config.translate)?;
    let language = LanguageSelector::new(config.target_language.clone());
    let mut session = VadSession::new(
        config.vad.clone(),
        sample_rate,
        Arc::new(client),
        language,
        Arc::clone(&status),
        Arc::new(LogPlaybackSink),
    );

    state_manager.transition(SessionState::Running)?;
    status.update("Voice Activity Detection Initialized. Speak to start recording.");

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut scratch: Vec<f32> = Vec::with_capacity(4096);

    loop {
        tokio::select! {
            _ = shutdown.wait() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                scratch.clear();
                while let Ok(sample) = samples_rx.pop() {
                    scratch.push(sample);
                }
                session.tick(&scratch, Instant::now());
                session.drain_events();
            }
        }
    }

    state_manager.transition(SessionState::Stopping)?;
    session.shutdown(Instant::now());
    capture.stop();
    state_manager.transition(SessionState::Stopped)?;
    tracing::info!("voxbridge stopped");

    Ok(())
}
