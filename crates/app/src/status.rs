use std::time::{SystemTime, UNIX_EPOCH};

/// Receives the human-readable lifecycle text the user sees.
pub trait StatusSink: Send + Sync {
    fn update(&self, text: &str);
}

/// Receives an output audio URL and a play command.
pub trait PlaybackSink: Send + Sync {
    fn play(&self, url: &str);
}

/// Default status sink: lifecycle text goes to the log.
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn update(&self, text: &str) {
        tracing::info!(status = %text);
    }
}

/// Default playback sink: logs the URL it was asked to play. A real
/// player front end implements `PlaybackSink` instead.
pub struct LogPlaybackSink;

impl PlaybackSink for LogPlaybackSink {
    fn play(&self, url: &str) {
        tracing::info!(url = %url, "Playing translated audio");
    }
}

/// Append a unique query parameter so a cached copy of an earlier
/// translation is never replayed.
pub fn cache_busted(url: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}?t={}", url, millis)
}
