use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Audio subsystem error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Input device not found: {name:?}")]
    DeviceNotFound { name: Option<String> },

    #[error("Microphone access denied or unavailable: {0}")]
    AccessDenied(String),

    #[error("Device disconnected")]
    DeviceDisconnected,

    #[error("Format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("CPAL error: {0}")]
    Cpal(#[from] cpal::StreamError),

    #[error("Build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Default stream config error: {0}")]
    DefaultStreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

impl AppError {
    /// Device access failures end the session; everything else is
    /// reported and survived. Upload failures never reach this type at
    /// all -- they stay inside the session loop as status text.
    pub fn is_fatal(&self) -> bool {
        match self {
            AppError::Audio(_) | AppError::Fatal(_) => true,
            AppError::Config(_) => true,
            AppError::ShutdownRequested => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_errors_are_fatal() {
        let err = AppError::Audio(AudioError::DeviceNotFound { name: None });
        assert!(err.is_fatal());
    }

    #[test]
    fn shutdown_is_not_fatal() {
        assert!(!AppError::ShutdownRequested.is_fatal());
    }

    #[test]
    fn access_denied_message_names_the_microphone() {
        let err = AudioError::AccessDenied("permission denied".into());
        assert!(err.to_string().contains("Microphone access"));
    }
}
