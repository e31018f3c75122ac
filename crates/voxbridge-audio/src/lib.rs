pub mod analyzer;
pub mod capture;
pub mod encoder;
pub mod recorder;

pub use analyzer::{AnalyzerConfig, SpectrumAnalyzer};
pub use capture::CaptureThread;
pub use encoder::WavEncoder;
pub use recorder::{UtteranceClip, UtteranceRecorder};
