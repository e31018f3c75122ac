pub mod config;
pub mod constants;
pub mod level;
pub mod state;
pub mod types;

pub use config::VadConfig;
pub use constants::{FFT_SIZE, FREQUENCY_BINS, TICK_INTERVAL_MS};
pub use level::LevelMeter;
pub use state::VadStateMachine;
pub use types::{VadEvent, VadMetrics, VadState};
