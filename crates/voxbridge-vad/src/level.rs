pub struct LevelMeter;

impl LevelMeter {
    pub fn new() -> Self {
        Self
    }

    /// Arithmetic mean of a frame of frequency-bin magnitudes.
    ///
    /// Side-effect free; an empty frame reads as 0.0 so a stalled
    /// analyzer can never look like speech.
    pub fn average(&self, frame: &[u8]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }
        let sum: u32 = frame.iter().map(|&bin| bin as u32).sum();
        sum as f32 / frame.len() as f32
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FREQUENCY_BINS;

    #[test]
    fn silence_averages_to_zero() {
        let meter = LevelMeter::new();
        let frame = vec![0u8; FREQUENCY_BINS];
        assert_eq!(meter.average(&frame), 0.0);
    }

    #[test]
    fn uniform_frame_averages_to_its_value() {
        let meter = LevelMeter::new();
        let frame = vec![40u8; FREQUENCY_BINS];
        assert_eq!(meter.average(&frame), 40.0);
    }

    #[test]
    fn mixed_frame_averages_exactly() {
        let meter = LevelMeter::new();
        // 128 bins at 10 and 128 bins at 50 -> mean 30
        let mut frame = vec![10u8; 128];
        frame.extend(vec![50u8; 128]);
        assert_eq!(meter.average(&frame), 30.0);
    }

    #[test]
    fn empty_frame_is_defined_as_zero() {
        let meter = LevelMeter::new();
        assert_eq!(meter.average(&[]), 0.0);
    }

    #[test]
    fn full_scale_frame_does_not_overflow() {
        let meter = LevelMeter::new();
        let frame = vec![255u8; FREQUENCY_BINS];
        assert_eq!(meter.average(&frame), 255.0);
    }
}
