use std::time::Duration;

use super::RingError;

/// Frame ring parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingConfig {
    /// Copies kept per record type. Must cover every frame the device may
    /// have in flight; triple buffering is the usual choice.
    pub frames_in_flight: usize,

    /// Longest the host may wait for a copy to be released. One display
    /// interval; waiting longer shows up as stutter.
    pub frame_budget: Duration,
}

impl RingConfig {
    /// Ring sized for a display refreshing at `hz`.
    pub fn for_refresh_rate(frames_in_flight: usize, hz: f32) -> Self {
        Self {
            frames_in_flight,
            frame_budget: Duration::from_secs_f32(1.0 / hz.max(1.0)),
        }
    }

    pub fn validate(&self) -> Result<(), RingError> {
        if self.frames_in_flight == 0 {
            return Err(RingError::InvalidConfig("frames_in_flight must be at least 1"));
        }
        if self.frame_budget.is_zero() {
            return Err(RingError::InvalidConfig("frame_budget must be non-zero"));
        }
        Ok(())
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::for_refresh_rate(3, 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_triple_buffered_at_60hz() {
        let config = RingConfig::default();
        assert_eq!(config.frames_in_flight, 3);
        let ms = config.frame_budget.as_secs_f64() * 1000.0;
        assert!((ms - 16.667).abs() < 0.01, "budget was {ms} ms");
        config.validate().unwrap();
    }

    #[test]
    fn zero_frames_is_rejected() {
        let config = RingConfig {
            frames_in_flight: 0,
            ..RingConfig::default()
        };
        assert!(matches!(config.validate(), Err(RingError::InvalidConfig(_))));
    }

    #[test]
    fn zero_budget_is_rejected() {
        let config = RingConfig {
            frame_budget: Duration::ZERO,
            ..RingConfig::default()
        };
        assert!(matches!(config.validate(), Err(RingError::InvalidConfig(_))));
    }
}
