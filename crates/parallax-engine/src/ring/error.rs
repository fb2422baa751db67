use std::fmt;
use std::time::Duration;

/// What the frame loop should do after a ring error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameAction {
    /// Produce and submit the frame.
    Render,
    /// Drop this frame entirely; try again next tick.
    SkipFrame,
    /// Configuration defect; stop rendering.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    InvalidConfig(&'static str),
    /// The next copy was still in flight after a full frame budget.
    Stalled { slot: usize, waited: Duration },
    /// The open frame already holds `capacity` records.
    BatchFull { capacity: usize },
}

impl RingError {
    pub fn action(&self) -> FrameAction {
        match self {
            RingError::InvalidConfig(_) => FrameAction::Fatal,
            RingError::Stalled { .. } | RingError::BatchFull { .. } => FrameAction::SkipFrame,
        }
    }
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingError::InvalidConfig(msg) => write!(f, "invalid frame ring configuration: {msg}"),
            RingError::Stalled { slot, waited } => write!(
                f,
                "ring copy {slot} still in flight after {:.2} ms",
                waited.as_secs_f64() * 1000.0
            ),
            RingError::BatchFull { capacity } => {
                write!(f, "frame already holds {capacity} records; no room for another draw")
            }
        }
    }
}

impl std::error::Error for RingError {}
