//! Per-frame record rotation.
//!
//! The device may still read frame N's records while the host prepares frame
//! N+1. Each record type therefore keeps one copy per frame in flight. A copy
//! is reused only after the device signalled completion of the frame that
//! last read it, and the host never waits longer than one frame budget for
//! that signal: if the device is that far behind, the frame is dropped.
//!
//! [`FrameRing`] keeps one host record per copy. [`BatchRing`] tracks byte
//! offsets for a buffer whose copies each hold a batch of per-draw records.

mod batch_ring;
mod config;
mod error;
mod fence;
mod frame_ring;

pub use batch_ring::BatchRing;
pub use config::RingConfig;
pub use error::{FrameAction, RingError};
pub use fence::FrameFence;
pub use frame_ring::{FrameRing, FrameSlot};
