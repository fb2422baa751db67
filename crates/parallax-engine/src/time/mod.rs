//! Frame timing.
//!
//! One `FrameClock` per render loop. `tick()` once per produced frame; the
//! returned `FrameTime` carries the clamped delta, the elapsed time written
//! into `FrameUniforms::time`, and the frame index.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
