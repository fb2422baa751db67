//! Parallax engine crate.
//!
//! wgpu runtime pieces built on the `parallax_abi` layout contract: binding
//! and vertex layouts derived from the slot registry, frame-in-flight rings
//! for uniform records, frame timing, and startup verification.

pub mod gpu;
pub mod logging;
pub mod ring;
pub mod startup;
pub mod time;

pub use startup::{bootstrap, EngineInit};
