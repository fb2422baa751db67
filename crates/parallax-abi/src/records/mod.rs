//! Fixed-layout records copied into GPU-visible memory.
//!
//! Every record is `#[repr(C)]` with explicit padding and derives
//! [`bytemuck::Pod`], so it can be uploaded with `bytemuck::bytes_of` and has
//! no implicit padding bytes.

mod frame;
mod instance;
mod layer;
mod shadow;
mod vertex;

pub use frame::FrameUniforms;
pub use instance::InstanceUniforms;
pub use layer::{LayerMode, LayerUniforms};
pub use shadow::{ShadowUniforms, DEFAULT_SHADOW_BIAS};
pub use vertex::{AttributeFormat, AttributeLayout, Vertex};
