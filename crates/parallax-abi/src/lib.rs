//! Host/device data-layout contract for the parallax AR compositor.
//!
//! This crate owns the records and slot numbers that host rendering code and
//! WGSL shader stages must agree on byte for byte:
//! - [`slots`]: buffer, texture, vertex-attribute, and sampler slots
//! - [`records`]: frame, instance, layer, shadow, and vertex records
//! - [`verify_contract`]: startup reflection of the WGSL declarations
//!
//! Record layouts are also pinned by compile-time assertions, so most drift
//! fails the build before it can reach a device.

pub mod error;
pub mod layout;
pub mod records;
pub mod slots;
mod verify;

pub use error::{ContractError, Side};
pub use layout::{padded_stride, FieldLayout, GpuRecord, ScalarField, ScalarKind};
pub use records::{
    AttributeFormat, AttributeLayout, FrameUniforms, InstanceUniforms, LayerMode, LayerUniforms,
    ShadowUniforms, Vertex, DEFAULT_SHADOW_BIAS,
};
pub use slots::{BufferSlot, SamplerSlot, SlotNamespace, TextureSlot, VertexAttribute};
pub use verify::{
    verify_contract, verify_contract_source, DeviceGlobal, RecordSummary, VerifiedContract,
    DEVICE_GLOBALS, SHADER_TYPES_WGSL,
};
