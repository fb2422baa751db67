//! wgpu-facing side of the contract.
//!
//! Bind group layouts, vertex layouts, and ring-backed uniform buffers, all
//! derived from the `parallax_abi` slot registry. Constructors require a
//! [`VerifiedContract`](parallax_abi::VerifiedContract).

mod bindings;
mod uniform_ring;

pub use bindings::{
    min_binding_size, sampler_entries, sampler_layout_entry, texture_entries,
    texture_layout_entry, uniform_entries, uniform_layout_entry, vertex_buffer_layout,
    ContractLayouts,
};
pub use uniform_ring::UniformRing;
