//! wgpu layout objects derived from the slot registry.
//!
//! Every binding number and attribute location here comes from a
//! `parallax_abi` slot constant; nothing is numbered by hand. All helpers that
//! create device objects take a `VerifiedContract`.

use std::num::NonZeroU64;

use parallax_abi::slots::{SAMPLER_GROUP, TEXTURE_GROUP, UNIFORM_GROUP};
use parallax_abi::{
    AttributeFormat, BufferSlot, FrameUniforms, GpuRecord, InstanceUniforms, LayerUniforms,
    SamplerSlot, ShadowUniforms, TextureSlot, VerifiedContract, Vertex,
};

const fn vertex_format(format: AttributeFormat) -> wgpu::VertexFormat {
    match format {
        AttributeFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
        AttributeFormat::Uint32 => wgpu::VertexFormat::Uint32,
    }
}

const fn vertex_attribute(index: usize) -> wgpu::VertexAttribute {
    let attr = Vertex::ATTRIBUTES[index];
    wgpu::VertexAttribute {
        format: vertex_format(attr.format),
        offset: attr.offset as u64,
        shader_location: attr.slot.index(),
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    [vertex_attribute(0), vertex_attribute(1), vertex_attribute(2)];

/// Layout of the interleaved [`Vertex`] stream bound at
/// [`BufferSlot::MeshPositions`].
pub fn vertex_buffer_layout(_contract: &VerifiedContract) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: Vertex::STRIDE as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Minimum binding size for a uniform record: its full device size.
pub const fn min_binding_size<T: GpuRecord>() -> Option<NonZeroU64> {
    NonZeroU64::new(T::DEVICE_SIZE as u64)
}

/// Uniform entry for `slot` in [`UNIFORM_GROUP`].
///
/// Entries use dynamic offsets so one buffer can hold every ring copy.
pub fn uniform_layout_entry<T: GpuRecord>(
    slot: BufferSlot,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    debug_assert!(slot.is_uniform(), "{} is a vertex stream slot", slot.label());
    wgpu::BindGroupLayoutEntry {
        binding: slot.index(),
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: min_binding_size::<T>(),
        },
        count: None,
    }
}

/// Texture entry for `slot` in [`TEXTURE_GROUP`].
pub fn texture_layout_entry(slot: TextureSlot) -> wgpu::BindGroupLayoutEntry {
    let sample_type = if slot.is_depth() {
        wgpu::TextureSampleType::Depth
    } else {
        wgpu::TextureSampleType::Float { filterable: true }
    };
    wgpu::BindGroupLayoutEntry {
        binding: slot.index(),
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// Sampler entry for `slot` in [`SAMPLER_GROUP`].
pub fn sampler_layout_entry(slot: SamplerSlot) -> wgpu::BindGroupLayoutEntry {
    let ty = if slot.is_comparison() {
        wgpu::SamplerBindingType::Comparison
    } else {
        wgpu::SamplerBindingType::Filtering
    };
    wgpu::BindGroupLayoutEntry {
        binding: slot.index(),
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(ty),
        count: None,
    }
}

/// Entries for every uniform slot, in slot order.
pub fn uniform_entries() -> [wgpu::BindGroupLayoutEntry; 4] {
    let both = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
    [
        uniform_layout_entry::<FrameUniforms>(BufferSlot::SharedUniforms, both),
        uniform_layout_entry::<InstanceUniforms>(BufferSlot::InstanceUniforms, wgpu::ShaderStages::VERTEX),
        uniform_layout_entry::<LayerUniforms>(BufferSlot::LayerUniforms, both),
        uniform_layout_entry::<ShadowUniforms>(BufferSlot::ShadowUniforms, both),
    ]
}

pub fn texture_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    TextureSlot::ALL.iter().map(|&s| texture_layout_entry(s)).collect()
}

pub fn sampler_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    SamplerSlot::ALL.iter().map(|&s| sampler_layout_entry(s)).collect()
}

/// Bind group layouts for the three contract groups.
pub struct ContractLayouts {
    pub uniforms: wgpu::BindGroupLayout,
    pub textures: wgpu::BindGroupLayout,
    pub samplers: wgpu::BindGroupLayout,
}

impl ContractLayouts {
    pub fn new(device: &wgpu::Device, _contract: &VerifiedContract) -> Self {
        let uniforms = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax uniforms bgl"),
            entries: &uniform_entries(),
        });
        let textures = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax textures bgl"),
            entries: &texture_entries(),
        });
        let samplers = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax samplers bgl"),
            entries: &sampler_entries(),
        });

        log::debug!(
            "contract bind group layouts created (groups {UNIFORM_GROUP}, {TEXTURE_GROUP}, {SAMPLER_GROUP})"
        );

        Self {
            uniforms,
            textures,
            samplers,
        }
    }

    /// Pipeline layout with the contract groups at their fixed indices.
    pub fn pipeline_layout(&self, device: &wgpu::Device) -> wgpu::PipelineLayout {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax pipeline layout"),
            bind_group_layouts: &[&self.uniforms, &self.textures, &self.samplers],
            immediate_size: 0,
        })
    }
}

// Pipeline layouts list groups positionally.
const _: () = assert!(UNIFORM_GROUP == 0 && TEXTURE_GROUP == 1 && SAMPLER_GROUP == 2);
