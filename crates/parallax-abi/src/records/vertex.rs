use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use static_assertions::const_assert_eq;

use crate::layout::ScalarKind;
use crate::slots::VertexAttribute;

/// Scalar/vector format of one vertex attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Uint32,
}

impl AttributeFormat {
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            AttributeFormat::Float32x2 => 8,
            AttributeFormat::Float32x3 => 12,
            AttributeFormat::Uint32 => 4,
        }
    }

    #[inline]
    pub const fn kind(self) -> ScalarKind {
        match self {
            AttributeFormat::Float32x2 | AttributeFormat::Float32x3 => ScalarKind::F32,
            AttributeFormat::Uint32 => ScalarKind::U32,
        }
    }
}

/// Placement of one attribute inside the interleaved vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    /// Field name, matching the WGSL `VertexIn` member.
    pub name: &'static str,
    pub slot: VertexAttribute,
    pub format: AttributeFormat,
    pub offset: usize,
}

/// Interleaved per-vertex payload, streamed from
/// [`BufferSlot::MeshPositions`](crate::BufferSlot::MeshPositions).
///
/// Tightly packed: stride 24 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    /// Selects which bound texture this vertex samples from.
    pub texture_index: u32,
}

impl Vertex {
    /// Name of the WGSL vertex input struct.
    pub const DEVICE_NAME: &'static str = "VertexIn";

    pub const STRIDE: usize = 24;

    pub const ATTRIBUTES: [AttributeLayout; 3] = [
        AttributeLayout {
            name: "position",
            slot: VertexAttribute::Position,
            format: AttributeFormat::Float32x3,
            offset: offset_of!(Vertex, position),
        },
        AttributeLayout {
            name: "tex_coord",
            slot: VertexAttribute::Texcoord,
            format: AttributeFormat::Float32x2,
            offset: offset_of!(Vertex, tex_coord),
        },
        AttributeLayout {
            name: "texture_index",
            slot: VertexAttribute::TextureIndex,
            format: AttributeFormat::Uint32,
            offset: offset_of!(Vertex, texture_index),
        },
    ];

    #[inline]
    pub fn new(position: Vec3, tex_coord: Vec2, texture_index: u32) -> Self {
        Self {
            position: position.to_array(),
            tex_coord: tex_coord.to_array(),
            texture_index,
        }
    }
}

const_assert_eq!(size_of::<Vertex>(), Vertex::STRIDE);
const_assert_eq!(offset_of!(Vertex, position), 0);
const_assert_eq!(offset_of!(Vertex, tex_coord), 12);
const_assert_eq!(offset_of!(Vertex, texture_index), 20);

const _: () = {
    let attrs = &Vertex::ATTRIBUTES;
    let mut cursor = 0;
    let mut i = 0;
    while i < attrs.len() {
        assert!(attrs[i].offset == cursor, "vertex attributes must be tightly packed");
        cursor += attrs[i].format.size();
        i += 1;
    }
    assert!(cursor == Vertex::STRIDE, "vertex attributes must cover the stride");
};
