//! Binding slot registry.
//!
//! Every slot is a compile-time constant shared with `shader_types.wgsl`.
//! Namespaces are independent and each is dense from zero. New slots are
//! appended; existing values never move.
//!
//! Mapping onto wgpu:
//! - uniform [`BufferSlot`]s are `@binding`s in [`UNIFORM_GROUP`]
//! - mesh [`BufferSlot`]s are vertex-buffer slots (`set_vertex_buffer`)
//! - [`TextureSlot`]s are `@binding`s in [`TEXTURE_GROUP`]
//! - [`SamplerSlot`]s are `@binding`s in [`SAMPLER_GROUP`]
//! - [`VertexAttribute`]s are `@location`s of the vertex stage input

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ContractError;

/// Bind group holding the uniform records.
pub const UNIFORM_GROUP: u32 = 0;
/// Bind group holding the camera planes, mask, and shadow map.
pub const TEXTURE_GROUP: u32 = 1;
/// Bind group holding samplers.
pub const SAMPLER_GROUP: u32 = 2;

/// A closed set of slot identifiers.
pub trait SlotNamespace: Copy + Eq + fmt::Debug + 'static {
    /// Namespace name used in diagnostics.
    const NAMESPACE: &'static str;
    /// Every slot, in numeric order.
    const ALL: &'static [Self];

    fn index(self) -> u32;
    fn label(self) -> &'static str;
}

macro_rules! slot_namespace {
    (
        $(#[$meta:meta])*
        pub enum $name:ident in $namespace:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[repr(u32)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            #[inline]
            pub const fn index(self) -> u32 {
                self as u32
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl SlotNamespace for $name {
            const NAMESPACE: &'static str = $namespace;
            const ALL: &'static [Self] = $name::ALL;

            #[inline]
            fn index(self) -> u32 {
                $name::index(self)
            }

            fn label(self) -> &'static str {
                $name::label(self)
            }
        }

        const _: () = assert!(
            is_dense(&[$( $value, )+]),
            concat!($namespace, " slots must be distinct and contiguous from zero"),
        );
    };
}

slot_namespace! {
    /// Buffer binding slots.
    pub enum BufferSlot in "buffer" {
        /// Interleaved [`Vertex`](crate::Vertex) stream.
        MeshPositions = 0 => "mesh positions",
        /// Secondary per-vertex stream. Reserved for mesh formats that split
        /// generic attributes (normals) out of the position stream.
        MeshGenerics = 1 => "mesh generics",
        SharedUniforms = 2 => "shared uniforms",
        InstanceUniforms = 3 => "instance uniforms",
        LayerUniforms = 4 => "layer uniforms",
        ShadowUniforms = 5 => "shadow uniforms",
    }
}

slot_namespace! {
    /// Texture binding slots.
    pub enum TextureSlot in "texture" {
        /// Camera luma (Y) plane.
        Luma = 0 => "luma plane",
        /// Camera chroma (CbCr) plane.
        Chroma = 1 => "chroma plane",
        /// Occlusion / segmentation mask.
        Mask = 2 => "mask",
        ShadowMap = 3 => "shadow map",
    }
}

slot_namespace! {
    /// Vertex attribute slots (`@location`).
    pub enum VertexAttribute in "vertex attribute" {
        Position = 0 => "position",
        Texcoord = 1 => "texcoord",
        /// Reserved for the [`BufferSlot::MeshGenerics`] stream; the
        /// interleaved [`Vertex`](crate::Vertex) does not carry a normal.
        Normal = 2 => "normal",
        TextureIndex = 3 => "texture index",
    }
}

slot_namespace! {
    /// Sampler binding slots.
    pub enum SamplerSlot in "sampler" {
        Color = 0 => "color sampler",
        ShadowCompare = 1 => "shadow comparison sampler",
    }
}

impl BufferSlot {
    /// Whether the slot is bound as a uniform buffer (as opposed to a vertex stream).
    #[inline]
    pub const fn is_uniform(self) -> bool {
        !matches!(self, BufferSlot::MeshPositions | BufferSlot::MeshGenerics)
    }
}

impl TextureSlot {
    /// Whether the slot holds a depth texture sampled with comparison.
    #[inline]
    pub const fn is_depth(self) -> bool {
        matches!(self, TextureSlot::ShadowMap)
    }
}

impl SamplerSlot {
    #[inline]
    pub const fn is_comparison(self) -> bool {
        matches!(self, SamplerSlot::ShadowCompare)
    }
}

/// Returns `true` if `indices` holds every value in `0..len` exactly once.
pub const fn is_dense(indices: &[u32]) -> bool {
    let mut expected = 0;
    while expected < indices.len() {
        let mut seen = false;
        let mut i = 0;
        while i < indices.len() {
            if indices[i] as usize == expected {
                if seen {
                    return false;
                }
                seen = true;
            }
            i += 1;
        }
        if !seen {
            return false;
        }
        expected += 1;
    }
    true
}

/// Checks a slot table: pairwise distinct, starting at 0, no gaps.
pub fn validate_slots(
    namespace: &'static str,
    slots: &[(u32, &'static str)],
) -> Result<(), ContractError> {
    let mut owners: BTreeMap<u32, &'static str> = BTreeMap::new();

    for &(index, label) in slots {
        if let Some(first) = owners.insert(index, label) {
            return Err(ContractError::SlotCollision {
                namespace,
                index,
                first,
                second: label,
            });
        }
    }

    for expected in 0..slots.len() as u32 {
        if !owners.contains_key(&expected) {
            return Err(ContractError::SlotGap {
                namespace,
                missing: expected,
            });
        }
    }

    Ok(())
}

/// Runs [`validate_slots`] over a whole namespace.
pub fn validate_namespace<S: SlotNamespace>() -> Result<(), ContractError> {
    let table: Vec<(u32, &'static str)> = S::ALL.iter().map(|s| (s.index(), s.label())).collect();
    validate_slots(S::NAMESPACE, &table)
}

/// Validates every namespace in the registry.
pub fn validate_registry() -> Result<(), ContractError> {
    validate_namespace::<BufferSlot>()?;
    validate_namespace::<TextureSlot>()?;
    validate_namespace::<VertexAttribute>()?;
    validate_namespace::<SamplerSlot>()?;
    Ok(())
}
