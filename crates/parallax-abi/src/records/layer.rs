use std::fmt;
use std::mem::{align_of, offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use static_assertions::const_assert_eq;

use crate::layout::{field_layout, fields_tile, FieldLayout, GpuRecord, ScalarField, ScalarKind};

/// Compositing behavior selector for a layer.
///
/// The value is interpreted by the compositing shader only. The named
/// constants cover the modes the stock shaders know about; pipelines may
/// define further values with [`LayerMode::new`].
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct LayerMode(u32);

impl LayerMode {
    pub const OPAQUE: LayerMode = LayerMode(0);
    pub const ALPHA_BLENDED: LayerMode = LayerMode(1);
    pub const VIDEO_PASSTHROUGH: LayerMode = LayerMode(2);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl ScalarField for LayerMode {
    const KIND: ScalarKind = ScalarKind::U32;
}

impl fmt::Debug for LayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LayerMode::OPAQUE => f.write_str("LayerMode::OPAQUE"),
            LayerMode::ALPHA_BLENDED => f.write_str("LayerMode::ALPHA_BLENDED"),
            LayerMode::VIDEO_PASSTHROUGH => f.write_str("LayerMode::VIDEO_PASSTHROUGH"),
            LayerMode(raw) => write!(f, "LayerMode({raw})"),
        }
    }
}

/// Per-layer transform and blend parameters for 2D / video layers, bound at
/// [`BufferSlot::LayerUniforms`](crate::BufferSlot::LayerUniforms).
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LayerUniforms {
    pub transform: [[f32; 4]; 4],
    pub scale: f32,
    pub depth: f32,
    pub mode: LayerMode,
    pub _pad: f32,
}

impl LayerUniforms {
    pub fn new(transform: Mat4, scale: f32, depth: f32, mode: LayerMode) -> Self {
        Self {
            transform: transform.to_cols_array_2d(),
            scale,
            depth,
            mode,
            _pad: 0.0,
        }
    }

    #[inline]
    pub fn transform_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.transform)
    }
}

impl Default for LayerUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, 1.0, 0.0, LayerMode::OPAQUE)
    }
}

impl GpuRecord for LayerUniforms {
    const DEVICE_NAME: &'static str = "LayerUniforms";
    const DEVICE_SIZE: usize = 80;
    const DEVICE_ALIGN: usize = 16;
    const FIELDS: &'static [FieldLayout] = field_layout!(LayerUniforms {
        transform: [[f32; 4]; 4],
        scale: f32,
        depth: f32,
        mode: LayerMode,
        _pad: f32,
    });
}

const_assert_eq!(size_of::<LayerMode>(), size_of::<u32>());
const_assert_eq!(size_of::<LayerUniforms>(), LayerUniforms::DEVICE_SIZE);
const_assert_eq!(align_of::<LayerUniforms>(), LayerUniforms::DEVICE_ALIGN);
const_assert_eq!(offset_of!(LayerUniforms, scale), 64);
const_assert_eq!(offset_of!(LayerUniforms, depth), 68);
const_assert_eq!(offset_of!(LayerUniforms, mode), 72);
const _: () = assert!(fields_tile(LayerUniforms::FIELDS, LayerUniforms::DEVICE_SIZE));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_layers_do_not_clobber_each_other() {
        let a = LayerUniforms::new(Mat4::IDENTITY, 0.5, 0.25, LayerMode::OPAQUE);
        let b = LayerUniforms::new(Mat4::IDENTITY, 2.0, 0.75, LayerMode::ALPHA_BLENDED);

        // Two slots back to back in one buffer.
        let mut buffer = vec![0u8; 2 * size_of::<LayerUniforms>()];
        let (first, second) = buffer.split_at_mut(size_of::<LayerUniforms>());
        first.copy_from_slice(bytemuck::bytes_of(&a));
        second.copy_from_slice(bytemuck::bytes_of(&b));

        let back_a: LayerUniforms = bytemuck::pod_read_unaligned(&buffer[..80]);
        let back_b: LayerUniforms = bytemuck::pod_read_unaligned(&buffer[80..]);

        assert_eq!(back_a.scale, 0.5);
        assert_eq!(back_a.depth, 0.25);
        assert_eq!(back_a.mode, LayerMode::OPAQUE);
        assert_eq!(back_b.scale, 2.0);
        assert_eq!(back_b.depth, 0.75);
        assert_eq!(back_b.mode, LayerMode::ALPHA_BLENDED);
    }

    #[test]
    fn mode_is_stored_as_plain_u32() {
        let layer = LayerUniforms::new(Mat4::IDENTITY, 1.0, 0.0, LayerMode::new(7));
        let words: &[u32] = bytemuck::cast_slice(bytemuck::bytes_of(&layer));
        assert_eq!(words[18], 7);
    }

    #[test]
    fn mode_field_is_declared_unsigned() {
        let mode = LayerUniforms::FIELDS.iter().find(|f| f.name == "mode").unwrap();
        assert_eq!(mode.kind, ScalarKind::U32);
        assert_eq!(mode.offset, 72);
    }

    #[test]
    fn unknown_modes_debug_as_raw() {
        assert_eq!(format!("{:?}", LayerMode::new(9)), "LayerMode(9)");
        assert_eq!(format!("{:?}", LayerMode::OPAQUE), "LayerMode::OPAQUE");
    }
}
