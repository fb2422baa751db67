use std::mem::{align_of, offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use static_assertions::const_assert_eq;

use crate::layout::{field_layout, fields_tile, FieldLayout, GpuRecord};

/// Default depth bias for shadow comparisons.
pub const DEFAULT_SHADOW_BIAS: f32 = 0.005;

/// Per-light shadow projection, bound at
/// [`BufferSlot::ShadowUniforms`](crate::BufferSlot::ShadowUniforms).
///
/// WGSL rounds the struct up to its 16-byte alignment; the trailing 12 bytes
/// are spelled out as `_pad` so the host size matches.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShadowUniforms {
    pub light_view: [[f32; 4]; 4],
    pub light_projection: [[f32; 4]; 4],
    /// Small positive offset applied during depth comparison.
    pub shadow_bias: f32,
    pub _pad: [f32; 3],
}

impl ShadowUniforms {
    pub fn new(light_view: Mat4, light_projection: Mat4, shadow_bias: f32) -> Self {
        debug_assert!(shadow_bias >= 0.0, "shadow bias must not be negative");
        Self {
            light_view: light_view.to_cols_array_2d(),
            light_projection: light_projection.to_cols_array_2d(),
            shadow_bias,
            _pad: [0.0; 3],
        }
    }

    #[inline]
    pub fn light_view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.light_view)
    }

    #[inline]
    pub fn light_projection_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.light_projection)
    }

    /// Combined light-space transform (`projection * view`).
    #[inline]
    pub fn light_space_matrix(&self) -> Mat4 {
        self.light_projection_matrix() * self.light_view_matrix()
    }
}

impl Default for ShadowUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, DEFAULT_SHADOW_BIAS)
    }
}

impl GpuRecord for ShadowUniforms {
    const DEVICE_NAME: &'static str = "ShadowUniforms";
    const DEVICE_SIZE: usize = 144;
    const DEVICE_ALIGN: usize = 16;
    const FIELDS: &'static [FieldLayout] = field_layout!(ShadowUniforms {
        light_view: [[f32; 4]; 4],
        light_projection: [[f32; 4]; 4],
        shadow_bias: f32,
        _pad: [f32; 3],
    });
}

const_assert_eq!(size_of::<ShadowUniforms>(), ShadowUniforms::DEVICE_SIZE);
const_assert_eq!(align_of::<ShadowUniforms>(), ShadowUniforms::DEVICE_ALIGN);
const_assert_eq!(offset_of!(ShadowUniforms, light_projection), 64);
const_assert_eq!(offset_of!(ShadowUniforms, shadow_bias), 128);
const _: () = assert!(fields_tile(ShadowUniforms::FIELDS, ShadowUniforms::DEVICE_SIZE));

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn bias_round_trips_bit_exact() {
        let shadow = ShadowUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0015);
        let bytes = bytemuck::bytes_of(&shadow).to_vec();
        let back: ShadowUniforms = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(back.shadow_bias.to_bits(), 0.0015f32.to_bits());
    }

    #[test]
    fn light_space_is_projection_times_view() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::Z);
        let proj = Mat4::orthographic_rh(-5.0, 5.0, -5.0, 5.0, 0.1, 20.0);
        let shadow = ShadowUniforms::new(view, proj, DEFAULT_SHADOW_BIAS);
        assert_eq!(shadow.light_space_matrix(), proj * view);
    }
}
