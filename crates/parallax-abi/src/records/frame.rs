use std::mem::{align_of, offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use static_assertions::const_assert_eq;

use crate::layout::{field_layout, fields_tile, FieldLayout, GpuRecord};

/// Per-frame camera, lighting, and time parameters shared by every draw.
///
/// Bound at [`BufferSlot::SharedUniforms`](crate::BufferSlot::SharedUniforms).
///
/// WGSL places each `vec3<f32>` on a 16-byte boundary but only occupies 12
/// bytes, so a following scalar may pack into the tail. The ambient and
/// direction vectors are followed by explicit padding; the light color is
/// followed directly by `material_shininess`.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],

    pub ambient_light_color: [f32; 3],
    pub _pad_ambient: f32,
    pub directional_light_direction: [f32; 3],
    pub _pad_direction: f32,
    pub directional_light_color: [f32; 3],
    pub material_shininess: f32,

    /// Seconds since the renderer started.
    pub time: f32,
    pub _pad: [f32; 3],
}

impl FrameUniforms {
    pub fn new(
        view: Mat4,
        projection: Mat4,
        ambient_light_color: Vec3,
        directional_light_direction: Vec3,
        directional_light_color: Vec3,
        material_shininess: f32,
        time: f32,
    ) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            ambient_light_color: ambient_light_color.to_array(),
            _pad_ambient: 0.0,
            directional_light_direction: directional_light_direction.to_array(),
            _pad_direction: 0.0,
            directional_light_color: directional_light_color.to_array(),
            material_shininess,
            time,
            _pad: [0.0; 3],
        }
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }

    /// Updates the time field in place, leaving camera and lighting as-is.
    #[inline]
    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::ZERO,
            Vec3::NEG_Y,
            Vec3::ONE,
            1.0,
            0.0,
        )
    }
}

impl GpuRecord for FrameUniforms {
    const DEVICE_NAME: &'static str = "FrameUniforms";
    const DEVICE_SIZE: usize = 192;
    const DEVICE_ALIGN: usize = 16;
    const FIELDS: &'static [FieldLayout] = field_layout!(FrameUniforms {
        view: [[f32; 4]; 4],
        projection: [[f32; 4]; 4],
        ambient_light_color: [f32; 3],
        _pad_ambient: f32,
        directional_light_direction: [f32; 3],
        _pad_direction: f32,
        directional_light_color: [f32; 3],
        material_shininess: f32,
        time: f32,
        _pad: [f32; 3],
    });
}

const_assert_eq!(size_of::<FrameUniforms>(), FrameUniforms::DEVICE_SIZE);
const_assert_eq!(align_of::<FrameUniforms>(), FrameUniforms::DEVICE_ALIGN);
const_assert_eq!(size_of::<FrameUniforms>() % 16, 0);
const_assert_eq!(offset_of!(FrameUniforms, projection), 64);
const_assert_eq!(offset_of!(FrameUniforms, ambient_light_color), 128);
const_assert_eq!(offset_of!(FrameUniforms, directional_light_direction), 144);
const_assert_eq!(offset_of!(FrameUniforms, directional_light_color), 160);
const_assert_eq!(offset_of!(FrameUniforms, material_shininess), 172);
const_assert_eq!(offset_of!(FrameUniforms, time), 176);
const _: () = assert!(fields_tile(FrameUniforms::FIELDS, FrameUniforms::DEVICE_SIZE));
