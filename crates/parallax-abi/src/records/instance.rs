use std::mem::{align_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use static_assertions::const_assert_eq;

use crate::layout::{field_layout, fields_tile, FieldLayout, GpuRecord};

/// Per-draw model transform, bound at
/// [`BufferSlot::InstanceUniforms`](crate::BufferSlot::InstanceUniforms).
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceUniforms {
    pub model: [[f32; 4]; 4],
}

impl InstanceUniforms {
    #[inline]
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl Default for InstanceUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

impl From<Mat4> for InstanceUniforms {
    fn from(model: Mat4) -> Self {
        Self::new(model)
    }
}

impl GpuRecord for InstanceUniforms {
    const DEVICE_NAME: &'static str = "InstanceUniforms";
    const DEVICE_SIZE: usize = 64;
    const DEVICE_ALIGN: usize = 16;
    const FIELDS: &'static [FieldLayout] = field_layout!(InstanceUniforms {
        model: [[f32; 4]; 4],
    });
}

// Exactly one 4x4 matrix; no padding.
const_assert_eq!(size_of::<InstanceUniforms>(), size_of::<[[f32; 4]; 4]>());
const_assert_eq!(size_of::<InstanceUniforms>(), InstanceUniforms::DEVICE_SIZE);
const_assert_eq!(align_of::<InstanceUniforms>(), InstanceUniforms::DEVICE_ALIGN);
const _: () = assert!(fields_tile(InstanceUniforms::FIELDS, InstanceUniforms::DEVICE_SIZE));
