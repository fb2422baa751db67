//! Size, alignment, and packing properties shared by every uniform record.

use parallax_abi::layout::fields_tile;
use parallax_abi::{
    padded_stride, FrameUniforms, GpuRecord, InstanceUniforms, LayerUniforms, ShadowUniforms,
};

fn check<T: GpuRecord>() {
    assert_eq!(T::host_size(), T::DEVICE_SIZE, "{} size", T::DEVICE_NAME);
    assert_eq!(T::host_align(), T::DEVICE_ALIGN, "{} align", T::DEVICE_NAME);
    assert_eq!(T::host_size() % 16, 0, "{} must be a multiple of 16", T::DEVICE_NAME);
    assert!(fields_tile(T::FIELDS, T::host_size()), "{} fields overlap or leave gaps", T::DEVICE_NAME);
}

#[test]
fn every_record_matches_its_device_size() {
    check::<FrameUniforms>();
    check::<InstanceUniforms>();
    check::<LayerUniforms>();
    check::<ShadowUniforms>();
}

#[test]
fn instance_is_exactly_one_matrix() {
    assert_eq!(InstanceUniforms::host_size(), 16 * std::mem::size_of::<f32>());
}

#[test]
fn padded_stride_rounds_to_offset_alignment() {
    // Typical `min_uniform_buffer_offset_alignment` is 256.
    assert_eq!(padded_stride::<FrameUniforms>(256), 256);
    assert_eq!(padded_stride::<ShadowUniforms>(256), 256);
    assert_eq!(padded_stride::<LayerUniforms>(16), 80);
    assert_eq!(padded_stride::<InstanceUniforms>(64), 64);
    assert_eq!(padded_stride::<FrameUniforms>(0), 192);
}

#[test]
fn frame_scenario_survives_copy_into_a_padded_ring() {
    let frame = FrameUniforms::new(
        glam::Mat4::IDENTITY,
        glam::Mat4::IDENTITY,
        glam::Vec3::splat(0.1),
        glam::Vec3::new(0.0, -1.0, 0.0),
        glam::Vec3::ONE,
        32.0,
        0.0,
    );

    let stride = padded_stride::<FrameUniforms>(256) as usize;
    let mut ring = vec![0xAAu8; 3 * stride];
    for copy in 0..3 {
        let offset = copy * stride;
        ring[offset..offset + 192].copy_from_slice(bytemuck::bytes_of(&frame.with_time(copy as f32)));
    }

    for copy in 0..3 {
        let offset = copy * stride;
        let back: FrameUniforms = bytemuck::pod_read_unaligned(&ring[offset..offset + 192]);
        assert_eq!(back.material_shininess, 32.0);
        assert_eq!(back.time, copy as f32);
        // Bytes between copies are untouched.
        assert!(ring[offset + 192..offset + stride].iter().all(|&b| b == 0xAA));
    }
}
