use std::marker::PhantomData;

use parallax_abi::{padded_stride, BufferSlot, GpuRecord, VerifiedContract};

use crate::ring::{BatchRing, RingConfig, RingError};

use super::bindings::min_binding_size;

/// Per-draw uniform records for every frame in flight, in one wgpu buffer.
///
/// Each frame gets its own region of `records_per_frame` records; records
/// sit at a stride padded to the device's dynamic-offset alignment. Bind the
/// buffer once with [`bind_group_entry`](Self::bind_group_entry) and select a
/// record per draw with the offset returned by [`write`](Self::write). Call
/// [`submitted`](Self::submitted) after `queue.submit` to hand the frame's
/// region back once the device is done with it.
pub struct UniformRing<T> {
    label: &'static str,
    buffer: wgpu::Buffer,
    batches: BatchRing,
    _record: PhantomData<T>,
}

impl<T: GpuRecord> UniformRing<T> {
    pub fn new(
        device: &wgpu::Device,
        _contract: &VerifiedContract,
        config: &RingConfig,
        records_per_frame: usize,
        label: &'static str,
    ) -> Result<Self, RingError> {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let batches = BatchRing::new(config, records_per_frame, padded_stride::<T>(alignment))?;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: batches.byte_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!(
            "{label}: {} frames x {} {} records, stride {}",
            batches.frames_in_flight(),
            batches.capacity(),
            T::DEVICE_NAME,
            batches.stride()
        );

        Ok(Self {
            label,
            buffer,
            batches,
            _record: PhantomData,
        })
    }

    /// Uploads `record` for the next draw of the current frame and returns its
    /// dynamic offset.
    ///
    /// The first write of a frame waits up to one budget for that frame's
    /// region; on [`RingError::Stalled`] nothing is written and the frame
    /// should be skipped.
    pub fn write(&mut self, queue: &wgpu::Queue, record: &T) -> Result<u32, RingError> {
        let offset = self.batches.allocate()?;
        queue.write_buffer(&self.buffer, offset, bytemuck::bytes_of(record));
        Ok(offset as u32)
    }

    /// Closes the current frame and signals its region free once the work
    /// submitted so far completes. Call right after `queue.submit`.
    pub fn submitted(&mut self, queue: &wgpu::Queue) {
        if let Some(fence) = self.batches.end_frame() {
            queue.on_submitted_work_done(move || fence.signal());
        }
    }

    /// Discards the current frame's records without submitting them.
    pub fn skip_frame(&mut self) {
        self.batches.abandon_frame();
    }

    /// Bind group entry for this ring at `slot`, sized to one record.
    pub fn bind_group_entry(&self, slot: BufferSlot) -> wgpu::BindGroupEntry<'_> {
        debug_assert!(slot.is_uniform(), "{}: {} is not a uniform slot", self.label, slot.label());
        wgpu::BindGroupEntry {
            binding: slot.index(),
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &self.buffer,
                offset: 0,
                size: min_binding_size::<T>(),
            }),
        }
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn batches(&self) -> &BatchRing {
        &self.batches
    }
}
