use std::time::Duration;

use bytemuck::Pod;

use super::{FrameFence, RingConfig, RingError};

struct RingEntry<T> {
    record: T,
    /// Completion of the last frame that read this copy.
    fence: FrameFence,
}

/// N copies of a per-frame record, handed out round-robin.
///
/// `acquire` returns the next copy once the device has released it. The
/// caller fills the copy and calls [`FrameSlot::submit`], which marks it in
/// flight and returns the fence the device-completion callback must signal.
/// Dropping a `FrameSlot` without submitting drops the frame: the copy stays
/// free and the cursor does not move.
pub struct FrameRing<T> {
    entries: Vec<RingEntry<T>>,
    next: usize,
    budget: Duration,
    submitted: u64,
}

impl<T: Copy> FrameRing<T> {
    /// Creates a ring with every copy initialised to `initial`.
    pub fn with_initial(config: &RingConfig, initial: T) -> Result<Self, RingError> {
        config.validate()?;
        let entries = (0..config.frames_in_flight)
            .map(|_| RingEntry {
                record: initial,
                fence: FrameFence::signaled(),
            })
            .collect();

        log::debug!(
            "frame ring: {} copies, {:.2} ms budget",
            config.frames_in_flight,
            config.frame_budget.as_secs_f64() * 1000.0
        );

        Ok(Self {
            entries,
            next: 0,
            budget: config.frame_budget,
            submitted: 0,
        })
    }

    /// Number of copies.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a valid config has at least one copy.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the copy the next `acquire` hands out.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Frames submitted through this ring.
    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Number of copies the device has not released yet.
    pub fn in_flight(&self) -> usize {
        self.entries.iter().filter(|e| !e.fence.is_signaled()).count()
    }

    /// Hands out the next copy, waiting at most one frame budget for the
    /// device to release it.
    pub fn acquire(&mut self) -> Result<FrameSlot<'_, T>, RingError> {
        let index = self.next;
        self.entries[index].fence.wait_released(index, self.budget)?;

        Ok(FrameSlot { ring: self, index })
    }

    /// Record stored in copy `index` (last value written there).
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.record)
    }
}

impl<T: Copy + Default> FrameRing<T> {
    pub fn new(config: &RingConfig) -> Result<Self, RingError> {
        Self::with_initial(config, T::default())
    }
}

/// One acquired ring copy, writable until submitted.
pub struct FrameSlot<'a, T> {
    ring: &'a mut FrameRing<T>,
    index: usize,
}

impl<T: Copy> FrameSlot<'_, T> {
    /// Position of this copy in the ring (multiply by the stride for a
    /// dynamic offset).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn record(&self) -> &T {
        &self.ring.entries[self.index].record
    }

    #[inline]
    pub fn record_mut(&mut self) -> &mut T {
        &mut self.ring.entries[self.index].record
    }

    /// Overwrites the whole copy.
    #[inline]
    pub fn write(&mut self, record: T) {
        *self.record_mut() = record;
    }

    /// Bytes to upload for this copy.
    #[inline]
    pub fn bytes(&self) -> &[u8]
    where
        T: Pod,
    {
        bytemuck::bytes_of(self.record())
    }

    /// Marks the copy in flight and advances the ring.
    ///
    /// The returned fence must be signalled once the device has finished the
    /// frame that reads this copy. Every submission gets a fresh fence, so a
    /// late signal for an older frame cannot release the copy early.
    pub fn submit(self) -> FrameFence {
        let fence = FrameFence::pending();
        let ring = self.ring;

        ring.entries[self.index].fence = fence.clone();
        ring.next = (self.index + 1) % ring.entries.len();
        ring.submitted += 1;

        fence
    }
}
