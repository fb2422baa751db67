use std::time::Duration;

use super::{FrameFence, RingConfig, RingError};

#[derive(Debug, Copy, Clone)]
struct OpenFrame {
    copy: usize,
    used: usize,
}

/// Offset bookkeeping for a buffer holding one batch of per-draw records per
/// frame in flight.
///
/// The buffer is laid out as `frames_in_flight` copies of `capacity` records
/// at `stride` bytes each. Within an open frame every [`allocate`] returns
/// the next record offset; the copy is only waited for when the frame opens,
/// and a single fence covers the whole frame once [`end_frame`] closes it.
///
/// [`allocate`]: Self::allocate
/// [`end_frame`]: Self::end_frame
#[derive(Debug)]
pub struct BatchRing {
    fences: Vec<FrameFence>,
    capacity: usize,
    stride: u64,
    budget: Duration,
    next: usize,
    open: Option<OpenFrame>,
    submitted: u64,
}

impl BatchRing {
    pub fn new(config: &RingConfig, capacity: usize, stride: u64) -> Result<Self, RingError> {
        config.validate()?;
        if capacity == 0 {
            return Err(RingError::InvalidConfig("records per frame must be at least 1"));
        }
        if stride == 0 {
            return Err(RingError::InvalidConfig("record stride must be non-zero"));
        }

        Ok(Self {
            fences: (0..config.frames_in_flight)
                .map(|_| FrameFence::signaled())
                .collect(),
            capacity,
            stride,
            budget: config.frame_budget,
            next: 0,
            open: None,
            submitted: 0,
        })
    }

    /// Records one frame may hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn stride(&self) -> u64 {
        self.stride
    }

    #[inline]
    pub fn frames_in_flight(&self) -> usize {
        self.fences.len()
    }

    /// Bytes the backing buffer needs.
    #[inline]
    pub fn byte_size(&self) -> u64 {
        self.stride * (self.capacity * self.fences.len()) as u64
    }

    /// Copy the open frame writes into, if a frame is open.
    #[inline]
    pub fn open_copy(&self) -> Option<usize> {
        self.open.map(|f| f.copy)
    }

    /// Records allocated in the open frame.
    #[inline]
    pub fn used(&self) -> usize {
        self.open.map_or(0, |f| f.used)
    }

    /// Frames closed through this ring.
    #[inline]
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    pub fn in_flight(&self) -> usize {
        self.fences.iter().filter(|f| !f.is_signaled()).count()
    }

    /// Opens the next frame, waiting at most one budget for its copy.
    /// Returns the copy index. A frame that is already open is kept.
    pub fn begin_frame(&mut self) -> Result<usize, RingError> {
        match self.open {
            Some(frame) => Ok(frame.copy),
            None => self.open_next().map(|frame| frame.copy),
        }
    }

    /// Reserves the next record in the open frame (opening one if needed) and
    /// returns its byte offset.
    pub fn allocate(&mut self) -> Result<u64, RingError> {
        let mut frame = match self.open {
            Some(frame) => frame,
            None => self.open_next()?,
        };

        if frame.used == self.capacity {
            log::warn!(
                "frame ring copy {} is full ({} records); rejecting draw",
                frame.copy,
                self.capacity
            );
            return Err(RingError::BatchFull {
                capacity: self.capacity,
            });
        }

        let offset = (frame.copy * self.capacity + frame.used) as u64 * self.stride;
        frame.used += 1;
        self.open = Some(frame);
        Ok(offset)
    }

    /// Closes the open frame and returns the fence the device-completion
    /// callback must signal. `None` if no frame is open.
    pub fn end_frame(&mut self) -> Option<FrameFence> {
        let frame = self.open.take()?;
        let fence = FrameFence::pending();

        self.fences[frame.copy] = fence.clone();
        self.next = (frame.copy + 1) % self.fences.len();
        self.submitted += 1;

        log::trace!("frame ring copy {} closed with {} records", frame.copy, frame.used);
        Some(fence)
    }

    /// Drops the open frame; its copy stays free and the cursor does not move.
    pub fn abandon_frame(&mut self) {
        self.open = None;
    }

    fn open_next(&mut self) -> Result<OpenFrame, RingError> {
        let copy = self.next;
        self.fences[copy].wait_released(copy, self.budget)?;

        let frame = OpenFrame { copy, used: 0 };
        self.open = Some(frame);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::ring::FrameAction;

    fn ring(frames: usize, budget_ms: u64, capacity: usize) -> BatchRing {
        let config = RingConfig {
            frames_in_flight: frames,
            frame_budget: Duration::from_millis(budget_ms),
        };
        BatchRing::new(&config, capacity, 256).unwrap()
    }

    #[test]
    fn one_frame_holds_more_draws_than_frames_in_flight() {
        let mut ring = ring(3, 16, 8);
        let start = Instant::now();
        let offsets: Vec<u64> = (0..5).map(|_| ring.allocate().unwrap()).collect();
        assert_eq!(offsets, [0, 256, 512, 768, 1024]);
        assert!(start.elapsed() < Duration::from_millis(500));

        assert!(ring.end_frame().is_some());
        assert_eq!(ring.submitted(), 1);
        assert_eq!(ring.in_flight(), 1);
    }

    #[test]
    fn frames_use_disjoint_copies() {
        let mut ring = ring(3, 16, 4);
        ring.allocate().unwrap();
        ring.end_frame().unwrap().signal();

        // Second frame starts at copy 1: 4 records * 256 bytes in.
        assert_eq!(ring.allocate().unwrap(), 1024);
        assert_eq!(ring.open_copy(), Some(1));
        assert_eq!(ring.byte_size(), 3 * 4 * 256);
    }

    #[test]
    fn full_frame_rejects_further_draws() {
        let mut ring = ring(2, 16, 2);
        ring.allocate().unwrap();
        ring.allocate().unwrap();
        let err = ring.allocate().unwrap_err();
        assert_eq!(err, RingError::BatchFull { capacity: 2 });
        assert_eq!(err.action(), FrameAction::SkipFrame);

        // The records already written still go out with the frame.
        assert_eq!(ring.used(), 2);
        assert!(ring.end_frame().is_some());
    }

    #[test]
    fn stalled_copy_drops_the_frame_until_released() {
        let mut ring = ring(1, 5, 4);
        ring.allocate().unwrap();
        let fence = ring.end_frame().unwrap();

        assert!(matches!(
            ring.allocate(),
            Err(RingError::Stalled { slot: 0, .. })
        ));
        assert_eq!(ring.open_copy(), None);

        fence.signal();
        assert_eq!(ring.allocate().unwrap(), 0);
    }

    #[test]
    fn abandoned_frame_keeps_its_copy() {
        let mut ring = ring(2, 16, 4);
        ring.allocate().unwrap();
        ring.abandon_frame();
        assert_eq!(ring.end_frame().map(|_| ()), None);
        assert_eq!(ring.begin_frame().unwrap(), 0);
        assert_eq!(ring.submitted(), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = RingConfig::default();
        assert!(matches!(
            BatchRing::new(&config, 0, 256),
            Err(RingError::InvalidConfig(_))
        ));
    }
}
