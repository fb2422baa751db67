use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use super::RingError;

#[derive(Debug, Default)]
struct FenceState {
    signaled: Mutex<bool>,
    cond: Condvar,
}

/// Completion signal for one submitted frame.
///
/// Clones share state. The device-completion callback holds one clone and
/// calls [`signal`](Self::signal); the ring holds another and waits on it.
#[derive(Debug, Clone)]
pub struct FrameFence {
    state: Arc<FenceState>,
}

impl FrameFence {
    /// A fence for work that has not completed yet.
    pub fn pending() -> Self {
        Self {
            state: Arc::new(FenceState::default()),
        }
    }

    /// A fence that is already complete (fresh ring copies).
    pub fn signaled() -> Self {
        let fence = Self::pending();
        fence.signal();
        fence
    }

    /// Marks the work complete and wakes every waiter. Idempotent.
    pub fn signal(&self) {
        let mut signaled = self.state.signaled.lock();
        *signaled = true;
        self.state.cond.notify_all();
    }

    #[inline]
    pub fn is_signaled(&self) -> bool {
        *self.state.signaled.lock()
    }

    /// Blocks until signalled or `timeout` passes. Returns whether the fence
    /// is signalled.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut signaled = self.state.signaled.lock();
        while !*signaled {
            if self.state.cond.wait_until(&mut signaled, deadline).timed_out() {
                break;
            }
        }
        *signaled
    }

    /// Waits up to `budget` for ring copy `slot` to be released.
    pub(crate) fn wait_released(&self, slot: usize, budget: Duration) -> Result<(), RingError> {
        if self.is_signaled() {
            return Ok(());
        }
        let start = Instant::now();
        if !self.wait_for(budget) {
            let waited = start.elapsed();
            log::warn!(
                "frame ring copy {slot} still in flight after {:.2} ms; dropping frame",
                waited.as_secs_f64() * 1000.0
            );
            return Err(RingError::Stalled { slot, waited });
        }
        log::trace!("frame ring copy {slot} released after {:?}", start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn signaled_fence_does_not_wait() {
        let fence = FrameFence::signaled();
        let start = Instant::now();
        assert!(fence.wait_for(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn pending_fence_times_out() {
        let fence = FrameFence::pending();
        assert!(!fence.wait_for(Duration::from_millis(5)));
        assert!(!fence.is_signaled());
    }

    #[test]
    fn signal_from_another_thread_wakes_waiter() {
        let fence = FrameFence::pending();
        let remote = fence.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(2));
            remote.signal();
        });
        assert!(fence.wait_for(Duration::from_secs(5)));
        handle.join().unwrap();
    }
}
