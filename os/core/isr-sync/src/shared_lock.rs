use crate::relax::{Relax, SleepRelax};
use crate::WaitPolicy;
use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A binary ownership flag with two acquire policies.
///
/// The lock records neither an owner nor a recursion depth. Whoever calls
/// [`SharedLock::release`] frees it, holder or not.
pub struct SharedLock<R = SleepRelax> {
    /// lock state
    /// * `false`: free
    /// * `true`: held
    held: AtomicBool,
    relax: R,
}

impl Default for SharedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedLock {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_relax(SleepRelax::QUANTUM)
    }
}

impl<R> SharedLock<R> {
    #[must_use]
    pub const fn with_relax(relax: R) -> Self {
        Self {
            held: AtomicBool::new(false),
            relax,
        }
    }

    /// The strategy used between attempts of the yielding path.
    #[inline]
    #[must_use]
    pub const fn relax(&self) -> &R {
        &self.relax
    }

    /// Relaxed snapshot of the flag. Stale by the time the caller looks at it.
    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }

    /// Try once; returns immediately.
    #[inline]
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Unconditionally marks the lock free.
    ///
    /// There is no ownership check: a context that never acquired the lock
    /// can release it out from under the holder.
    #[inline]
    pub fn release(&self) {
        // Release publishes the critical section.
        self.held.store(false, Ordering::Release);
    }
}

impl<R: Relax> SharedLock<R> {
    /// Blocks until the flag flips from free to held. Never fails.
    pub fn acquire(&self, policy: WaitPolicy) -> Acquisition {
        let start = Instant::now();
        let retries = match policy {
            WaitPolicy::SpinForever => self.spin_forever(),
            WaitPolicy::YieldWhileWaiting => self.yield_while_waiting(),
        };
        Acquisition {
            policy,
            retries,
            waited: start.elapsed(),
        }
    }

    /// Non-yielding hot loop (TATAS). Nothing in here gives up the processor.
    fn spin_forever(&self) -> u64 {
        let mut retries = 0;
        while !self.try_acquire() {
            retries += 1;
            // spin on a read (cheap), then retry CAS
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
        retries
    }

    fn yield_while_waiting(&self) -> u64 {
        let mut retries = 0;
        while !self.try_acquire() {
            retries += 1;
            self.relax.relax();
        }
        retries
    }
}

/// Proof of a successful acquire, carrying how hard it was to get.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub policy: WaitPolicy,
    /// Failed compare-and-set rounds before success.
    pub retries: u64,
    pub waited: Duration,
}

impl Acquisition {
    #[inline]
    #[must_use]
    pub const fn was_contended(&self) -> bool {
        self.retries > 0
    }
}
