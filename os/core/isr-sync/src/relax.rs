use std::thread;
use std::time::Duration;

/// How a waiting context gives the processor back between acquire attempts.
pub trait Relax {
    fn relax(&self);
}

/// Sleeps for a short quantum, letting lower-priority work on the same core run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SleepRelax(pub Duration);

impl SleepRelax {
    /// One millisecond, roughly one scheduler tick on most hosts.
    pub const QUANTUM: Self = Self(Duration::from_millis(1));
}

impl Default for SleepRelax {
    fn default() -> Self {
        Self::QUANTUM
    }
}

impl Relax for SleepRelax {
    #[inline]
    fn relax(&self) {
        thread::sleep(self.0);
    }
}

/// Gives up the rest of the time slice via `sched_yield`.
///
/// Only peers of equal priority get to run; a strictly lower-priority
/// holder may still be starved.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct YieldRelax;

impl Relax for YieldRelax {
    #[inline]
    fn relax(&self) {
        thread::yield_now();
    }
}

impl<R: Relax + ?Sized> Relax for &R {
    #[inline]
    fn relax(&self) {
        (**self).relax();
    }
}
