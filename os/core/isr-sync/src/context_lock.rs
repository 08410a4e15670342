use crate::relax::{Relax, SleepRelax};
use crate::{Acquisition, ContextClassifier, ExecutionContextIdentity, SharedLock, WaitOption};

/// A [`SharedLock`] whose wait policy is picked by the calling context.
///
/// `ContextLock` pairs the lock flag with a [`ContextClassifier`]. On every
/// [`acquire`](Self::acquire) it:
///
/// 1. identifies the calling thread and classifies it together with the
///    requested [`WaitOption`], then
/// 2. waits on the flag using the resulting [`WaitPolicy`](crate::WaitPolicy).
///
/// The designated interrupt-like context asking to wait forever spins on the
/// core; everybody else yields. Nothing here is priority-aware, so a
/// preempted low-priority holder stays preempted for as long as the spinner
/// keeps the core.
///
/// # Examples
///
/// ```
/// use isr_sync::{ContextLock, ExecutionContextIdentity, WaitOption, WaitPolicy};
///
/// let lock = ContextLock::new();
/// lock.designate_interrupt(ExecutionContextIdentity::current())
///     .expect("first designation");
///
/// let got = lock.acquire(WaitOption::Forever);
/// assert_eq!(got.policy, WaitPolicy::SpinForever);
/// lock.release();
/// ```
pub struct ContextLock<R = SleepRelax> {
    lock: SharedLock<R>,
    classifier: ContextClassifier,
}

impl Default for ContextLock {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextLock {
    #[must_use]
    pub const fn new() -> Self {
        Self::from_parts(SharedLock::new(), ContextClassifier::new())
    }
}

impl<R> ContextLock<R> {
    #[must_use]
    pub const fn from_parts(lock: SharedLock<R>, classifier: ContextClassifier) -> Self {
        Self { lock, classifier }
    }

    /// Records the interrupt-like context. See [`ContextClassifier::designate`].
    ///
    /// # Errors
    /// Fails if a context was already designated.
    pub fn designate_interrupt(
        &self,
        identity: ExecutionContextIdentity,
    ) -> Result<(), crate::AlreadyDesignated> {
        self.classifier.designate(identity)
    }

    #[inline]
    #[must_use]
    pub const fn classifier(&self) -> &ContextClassifier {
        &self.classifier
    }

    #[inline]
    #[must_use]
    pub const fn raw(&self) -> &SharedLock<R> {
        &self.lock
    }

    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.lock.is_held()
    }

    /// Unconditional release; see [`SharedLock::release`].
    #[inline]
    pub fn release(&self) {
        self.lock.release();
    }
}

impl<R: Relax> ContextLock<R> {
    /// Waits until the lock is taken, with the policy the caller's context dictates.
    #[inline]
    pub fn acquire(&self, wait: WaitOption) -> Acquisition {
        let policy = self.classifier.classify_current(wait);
        self.lock.acquire(policy)
    }
}
