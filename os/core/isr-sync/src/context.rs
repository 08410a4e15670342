//! # Execution context classification
//!
//! Decides, per acquire call, whether the caller waits like an interrupt
//! (spin, never give up the core) or like a task (yield between attempts).
//! The decision depends only on *who* is asking and *how long* it is willing
//! to wait, never on the state of the lock.

use core::fmt;
use std::sync::OnceLock;
use std::thread::{self, ThreadId};

/// Identity of an execution context (an OS thread on hosted targets).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionContextIdentity(ThreadId);

impl ExecutionContextIdentity {
    /// Identity of the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self(thread::current().id())
    }
}

/// RTOS-style wait argument of an acquire call.
///
/// Timeouts are not modeled. Every option waits until the lock is taken;
/// the option only feeds the classifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WaitOption {
    NoWait,
    Ticks(u32),
    Forever,
}

impl WaitOption {
    /// Raw encoding of [`WaitOption::NoWait`].
    pub const NO_WAIT: u32 = 0;
    /// Raw encoding of [`WaitOption::Forever`].
    pub const WAIT_FOREVER: u32 = 0xFFFF_FFFF;

    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Forever)
    }
}

impl From<u32> for WaitOption {
    fn from(raw: u32) -> Self {
        match raw {
            Self::NO_WAIT => Self::NoWait,
            Self::WAIT_FOREVER => Self::Forever,
            ticks => Self::Ticks(ticks),
        }
    }
}

impl From<WaitOption> for u32 {
    fn from(option: WaitOption) -> Self {
        match option {
            WaitOption::NoWait => WaitOption::NO_WAIT,
            WaitOption::Ticks(ticks) => ticks,
            WaitOption::Forever => WaitOption::WAIT_FOREVER,
        }
    }
}

/// How an acquire call waits while the lock is held.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WaitPolicy {
    /// Busy-poll; the processor is never voluntarily released.
    SpinForever,
    /// Poll, relinquishing the processor between attempts.
    YieldWhileWaiting,
}

impl fmt::Display for WaitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpinForever => f.write_str("spinning"),
            Self::YieldWhileWaiting => f.write_str("yielding"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("an interrupt-like context is already designated ({existing:?})")]
pub struct AlreadyDesignated {
    pub existing: ExecutionContextIdentity,
}

/// Maps `(caller, wait option)` to a [`WaitPolicy`].
#[derive(Default)]
pub struct ContextClassifier {
    interrupt: OnceLock<ExecutionContextIdentity>,
}

impl ContextClassifier {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interrupt: OnceLock::new(),
        }
    }

    /// A classifier whose interrupt-like context is fixed from the start.
    #[must_use]
    pub fn with_interrupt(identity: ExecutionContextIdentity) -> Self {
        Self {
            interrupt: OnceLock::from(identity),
        }
    }

    /// Records the interrupt-like context. Must happen before contention starts.
    ///
    /// # Errors
    /// Returns [`AlreadyDesignated`] on any call after the first.
    pub fn designate(&self, identity: ExecutionContextIdentity) -> Result<(), AlreadyDesignated> {
        // A concurrent designation blocks here until the winner is visible.
        let mut won = false;
        let existing = *self.interrupt.get_or_init(|| {
            won = true;
            identity
        });
        if won {
            Ok(())
        } else {
            Err(AlreadyDesignated { existing })
        }
    }

    #[must_use]
    pub fn interrupt_context(&self) -> Option<ExecutionContextIdentity> {
        self.interrupt.get().copied()
    }

    /// `SpinForever` iff `caller` is the designated interrupt context and asked
    /// to wait forever. Everything else yields.
    #[must_use]
    pub fn classify(&self, caller: ExecutionContextIdentity, wait: WaitOption) -> WaitPolicy {
        match self.interrupt.get() {
            Some(interrupt) if *interrupt == caller && wait.is_unbounded() => {
                WaitPolicy::SpinForever
            }
            _ => WaitPolicy::YieldWhileWaiting,
        }
    }

    /// [`classify`](Self::classify) for the calling thread.
    #[must_use]
    pub fn classify_current(&self, wait: WaitOption) -> WaitPolicy {
        self.classify(ExecutionContextIdentity::current(), wait)
    }
}
