//! # Context-sensitive lock primitives
//!
//! A deliberately naive lock in the style of small RTOS ports: one atomic
//! flag, no owner, no priority inheritance, and an acquire path whose waiting
//! behavior depends on which execution context is calling.
//!
//! * [`SharedLock`] is the flag with its two wait loops.
//! * [`ContextClassifier`] picks the loop from the caller's identity.
//! * [`ContextLock`] puts the two together.

mod context;
mod context_lock;
pub mod relax;
mod shared_lock;

pub use context::{
    AlreadyDesignated, ContextClassifier, ExecutionContextIdentity, WaitOption, WaitPolicy,
};
pub use context_lock::ContextLock;
pub use relax::{Relax, SleepRelax, YieldRelax};
pub use shared_lock::{Acquisition, SharedLock};
