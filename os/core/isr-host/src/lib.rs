//! # Host scheduling collaborator
//!
//! The scenario needs exactly three things from whatever runs it:
//!
//! * pinning execution to one logical CPU,
//! * reading and setting the current thread's scheduling priority, and
//! * creating threads that start at a chosen priority.
//!
//! [`SchedulerHost`] is that seam. [`LinuxHost`] implements it with
//! `sched_setaffinity` and `pthread_setschedparam`; [`InertHost`] refuses
//! every request, which keeps the scenario runnable (with reduced fidelity)
//! where neither is available.
//!
//! Refusals surface as [`ConfigurationDegraded`]. They are never fatal.

#![allow(unsafe_code)]

mod error;
mod inert;
#[cfg(target_os = "linux")]
mod linux;
mod priority;

pub use error::ConfigurationDegraded;
pub use inert::InertHost;
#[cfg(target_os = "linux")]
pub use linux::LinuxHost;
pub use priority::Priority;

use isr_sync::ExecutionContextIdentity;
use std::io;
use std::thread::{self, JoinHandle};

/// The host on this target.
#[cfg(target_os = "linux")]
pub type NativeHost = LinuxHost;

/// The host on this target.
#[cfg(not(target_os = "linux"))]
pub type NativeHost = InertHost;

/// Scheduling capabilities a host environment must supply.
pub trait SchedulerHost: Clone + Send + Sync + 'static {
    /// Restricts the calling thread to `cpu`. Threads it creates afterwards inherit the mask.
    ///
    /// # Errors
    /// [`ConfigurationDegraded`] if the host refuses or cannot express the request.
    fn pin_current_to(&self, cpu: usize) -> Result<(), ConfigurationDegraded>;

    /// Moves the calling thread to `priority`.
    ///
    /// # Errors
    /// [`ConfigurationDegraded`] if the host refuses or cannot express the request.
    fn set_current_priority(&self, priority: Priority) -> Result<(), ConfigurationDegraded>;

    /// Identity of the calling execution context.
    fn current_context(&self) -> ExecutionContextIdentity {
        ExecutionContextIdentity::current()
    }

    /// Starts a named thread that first moves itself to `priority`.
    ///
    /// The body receives the outcome of that priority change so it can
    /// report a degradation from inside the new context.
    ///
    /// # Errors
    /// Fails only if the thread itself cannot be created.
    fn spawn_prioritized<F, T>(
        &self,
        name: &str,
        priority: Priority,
        body: F,
    ) -> io::Result<JoinHandle<T>>
    where
        F: FnOnce(Result<(), ConfigurationDegraded>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let host = self.clone();
        thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let applied = host.set_current_priority(priority);
                body(applied)
            })
    }
}
