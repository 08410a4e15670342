//! # Priority inversion scenario
//!
//! Reproduces an interrupt spinning on a lock held by a starved,
//! low-priority task, all on one core.
//!
//! ```text
//! ScenarioDriver (pinned, time-critical, designated interrupt)
//!     │ spawns                         │ raises 1..=N
//!     ▼                                ▼
//! ApplicationTask (lowest)      InterruptProducer
//!     │ acquire(Forever) → yield       │ acquire(Forever) → spin
//!     └──────────────► ContextLock ◄───┘
//! ```
//!
//! The run produces a [`ScenarioReport`] built from the lifecycle
//! [`trace`]; [`analysis`] decides whether the inversion showed up.
//!
//! Reproduction is probabilistic. With a single pinned core, the producer
//! above the task, a hold time at least as long as the event interval and
//! two or more events, most runs show at least one starved, spun-on
//! interval. Without those, the lock behaves like any correct spin lock.

pub mod analysis;
mod buffer;
mod config;
mod driver;
mod producer;
mod report;
mod task;
pub mod trace;

pub use buffer::PacketBuffer;
pub use config::{ForcingConditions, ScenarioConfig, ScenarioConfigError};
pub use driver::{ScenarioDriver, ScenarioError, ScenarioOutcome};
pub use producer::InterruptProducer;
pub use report::ScenarioReport;
pub use task::{ApplicationTask, TaskHandle, busy_wait};

/// Synthetic packet identifier, `1..=N`.
pub type PacketId = u32;
