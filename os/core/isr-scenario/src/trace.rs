//! # Lifecycle trace
//!
//! Every event is written twice: as a log line (target `driver`, `app` or
//! `isr`) for humans, and as a [`TraceRecord`] for analysis. Records are
//! stamped from one atomic counter, so sorting by [`TraceRecord::seq`]
//! recovers a single global order, and they travel over an unbounded
//! channel so emitting never blocks the interrupt-like context.

use crate::PacketId;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use isr_sync::WaitPolicy;
use log::{info, warn};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// The execution context an event belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Context {
    Driver,
    Application,
    Interrupt,
}

impl Context {
    /// Log target used for this context's lines.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Application => "app",
            Self::Interrupt => "isr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    ConfigurationDegraded { capability: &'static str },
    TaskStarted,
    ProcessingStarted { hold: Duration },
    PacketProcessed { cycle: u64 },
    InterruptRaised { packet: PacketId },
    AcquireAttempt { packet: PacketId, policy: WaitPolicy },
    BufferUpdated { packet: PacketId, retries: u64, waited: Duration },
    SimulationSurvived { events: u32 },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationDegraded { capability } => write!(
                f,
                "WARNING: failed to set {capability}; the inversion may not reproduce"
            ),
            Self::TaskStarted => f.write_str("Thread started (low priority). Waiting for data..."),
            Self::ProcessingStarted { hold } => {
                write!(f, "Processing packet... (busy for {} ms)", hold.as_millis())
            }
            Self::PacketProcessed { cycle } => {
                write!(f, "Packet processed. Buffer unlocked. (cycle {cycle})")
            }
            Self::InterruptRaised { packet } => {
                write!(f, "HARDWARE INTERRUPT! Packet #{packet} arrived.")
            }
            Self::AcquireAttempt { policy, .. } => {
                write!(f, "Attempting to acquire buffer lock ({policy})...")
            }
            Self::BufferUpdated {
                retries, waited, ..
            } => write!(
                f,
                "Lock acquired after {retries} retries ({waited:?}). Updating buffer pointers."
            ),
            Self::SimulationSurvived { events } => {
                write!(f, "--- SIMULATION SURVIVED ({events} events) ---")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// Global emission order.
    pub seq: u64,
    /// Time since the trace was opened.
    pub at: Duration,
    pub context: Context,
    pub event: TraceEvent,
}

/// Creates a connected sink/log pair.
#[must_use]
pub fn channel() -> (TraceSink, TraceLog) {
    let (tx, rx) = mpsc::channel();
    let sink = TraceSink {
        origin: Instant::now(),
        seq: Arc::new(AtomicU64::new(0)),
        tx,
    };
    (sink, TraceLog { rx })
}

/// Emitting half; cheap to clone into each context.
#[derive(Debug, Clone)]
pub struct TraceSink {
    origin: Instant,
    seq: Arc<AtomicU64>,
    tx: Sender<TraceRecord>,
}

impl TraceSink {
    /// Reserves the next position in the global order, timestamped now.
    #[must_use]
    pub fn stamp(&self) -> Stamp {
        Stamp {
            seq: self.seq.fetch_add(1, Ordering::AcqRel),
            at: self.origin.elapsed(),
        }
    }

    pub fn emit(&self, context: Context, event: TraceEvent) {
        self.emit_stamped(self.stamp(), context, event);
    }

    /// Emits `event` at a position reserved earlier with [`stamp`](Self::stamp).
    pub fn emit_stamped(&self, stamp: Stamp, context: Context, event: TraceEvent) {
        match &event {
            TraceEvent::ConfigurationDegraded { .. } => warn!(target: context.target(), "{event}"),
            _ => info!(target: context.target(), "{event}"),
        }

        // The log may already be gone once the driver has reported.
        let _ = self.tx.send(TraceRecord {
            seq: stamp.seq,
            at: stamp.at,
            context,
            event,
        });
    }
}

/// A reserved trace position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Stamp {
    seq: u64,
    at: Duration,
}

/// Receiving half, owned by the driver.
#[derive(Debug)]
pub struct TraceLog {
    rx: Receiver<TraceRecord>,
}

impl TraceLog {
    /// Everything emitted so far, in global order.
    pub fn drain(&mut self) -> Vec<TraceRecord> {
        let mut records: Vec<_> = self.rx.try_iter().collect();
        records.sort_unstable_by_key(|r| r.seq);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn records_from_several_contexts_come_back_in_emission_order() {
        let (sink, mut log) = channel();
        sink.emit(Context::Driver, TraceEvent::InterruptRaised { packet: 1 });

        let app = sink.clone();
        thread::spawn(move || app.emit(Context::Application, TraceEvent::TaskStarted))
            .join()
            .unwrap();

        sink.emit(Context::Interrupt, TraceEvent::InterruptRaised { packet: 2 });

        let records = log.drain();
        let seqs: Vec<_> = records.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, [0, 1, 2]);
        assert_eq!(records[1].context, Context::Application);
        assert!(records[0].at <= records[2].at);
        assert!(log.drain().is_empty());
    }

    #[test]
    fn a_stamp_keeps_its_place_ahead_of_later_events() {
        let (sink, mut log) = channel();
        let released = sink.stamp();
        sink.emit(Context::Interrupt, TraceEvent::InterruptRaised { packet: 1 });
        sink.emit_stamped(released, Context::Application, TraceEvent::PacketProcessed { cycle: 1 });

        let records = log.drain();
        assert_eq!(records[0].event, TraceEvent::PacketProcessed { cycle: 1 });
        assert_eq!(records[1].event, TraceEvent::InterruptRaised { packet: 1 });
        assert!(records[0].at <= records[1].at);
    }

    #[test]
    fn messages_read_like_a_console_trace() {
        let spin = TraceEvent::AcquireAttempt {
            packet: 3,
            policy: WaitPolicy::SpinForever,
        };
        assert_eq!(spin.to_string(), "Attempting to acquire buffer lock (spinning)...");
        assert_eq!(
            TraceEvent::InterruptRaised { packet: 3 }.to_string(),
            "HARDWARE INTERRUPT! Packet #3 arrived."
        );
    }
}
