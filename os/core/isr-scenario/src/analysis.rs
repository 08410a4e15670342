//! # Starvation analysis
//!
//! The task is *starved* across two consecutive interrupts when it does not
//! complete a full cycle (start processing, then release) strictly between
//! them. A starved interval whose first interrupt had to spin for the lock
//! is the signature of the inversion: the producer burned the core waiting
//! on a holder that could not run.

use crate::PacketId;
use crate::trace::{Context, TraceEvent, TraceRecord};
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StarvedInterval {
    pub from: PacketId,
    pub to: PacketId,
    /// The interrupt for `from` found the lock held.
    pub contended: bool,
    /// How long that interrupt waited for the lock.
    pub isr_wait: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSummary {
    pub task_started: bool,
    pub interrupts_raised: u32,
    pub interrupts_completed: u32,
    pub contended_interrupts: u32,
    pub max_isr_wait: Duration,
    pub app_cycles: u64,
    pub starved: Vec<StarvedInterval>,
    pub degradations: Vec<(Context, &'static str)>,
    pub survived: bool,
}

impl TraceSummary {
    #[must_use]
    pub fn inversion_observed(&self) -> bool {
        self.starved.iter().any(|s| s.contended)
    }

    /// Some interrupt waited at least `threshold` for the lock.
    #[must_use]
    pub fn sustained_spin(&self, threshold: Duration) -> bool {
        self.max_isr_wait >= threshold
    }
}

/// Per-interrupt bookkeeping while walking the trace.
struct Window {
    packet: PacketId,
    contended: bool,
    isr_wait: Duration,
    processing_started: bool,
    full_cycles: u32,
}

impl Window {
    const fn new(packet: PacketId) -> Self {
        Self {
            packet,
            contended: false,
            isr_wait: Duration::ZERO,
            processing_started: false,
            full_cycles: 0,
        }
    }
}

/// Walks `records` (in global order) and summarizes them.
///
/// A cycle counts as progress by the position of its `PacketProcessed`
/// record, which the task reserves right after releasing the lock. A task
/// preempted between the release and that reservation still lands after the
/// next interrupt, so a starved interval can be reported for a cycle that
/// completed just in time.
#[must_use]
pub fn analyze(records: &[TraceRecord]) -> TraceSummary {
    let mut summary = TraceSummary::default();
    let mut window: Option<Window> = None;

    for record in records {
        match record.event {
            TraceEvent::ConfigurationDegraded { capability } => {
                summary.degradations.push((record.context, capability));
            }
            TraceEvent::TaskStarted => summary.task_started = true,
            TraceEvent::ProcessingStarted { .. } => {
                if let Some(w) = window.as_mut() {
                    w.processing_started = true;
                }
            }
            TraceEvent::PacketProcessed { .. } => {
                summary.app_cycles += 1;
                if let Some(w) = window.as_mut()
                    && w.processing_started
                {
                    w.full_cycles += 1;
                    w.processing_started = false;
                }
            }
            TraceEvent::InterruptRaised { packet } => {
                summary.interrupts_raised += 1;
                if let Some(prev) = window.take()
                    && prev.full_cycles == 0
                {
                    summary.starved.push(StarvedInterval {
                        from: prev.packet,
                        to: packet,
                        contended: prev.contended,
                        isr_wait: prev.isr_wait,
                    });
                }
                window = Some(Window::new(packet));
            }
            TraceEvent::AcquireAttempt { .. } => {}
            TraceEvent::BufferUpdated {
                packet,
                retries,
                waited,
            } => {
                summary.interrupts_completed += 1;
                if retries > 0 {
                    summary.contended_interrupts += 1;
                }
                summary.max_isr_wait = summary.max_isr_wait.max(waited);
                if let Some(w) = window.as_mut()
                    && w.packet == packet
                {
                    w.contended = retries > 0;
                    w.isr_wait = waited;
                }
            }
            TraceEvent::SimulationSurvived { .. } => summary.survived = true,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use isr_sync::WaitPolicy;

    fn build(events: Vec<(Context, TraceEvent)>) -> Vec<TraceRecord> {
        events
            .into_iter()
            .zip(0u64..)
            .map(|((context, event), seq)| TraceRecord {
                seq,
                at: Duration::from_millis(seq),
                context,
                event,
            })
            .collect()
    }

    fn interrupt(packet: PacketId, retries: u64, waited_ms: u64) -> [(Context, TraceEvent); 3] {
        [
            (Context::Interrupt, TraceEvent::InterruptRaised { packet }),
            (
                Context::Interrupt,
                TraceEvent::AcquireAttempt {
                    packet,
                    policy: WaitPolicy::SpinForever,
                },
            ),
            (
                Context::Interrupt,
                TraceEvent::BufferUpdated {
                    packet,
                    retries,
                    waited: Duration::from_millis(waited_ms),
                },
            ),
        ]
    }

    fn app_cycle(cycle: u64) -> [(Context, TraceEvent); 2] {
        [
            (
                Context::Application,
                TraceEvent::ProcessingStarted {
                    hold: Duration::from_millis(20),
                },
            ),
            (Context::Application, TraceEvent::PacketProcessed { cycle }),
        ]
    }

    #[test]
    fn spinning_interrupt_with_no_app_progress_is_an_inversion() {
        let mut events = vec![(Context::Application, TraceEvent::TaskStarted)];
        events.push(app_cycle(1)[0].clone()); // task holds the lock
        events.extend(interrupt(1, 900, 18));
        events.push(app_cycle(1)[1].clone()); // released only after the spin
        events.extend(interrupt(2, 0, 0));
        events.extend(app_cycle(2));
        events.extend(interrupt(3, 0, 0));

        let s = analyze(&build(events));
        assert!(s.task_started);
        assert_eq!(s.interrupts_raised, 3);
        assert_eq!(s.interrupts_completed, 3);
        assert_eq!(s.contended_interrupts, 1);
        assert_eq!(s.max_isr_wait, Duration::from_millis(18));
        assert_eq!(s.app_cycles, 2);
        assert_eq!(
            s.starved,
            [StarvedInterval {
                from: 1,
                to: 2,
                contended: true,
                isr_wait: Duration::from_millis(18),
            }]
        );
        assert!(s.inversion_observed());
        assert!(s.sustained_spin(Duration::from_millis(5)));
    }

    #[test]
    fn app_cycles_between_every_interrupt_mean_no_starvation() {
        let mut events = vec![(Context::Application, TraceEvent::TaskStarted)];
        for packet in 1..=3 {
            events.extend(interrupt(packet, 0, 0));
            events.extend(app_cycle(u64::from(packet)));
        }
        events.push((Context::Driver, TraceEvent::SimulationSurvived { events: 3 }));

        let s = analyze(&build(events));
        assert!(s.starved.is_empty());
        assert!(!s.inversion_observed());
        assert!(!s.sustained_spin(Duration::from_millis(1)));
        assert!(s.survived);
    }

    #[test]
    fn uncontended_starvation_is_not_an_inversion() {
        let mut events = Vec::new();
        events.extend(interrupt(1, 0, 0));
        events.extend(interrupt(2, 0, 0));

        let s = analyze(&build(events));
        assert_eq!(s.starved.len(), 1);
        assert!(!s.starved[0].contended);
        assert!(!s.inversion_observed());
    }

    #[test]
    fn a_cycle_started_before_the_interrupt_does_not_count_as_progress() {
        let mut events = vec![app_cycle(1)[0].clone()];
        events.extend(interrupt(1, 0, 0));
        events.push(app_cycle(1)[1].clone());
        events.extend(interrupt(2, 0, 0));

        let s = analyze(&build(events));
        assert_eq!(s.app_cycles, 1);
        assert_eq!(s.starved.len(), 1, "only a full cycle between events is progress");
    }

    #[test]
    fn degradations_are_collected_per_context() {
        let events = vec![
            (
                Context::Driver,
                TraceEvent::ConfigurationDegraded {
                    capability: "affinity",
                },
            ),
            (
                Context::Application,
                TraceEvent::ConfigurationDegraded {
                    capability: "priority",
                },
            ),
        ];
        let s = analyze(&build(events));
        assert_eq!(
            s.degradations,
            [
                (Context::Driver, "affinity"),
                (Context::Application, "priority")
            ]
        );
    }
}
