use crate::ScenarioConfig;
use crate::analysis::{self, TraceSummary};
use crate::trace::TraceRecord;
use core::fmt;
use isr_host::ConfigurationDegraded;

/// Outcome of one scenario run.
#[derive(Debug)]
pub struct ScenarioReport {
    pub config: ScenarioConfig,
    /// Refusals seen by the driver itself. The task's own refusal, if any,
    /// only shows up in [`TraceSummary::degradations`].
    pub degraded: Vec<ConfigurationDegraded>,
    pub summary: TraceSummary,
    pub records: Vec<TraceRecord>,
}

impl ScenarioReport {
    #[must_use]
    pub fn new(
        config: ScenarioConfig,
        degraded: Vec<ConfigurationDegraded>,
        records: Vec<TraceRecord>,
    ) -> Self {
        let summary = analysis::analyze(&records);
        Self {
            config,
            degraded,
            summary,
            records,
        }
    }

    /// Every producer event acquired and released the lock.
    #[must_use]
    pub fn all_events_delivered(&self) -> bool {
        self.summary.interrupts_completed == self.config.events
    }

    #[must_use]
    pub fn inversion_observed(&self) -> bool {
        self.summary.inversion_observed()
    }

    /// An interrupt spun for at least a whole event interval.
    #[must_use]
    pub fn sustained_spin(&self) -> bool {
        self.summary.sustained_spin(self.config.packet_interval)
    }

    /// Forcing conditions were requested and nobody refused them.
    #[must_use]
    pub fn fully_forced(&self) -> bool {
        self.config.forcing_conditions().all() && self.summary.degradations.is_empty()
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(
            f,
            "events delivered  : {}/{}",
            s.interrupts_completed, self.config.events
        )?;
        writeln!(f, "app cycles        : {}", s.app_cycles)?;
        writeln!(
            f,
            "contended events  : {} (max ISR wait {:?})",
            s.contended_interrupts, s.max_isr_wait
        )?;

        write!(f, "starved intervals :")?;
        if s.starved.is_empty() {
            write!(f, " none")?;
        }
        for interval in &s.starved {
            write!(
                f,
                " #{}->#{}{}",
                interval.from,
                interval.to,
                if interval.contended { " (spun)" } else { "" }
            )?;
        }
        writeln!(f)?;

        write!(f, "degraded          :")?;
        if s.degradations.is_empty() {
            write!(f, " none")?;
        }
        for (context, capability) in &s.degradations {
            write!(f, " {}/{capability}", context.target())?;
        }
        writeln!(f)?;

        let verdict = if self.inversion_observed() {
            "priority inversion observed"
        } else {
            "no inversion observed"
        };
        write!(f, "verdict           : {verdict}")
    }
}
