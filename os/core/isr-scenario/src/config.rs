use std::time::Duration;

/// Parameters of one inversion scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Number of producer events (packets `1..=events`).
    pub events: u32,
    /// Delay between consecutive producer events.
    pub packet_interval: Duration,
    /// How long the task busy-holds the lock per cycle.
    pub processing_time: Duration,
    /// Head start for the task before the first event.
    pub startup_grace: Duration,
    /// Voluntary pause of the task after each release.
    pub cooldown: Duration,
    /// CPU to pin the whole scenario to; `None` leaves affinity alone.
    pub pin_cpu: Option<usize>,
    /// Put the producer at time-critical and the task at lowest priority.
    /// When off, both ask for normal priority.
    pub prioritize: bool,
}

impl ScenarioConfig {
    pub const EVENTS: u32 = 5;
    pub const PACKET_INTERVAL: Duration = Duration::from_millis(5);
    pub const PROCESSING_TIME: Duration = Duration::from_millis(20);
    pub const STARTUP_GRACE: Duration = Duration::from_millis(100);
    pub const COOLDOWN: Duration = Duration::from_millis(1);

    /// Hold time well above the event interval: the producer keeps landing
    /// on a held lock.
    #[must_use]
    pub const fn literal() -> Self {
        Self {
            events: Self::EVENTS,
            packet_interval: Self::PACKET_INTERVAL,
            processing_time: Self::PROCESSING_TIME,
            startup_grace: Self::STARTUP_GRACE,
            cooldown: Self::COOLDOWN,
            pin_cpu: Some(0),
            prioritize: true,
        }
    }

    /// Short holds, long gaps: the task is done long before the next event.
    #[must_use]
    pub const fn degenerate() -> Self {
        Self {
            packet_interval: Duration::from_millis(50),
            processing_time: Duration::from_millis(1),
            ..Self::literal()
        }
    }

    /// # Errors
    /// Rejects an empty event sequence and zero interval or hold times.
    pub fn validate(&self) -> Result<(), ScenarioConfigError> {
        if self.events == 0 {
            return Err(ScenarioConfigError::NoEvents);
        }
        if self.packet_interval.is_zero() {
            return Err(ScenarioConfigError::ZeroDuration("packet interval"));
        }
        if self.processing_time.is_zero() {
            return Err(ScenarioConfigError::ZeroDuration("processing time"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn forcing_conditions(&self) -> ForcingConditions {
        ForcingConditions {
            single_core: self.pin_cpu.is_some(),
            prioritized: self.prioritize,
            hold_covers_interval: self.processing_time.as_nanos()
                >= self.packet_interval.as_nanos(),
            repeated_events: self.events >= 2,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::literal()
    }
}

/// Which of the preconditions for a likely reproduction a config asks for.
///
/// Whether the host honors them is a separate question; see the report's
/// degradations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ForcingConditions {
    pub single_core: bool,
    pub prioritized: bool,
    pub hold_covers_interval: bool,
    pub repeated_events: bool,
}

impl ForcingConditions {
    #[must_use]
    pub const fn all(&self) -> bool {
        self.single_core && self.prioritized && self.hold_covers_interval && self.repeated_events
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioConfigError {
    #[error("scenario needs at least one producer event")]
    NoEvents,
    #[error("{0} must be non-zero")]
    ZeroDuration(&'static str),
}
