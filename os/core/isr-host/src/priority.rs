use core::fmt;

/// Scheduling tiers the scenario asks for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Runs only when nothing else wants the core.
    Lowest,
    /// The host's default time-sharing tier.
    Normal,
    /// Preempts everything else; stands in for interrupt priority.
    TimeCritical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lowest => f.write_str("lowest"),
            Self::Normal => f.write_str("normal"),
            Self::TimeCritical => f.write_str("time-critical"),
        }
    }
}
