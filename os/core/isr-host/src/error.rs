use crate::Priority;
use std::io;

/// The host declined part of the forcing configuration.
///
/// The scenario keeps running; it just may not reproduce the inversion.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationDegraded {
    #[error("failed to pin execution to CPU {cpu}")]
    Affinity {
        cpu: usize,
        #[source]
        source: io::Error,
    },
    #[error("failed to apply {priority} scheduling priority")]
    Priority {
        priority: Priority,
        #[source]
        source: io::Error,
    },
    #[error("{capability} is not supported by this host")]
    Unsupported { capability: &'static str },
}

impl ConfigurationDegraded {
    /// Short name of the capability that was refused.
    #[must_use]
    pub const fn capability(&self) -> &'static str {
        match self {
            Self::Affinity { .. } => "affinity",
            Self::Priority { .. } => "priority",
            Self::Unsupported { capability } => *capability,
        }
    }
}
