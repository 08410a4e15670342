use crate::{ConfigurationDegraded, Priority, SchedulerHost};

/// A host that cannot change affinity or priority.
///
/// Every request reports [`ConfigurationDegraded::Unsupported`]; threads
/// still get created and run at whatever the platform default is.
#[derive(Debug, Default, Copy, Clone)]
pub struct InertHost;

impl SchedulerHost for InertHost {
    fn pin_current_to(&self, _cpu: usize) -> Result<(), ConfigurationDegraded> {
        Err(ConfigurationDegraded::Unsupported {
            capability: "affinity",
        })
    }

    fn set_current_priority(&self, _priority: Priority) -> Result<(), ConfigurationDegraded> {
        Err(ConfigurationDegraded::Unsupported {
            capability: "priority",
        })
    }
}
