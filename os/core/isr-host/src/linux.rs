use crate::{ConfigurationDegraded, Priority, SchedulerHost};
use core::mem;
use log::debug;
use std::io;

/// Linux scheduling through `libc`.
///
/// | Priority       | Policy        | Level                          |
/// |----------------|---------------|--------------------------------|
/// | `TimeCritical` | `SCHED_FIFO`  | `sched_get_priority_max(FIFO)` |
/// | `Normal`       | `SCHED_OTHER` | 0                              |
/// | `Lowest`       | `SCHED_IDLE`  | 0                              |
///
/// Entering `SCHED_FIFO` needs `CAP_SYS_NICE` (or a matching `RLIMIT_RTPRIO`).
/// Dropping to `SCHED_IDLE` is always permitted.
#[derive(Debug, Default, Copy, Clone)]
pub struct LinuxHost;

impl LinuxHost {
    /// Current policy and level of the calling thread.
    ///
    /// # Errors
    /// Propagates the `pthread_getschedparam` error code.
    pub fn current_policy() -> io::Result<(libc::c_int, libc::c_int)> {
        let mut policy: libc::c_int = 0;
        // SAFETY: sched_param is plain data; zero is a valid bit pattern.
        let mut param: libc::sched_param = unsafe { mem::zeroed() };
        let rc = unsafe { libc::pthread_getschedparam(libc::pthread_self(), &mut policy, &mut param) };
        if rc != 0 {
            return Err(io::Error::from_raw_os_error(rc));
        }
        Ok((policy, param.sched_priority))
    }

    fn policy_for(priority: Priority) -> io::Result<(libc::c_int, libc::c_int)> {
        match priority {
            Priority::TimeCritical => {
                let max = unsafe { libc::sched_get_priority_max(libc::SCHED_FIFO) };
                if max < 0 {
                    return Err(io::Error::last_os_error());
                }
                Ok((libc::SCHED_FIFO, max))
            }
            Priority::Normal => Ok((libc::SCHED_OTHER, 0)),
            Priority::Lowest => Ok((libc::SCHED_IDLE, 0)),
        }
    }
}

impl SchedulerHost for LinuxHost {
    fn pin_current_to(&self, cpu: usize) -> Result<(), ConfigurationDegraded> {
        let setsize = usize::try_from(libc::CPU_SETSIZE).unwrap_or_default();
        if cpu >= setsize {
            return Err(ConfigurationDegraded::Affinity {
                cpu,
                source: io::Error::from(io::ErrorKind::InvalidInput),
            });
        }

        // SAFETY: cpu_set_t is a plain bitmask; cpu is within CPU_SETSIZE.
        let rc = unsafe {
            let mut set: libc::cpu_set_t = mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(cpu, &mut set);
            // pid 0 = calling thread
            libc::sched_setaffinity(0, mem::size_of::<libc::cpu_set_t>(), &raw const set)
        };
        if rc != 0 {
            return Err(ConfigurationDegraded::Affinity {
                cpu,
                source: io::Error::last_os_error(),
            });
        }

        debug!("pinned thread {:?} to CPU {cpu}", std::thread::current().id());
        Ok(())
    }

    fn set_current_priority(&self, priority: Priority) -> Result<(), ConfigurationDegraded> {
        let (policy, level) = Self::policy_for(priority)
            .map_err(|source| ConfigurationDegraded::Priority { priority, source })?;

        // SAFETY: sched_param is plain data; zero is a valid bit pattern.
        let mut param: libc::sched_param = unsafe { mem::zeroed() };
        param.sched_priority = level;

        // pthread_* return the error code instead of setting errno
        let rc = unsafe { libc::pthread_setschedparam(libc::pthread_self(), policy, &raw const param) };
        if rc != 0 {
            return Err(ConfigurationDegraded::Priority {
                priority,
                source: io::Error::from_raw_os_error(rc),
            });
        }

        debug!(
            "thread {:?} now at {priority} (policy {policy}, level {level})",
            std::thread::current().id()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn out_of_range_cpu_is_degraded_not_fatal() {
        let err = LinuxHost.pin_current_to(usize::MAX).unwrap_err();
        assert_eq!(err.capability(), "affinity");
    }

    #[test]
    fn dropping_to_lowest_is_always_permitted() {
        thread::spawn(|| {
            LinuxHost.set_current_priority(Priority::Lowest).unwrap();
            let (policy, _) = LinuxHost::current_policy().unwrap();
            assert_eq!(policy, libc::SCHED_IDLE);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn time_critical_either_applies_or_degrades() {
        thread::spawn(|| match LinuxHost.set_current_priority(Priority::TimeCritical) {
            Ok(()) => {
                let (policy, _) = LinuxHost::current_policy().unwrap();
                assert_eq!(policy, libc::SCHED_FIFO);
            }
            Err(err) => assert_eq!(err.capability(), "priority"),
        })
        .join()
        .unwrap();
    }
}
