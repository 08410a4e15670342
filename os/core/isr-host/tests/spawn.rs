use isr_host::{ConfigurationDegraded, InertHost, NativeHost, Priority, SchedulerHost};
use isr_sync::ExecutionContextIdentity;
use std::thread;

#[test]
fn inert_host_degrades_every_request() {
    let pin = InertHost.pin_current_to(0).unwrap_err();
    assert!(matches!(
        pin,
        ConfigurationDegraded::Unsupported {
            capability: "affinity"
        }
    ));

    let prio = InertHost
        .set_current_priority(Priority::TimeCritical)
        .unwrap_err();
    assert_eq!(prio.capability(), "priority");
    assert_eq!(
        prio.to_string(),
        "priority is not supported by this host"
    );
}

#[test]
fn spawned_thread_reports_its_own_priority_outcome() {
    let handle = InertHost
        .spawn_prioritized("app", Priority::Lowest, |applied| {
            (
                thread::current().name().map(str::to_owned),
                applied.map_err(|e| e.capability()),
            )
        })
        .unwrap();

    let (name, applied) = handle.join().unwrap();
    assert_eq!(name.as_deref(), Some("app"));
    assert_eq!(applied, Err("priority"));
}

#[test]
fn spawned_thread_is_a_distinct_context() {
    let host = NativeHost::default();
    let me = host.current_context();
    let other = host
        .spawn_prioritized("other", Priority::Lowest, |_| {
            ExecutionContextIdentity::current()
        })
        .unwrap()
        .join()
        .unwrap();
    assert_ne!(me, other);
}

#[test]
fn priorities_order_from_lowest_to_time_critical() {
    assert!(Priority::Lowest < Priority::Normal);
    assert!(Priority::Normal < Priority::TimeCritical);
    assert_eq!(Priority::TimeCritical.to_string(), "time-critical");
}
