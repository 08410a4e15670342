use isr_sync::{
    ContextClassifier, ContextLock, ExecutionContextIdentity, Relax, SharedLock, WaitOption,
    WaitPolicy, YieldRelax,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Yields and counts how often it was asked to.
#[derive(Default)]
struct CountingRelax {
    calls: AtomicUsize,
}

impl Relax for CountingRelax {
    fn relax(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::yield_now();
    }
}

#[test]
fn uncontended_acquire_and_release() {
    let l = SharedLock::new();
    assert!(!l.is_held());

    let got = l.acquire(WaitPolicy::YieldWhileWaiting);
    assert!(l.is_held());
    assert_eq!(got.retries, 0);
    assert!(!got.was_contended());

    l.release();
    assert!(!l.is_held());

    // previous release must have freed it
    let got = l.acquire(WaitPolicy::SpinForever);
    assert_eq!(got.policy, WaitPolicy::SpinForever);
    l.release();
}

#[test]
fn try_acquire_semantics() {
    let l = SharedLock::new();

    // first try should succeed
    assert!(l.try_acquire());

    // while held, try must fail
    assert!(!l.try_acquire());

    // releasing allows another try
    l.release();
    assert!(l.try_acquire());
}

#[test]
fn release_by_a_context_that_never_held_the_lock_frees_it() {
    let l = Arc::new(SharedLock::new());
    assert!(l.try_acquire());

    // A stranger thread releases without ever acquiring.
    let stranger = Arc::clone(&l);
    thread::spawn(move || stranger.release()).join().unwrap();

    assert!(!l.is_held(), "release is unconditional, no owner check");
    assert!(l.try_acquire());
}

#[test]
fn yielding_waiter_relaxes_once_per_failed_attempt() {
    let l = Arc::new(SharedLock::with_relax(CountingRelax::default()));
    assert!(l.try_acquire());

    let holder = Arc::clone(&l);
    let h = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        holder.release();
    });

    let got = l.acquire(WaitPolicy::YieldWhileWaiting);
    h.join().unwrap();

    assert!(got.was_contended());
    assert!(got.waited >= Duration::from_millis(1));
    let relaxed = relax_calls(&l);
    assert_eq!(u64::try_from(relaxed).unwrap(), got.retries);
    l.release();
}

#[test]
fn spinning_waiter_never_relaxes() {
    let l = Arc::new(SharedLock::with_relax(CountingRelax::default()));
    assert!(l.try_acquire());

    let holder = Arc::clone(&l);
    let h = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        holder.release();
    });

    let got = l.acquire(WaitPolicy::SpinForever);
    h.join().unwrap();

    assert_eq!(got.policy, WaitPolicy::SpinForever);
    assert!(got.was_contended());
    assert_eq!(relax_calls(&l), 0, "the spin path must not give up the core");
    l.release();
}

fn relax_calls(l: &SharedLock<CountingRelax>) -> usize {
    l.relax().calls.load(Ordering::SeqCst)
}

#[test]
fn contended_sections_are_exclusive_across_interrupt_and_task_contexts() {
    let threads = 4; // one interrupt-like spinner, the rest yield
    let iters = 2_000;

    let lock = Arc::new(ContextLock::from_parts(
        SharedLock::with_relax(YieldRelax),
        ContextClassifier::new(),
    ));
    let in_cs = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));
    let start = Arc::new(Barrier::new(threads));

    let mut handles = Vec::with_capacity(threads);
    for i in 0..threads {
        let lock = Arc::clone(&lock);
        let in_cs = Arc::clone(&in_cs);
        let total = Arc::clone(&total);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            if i == 0 {
                lock.designate_interrupt(ExecutionContextIdentity::current())
                    .unwrap();
            }
            start.wait();
            let mut spun = 0;
            for _ in 0..iters {
                let got = lock.acquire(WaitOption::Forever);
                if got.policy == WaitPolicy::SpinForever {
                    spun += 1;
                }
                let prev = in_cs.fetch_add(1, Ordering::SeqCst);
                assert_eq!(prev, 0, "mutual exclusion violated");
                total.fetch_add(1, Ordering::Relaxed);
                in_cs.fetch_sub(1, Ordering::SeqCst);
                lock.release();

                // yield only AFTER releasing the lock to reduce convoy effects
                thread::yield_now();
            }
            (i, spun)
        }));
    }

    for h in handles {
        let (i, spun) = h.join().unwrap();
        if i == 0 {
            assert_eq!(spun, iters, "interrupt context always spins");
        } else {
            assert_eq!(spun, 0, "task contexts always yield");
        }
    }

    assert_eq!(total.load(Ordering::SeqCst), threads * iters);
    assert_eq!(in_cs.load(Ordering::SeqCst), 0);
    assert!(!lock.is_held());
}

/// Spot-check that the lock can be shared between threads.
#[test]
fn context_lock_is_sync() {
    fn takes_sync<S: Sync + Send>(_s: &S) {}
    let l = ContextLock::new();
    takes_sync(&l);
}
