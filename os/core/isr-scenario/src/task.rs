use crate::PacketBuffer;
use crate::trace::{Context, TraceEvent, TraceSink};
use core::hint::black_box;
use core::sync::atomic::{AtomicBool, Ordering};
use isr_host::{Priority, SchedulerHost};
use isr_sync::{ContextLock, Relax, SleepRelax, WaitOption};
use log::debug;
use std::error::Error as _;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// The low-priority consumer.
///
/// Cycles forever through wait-for-free, acquire, busy critical section,
/// release and cool-down. The critical section burns the CPU instead of
/// sleeping, so only real preemption can take the core away while the lock
/// is held.
pub struct ApplicationTask<R = SleepRelax> {
    lock: Arc<ContextLock<R>>,
    buffer: Arc<PacketBuffer>,
    trace: TraceSink,
    processing_time: Duration,
    cooldown: Duration,
    stop: Arc<AtomicBool>,
}

impl<R: Relax> ApplicationTask<R> {
    #[must_use]
    pub fn new(
        lock: Arc<ContextLock<R>>,
        buffer: Arc<PacketBuffer>,
        trace: TraceSink,
        processing_time: Duration,
        cooldown: Duration,
    ) -> Self {
        Self {
            lock,
            buffer,
            trace,
            processing_time,
            cooldown,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs on the calling thread until the stop flag is raised.
    /// Returns the number of completed cycles.
    pub fn run(&self) -> u64 {
        self.trace.emit(Context::Application, TraceEvent::TaskStarted);

        let mut cycles = 0;
        while !self.stopped() {
            // Do not even try while the producer (or anyone) visibly holds it.
            while self.lock.is_held() {
                if self.stopped() {
                    return cycles;
                }
                self.lock.raw().relax().relax();
            }

            let got = self.lock.acquire(WaitOption::Forever);
            self.trace.emit(
                Context::Application,
                TraceEvent::ProcessingStarted {
                    hold: self.processing_time,
                },
            );
            debug!(
                target: Context::Application.target(),
                "acquired with {} after {} retries, last packet {:?}",
                got.policy,
                got.retries,
                self.buffer.last_packet()
            );

            busy_wait(self.processing_time);

            self.lock.release();
            // Order the cycle by its release, not by when the line goes out.
            let released = self.trace.stamp();
            cycles += 1;
            self.trace.emit_stamped(
                released,
                Context::Application,
                TraceEvent::PacketProcessed { cycle: cycles },
            );

            // cool-down
            thread::sleep(self.cooldown);
        }
        cycles
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

impl<R: Relax + Send + Sync + 'static> ApplicationTask<R> {
    /// Starts the task on its own thread at `priority`.
    ///
    /// A refused priority change is reported from inside the task and does
    /// not stop it.
    ///
    /// # Errors
    /// Fails only if the thread cannot be created.
    pub fn spawn<H: SchedulerHost>(self, host: &H, priority: Priority) -> io::Result<TaskHandle> {
        let stop = Arc::clone(&self.stop);
        let join = host.spawn_prioritized("app", priority, move |applied| {
            if let Err(err) = applied {
                debug!(target: Context::Application.target(), "{err}: {:?}", err.source());
                self.trace.emit(
                    Context::Application,
                    TraceEvent::ConfigurationDegraded {
                        capability: err.capability(),
                    },
                );
            }
            self.run()
        })?;
        Ok(TaskHandle { stop, join })
    }
}

/// Busy-waits for `duration` without yielding.
pub fn busy_wait(duration: Duration) {
    let start = Instant::now();
    let mut x = 0u64;
    while start.elapsed() < duration {
        // Burn CPU cycles
        x = black_box(x.wrapping_add(1));
    }
}

/// Handle to a running [`ApplicationTask`].
pub struct TaskHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<u64>,
}

impl TaskHandle {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Asks the task to stop after its current cycle and waits for it.
    ///
    /// # Errors
    /// Returns the panic payload if the task panicked.
    pub fn stop_and_join(self) -> thread::Result<u64> {
        self.stop.store(true, Ordering::Release);
        self.join.join()
    }

    /// Leaves the task running; it ends with the process.
    pub fn abandon(self) {
        debug!(target: Context::Driver.target(), "abandoning application task");
        drop(self.join);
    }
}
