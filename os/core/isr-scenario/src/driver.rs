use crate::task::{ApplicationTask, TaskHandle};
use crate::trace::{self, Context, TraceEvent, TraceSink};
use crate::{InterruptProducer, PacketBuffer, ScenarioConfig, ScenarioConfigError, ScenarioReport};
use isr_host::{ConfigurationDegraded, Priority, SchedulerHost};
use isr_sync::{AlreadyDesignated, ContextLock, Relax, SleepRelax};
use log::{debug, info};
use std::error::Error as _;
use std::io;
use std::sync::Arc;
use std::thread;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Config(#[from] ScenarioConfigError),
    #[error(transparent)]
    Designation(#[from] AlreadyDesignated),
    #[error("failed to start the application task")]
    Spawn(#[source] io::Error),
}

/// What a finished run leaves behind.
pub struct ScenarioOutcome {
    pub report: ScenarioReport,
    /// The buffer the producer updated.
    pub buffer: Arc<PacketBuffer>,
    /// The task is still running; stop it or abandon it.
    pub task: TaskHandle,
}

/// Sets up the forcing conditions and fires the producer events.
///
/// The thread calling [`run`](Self::run) becomes the interrupt-like context.
pub struct ScenarioDriver<H, R = SleepRelax> {
    host: H,
    config: ScenarioConfig,
    lock: Arc<ContextLock<R>>,
    buffer: Arc<PacketBuffer>,
}

impl<H: SchedulerHost> ScenarioDriver<H> {
    #[must_use]
    pub fn new(host: H, config: ScenarioConfig) -> Self {
        Self::with_lock(host, config, ContextLock::new())
    }
}

impl<H: SchedulerHost, R: Relax + Send + Sync + 'static> ScenarioDriver<H, R> {
    #[must_use]
    pub fn with_lock(host: H, config: ScenarioConfig, lock: ContextLock<R>) -> Self {
        Self {
            host,
            config,
            lock: Arc::new(lock),
            buffer: Arc::new(PacketBuffer::new()),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Runs the whole scenario on the calling thread.
    ///
    /// Refused affinity or priority requests are logged and recorded in the
    /// report; the run continues.
    ///
    /// # Errors
    /// An invalid configuration, a lock whose interrupt context was already
    /// designated, or a task thread that could not be created. The first two
    /// are detected before the calling thread is pinned or reprioritized.
    pub fn run(self) -> Result<ScenarioOutcome, ScenarioError> {
        self.config.validate()?;
        // Refuse before touching the caller's affinity or priority.
        if let Some(existing) = self.lock.classifier().interrupt_context() {
            return Err(AlreadyDesignated { existing }.into());
        }
        let (sink, mut log) = trace::channel();
        let mut degraded = Vec::new();

        info!(
            target: Context::Driver.target(),
            "{} events every {:?}, task holds the lock for {:?}",
            self.config.events,
            self.config.packet_interval,
            self.config.processing_time
        );

        // 1. one core for everybody; the task inherits the mask
        match self.config.pin_cpu {
            Some(cpu) => {
                if let Err(err) = self.host.pin_current_to(cpu) {
                    degrade(&sink, err, &mut degraded);
                }
            }
            None => info!(target: Context::Driver.target(), "affinity pinning disabled"),
        }

        // 2. this context becomes the interrupt
        let (isr_priority, task_priority) = if self.config.prioritize {
            (Priority::TimeCritical, Priority::Lowest)
        } else {
            (Priority::Normal, Priority::Normal)
        };
        if let Err(err) = self.host.set_current_priority(isr_priority) {
            degrade(&sink, err, &mut degraded);
        }
        self.lock.designate_interrupt(self.host.current_context())?;

        // 3. the task
        let task = ApplicationTask::new(
            Arc::clone(&self.lock),
            Arc::clone(&self.buffer),
            sink.clone(),
            self.config.processing_time,
            self.config.cooldown,
        )
        .spawn(&self.host, task_priority)
        .map_err(ScenarioError::Spawn)?;

        // 4. let it reach its wait phase
        thread::sleep(self.config.startup_grace);

        // 5. the interrupt storm
        let producer = InterruptProducer::new(Arc::clone(&self.lock), Arc::clone(&self.buffer), sink.clone());
        for packet in 1..=self.config.events {
            producer.raise(packet);
            thread::sleep(self.config.packet_interval);
        }

        sink.emit(
            Context::Driver,
            TraceEvent::SimulationSurvived {
                events: self.config.events,
            },
        );

        let report = ScenarioReport::new(self.config, degraded, log.drain());
        Ok(ScenarioOutcome {
            report,
            buffer: self.buffer,
            task,
        })
    }
}

fn degrade(sink: &TraceSink, err: ConfigurationDegraded, degraded: &mut Vec<ConfigurationDegraded>) {
    match err.source() {
        Some(cause) => debug!(target: Context::Driver.target(), "{err}: {cause}"),
        None => debug!(target: Context::Driver.target(), "{err}"),
    }
    sink.emit(
        Context::Driver,
        TraceEvent::ConfigurationDegraded {
            capability: err.capability(),
        },
    );
    degraded.push(err);
}
