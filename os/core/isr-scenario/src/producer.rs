use crate::trace::{Context, TraceEvent, TraceSink};
use crate::{PacketBuffer, PacketId};
use isr_sync::{Acquisition, ContextLock, Relax, SleepRelax, WaitOption};
use std::sync::Arc;

/// The interrupt-like producer.
///
/// Stateless: each [`raise`](Self::raise) takes the lock waiting forever,
/// updates the buffer and releases at once. It never picks its own wait
/// policy; when called from the designated interrupt context the lock
/// makes it spin.
pub struct InterruptProducer<R = SleepRelax> {
    lock: Arc<ContextLock<R>>,
    buffer: Arc<PacketBuffer>,
    trace: TraceSink,
}

impl<R: Relax> InterruptProducer<R> {
    #[must_use]
    pub const fn new(lock: Arc<ContextLock<R>>, buffer: Arc<PacketBuffer>, trace: TraceSink) -> Self {
        Self {
            lock,
            buffer,
            trace,
        }
    }

    /// Handles one packet arrival synchronously.
    pub fn raise(&self, packet: PacketId) -> Acquisition {
        self.trace
            .emit(Context::Interrupt, TraceEvent::InterruptRaised { packet });

        // Same decision the lock is about to make, surfaced for the trace.
        let policy = self.lock.classifier().classify_current(WaitOption::Forever);
        self.trace
            .emit(Context::Interrupt, TraceEvent::AcquireAttempt { packet, policy });

        let got = self.lock.acquire(WaitOption::Forever);
        self.buffer.publish(packet);
        self.lock.release();

        self.trace.emit(
            Context::Interrupt,
            TraceEvent::BufferUpdated {
                packet,
                retries: got.retries,
                waited: got.waited,
            },
        );
        got
    }
}
