use crate::PacketId;
use core::sync::atomic::{AtomicU32, Ordering};

/// The "buffer pointers" the producer updates under the lock.
///
/// Relaxed accesses are enough: every write happens inside the lock, whose
/// acquire/release pair orders them.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    write_index: AtomicU32,
    last_packet: AtomicU32,
}

impl PacketBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            write_index: AtomicU32::new(0),
            last_packet: AtomicU32::new(0),
        }
    }

    /// Constant-time update; call with the lock held.
    #[inline]
    pub fn publish(&self, packet: PacketId) {
        self.last_packet.store(packet, Ordering::Relaxed);
        self.write_index.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of packets published so far.
    #[inline]
    #[must_use]
    pub fn write_index(&self) -> u32 {
        self.write_index.load(Ordering::Relaxed)
    }

    #[inline]
    #[must_use]
    pub fn last_packet(&self) -> Option<PacketId> {
        match self.last_packet.load(Ordering::Relaxed) {
            0 => None,
            packet => Some(packet),
        }
    }
}
