//! [`SignalSlot`] – latest-value cell for the current [`HandSignal`].
//!
//! The tracker thread writes; the frame loop reads.  Every write replaces the
//! whole value under the lock, so a reader never observes a half-updated
//! signal.  There is no queue: a reader that falls behind simply sees the
//! newest value, and a reader that runs ahead sees the previous one again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use pinchclaw_types::HandSignal;

/// Shared single-slot cell.  Clone it cheaply; all clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct SignalSlot {
    signal: Arc<RwLock<HandSignal>>,
    writes: Arc<AtomicU64>,
}

impl SignalSlot {
    /// Create a slot holding [`HandSignal::NEUTRAL`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored signal.
    pub fn publish(&self, signal: HandSignal) {
        *self.signal.write() = signal;
        self.writes.fetch_add(1, Ordering::Release);
    }

    /// Return a copy of the most recently published signal.
    pub fn latest(&self) -> HandSignal {
        *self.signal.read()
    }

    /// Total number of publishes since creation.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Acquire)
    }

    /// Put the slot back to the neutral signal.
    pub fn reset(&self) {
        self.publish(HandSignal::NEUTRAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fresh_slot_is_neutral() {
        let slot = SignalSlot::new();
        assert_eq!(slot.latest(), HandSignal::NEUTRAL);
        assert_eq!(slot.write_count(), 0);
    }

    #[test]
    fn last_writer_wins() {
        let slot = SignalSlot::new();
        slot.publish(HandSignal::present(0.1, 0.2, 0.1, false));
        slot.publish(HandSignal::present(0.9, 0.8, 0.2, true));
        assert_eq!(slot.latest(), HandSignal::present(0.9, 0.8, 0.2, true));
        assert_eq!(slot.write_count(), 2);
    }

    #[test]
    fn repeated_reads_return_stale_value() {
        let slot = SignalSlot::new();
        slot.publish(HandSignal::present(0.3, 0.3, 0.1, true));
        assert_eq!(slot.latest(), slot.latest());
    }

    #[test]
    fn clones_share_the_slot_across_threads() {
        let slot = SignalSlot::new();
        let writer = slot.clone();
        thread::spawn(move || {
            for i in 0..100 {
                let v = i as f32 / 100.0;
                writer.publish(HandSignal::present(v, v, v, i % 2 == 0));
            }
        })
        .join()
        .unwrap();

        let last = slot.latest();
        // Whole-value replacement: all three fields come from the same write.
        assert_eq!(last.x, last.y);
        assert_eq!(last.y, last.depth_proxy);
        assert!((last.x - 0.99).abs() < 1e-6);
        assert_eq!(slot.write_count(), 100);
    }

    #[test]
    fn reset_restores_neutral() {
        let slot = SignalSlot::new();
        slot.publish(HandSignal::present(0.9, 0.9, 0.3, true));
        slot.reset();
        assert_eq!(slot.latest(), HandSignal::NEUTRAL);
    }
}
