//! The hand-tracker producer.
//!
//! [`Tracker`] normalizes detections and logs when a hand appears or
//! disappears.  [`spawn_tracker`] runs one on a dedicated thread, publishing
//! every reading to a [`SignalSlot`] until the source closes or shutdown is
//! requested.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use pinchclaw_perception::{GestureNormalizer, HandDetection, HandSource, SignalSlot};
use pinchclaw_types::HandSignal;
use tracing::{debug, info};

/// Normalizer plus hand-presence bookkeeping.
#[derive(Debug, Clone)]
pub struct Tracker {
    normalizer: GestureNormalizer,
    present: bool,
    frames: u64,
    acquisitions: u64,
}

impl Tracker {
    pub fn new(normalizer: GestureNormalizer) -> Self {
        Self {
            normalizer,
            present: false,
            frames: 0,
            acquisitions: 0,
        }
    }

    /// Normalize one detection.
    pub fn process(&mut self, detection: &HandDetection) -> HandSignal {
        self.frames += 1;
        let signal = self.normalizer.normalize(detection);
        self.observe(signal.is_present);
        signal
    }

    /// The source went away: the hand is gone.
    pub fn close(&mut self) -> HandSignal {
        self.observe(false);
        HandSignal::NEUTRAL
    }

    fn observe(&mut self, present: bool) {
        if present == self.present {
            return;
        }
        self.present = present;
        if present {
            self.acquisitions += 1;
            info!(frame = self.frames, "hand acquired");
        } else {
            info!(frame = self.frames, "hand lost");
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn acquisitions(&self) -> u64 {
        self.acquisitions
    }

    pub fn hand_present(&self) -> bool {
        self.present
    }
}

/// Join handle of a running tracker thread.
pub struct TrackerHandle {
    join: JoinHandle<Tracker>,
}

impl TrackerHandle {
    /// Wait for the thread and return its final state.  A panicked tracker
    /// yields `None`.
    pub fn join(self) -> Option<Tracker> {
        self.join.join().ok()
    }
}

/// Start `source` on its own thread.
///
/// Each frame is normalized and published to `slot`, replacing the previous
/// reading.  When the source closes, the neutral signal is published so the
/// claw parks and any held collectible is released.
pub fn spawn_tracker<S: HandSource>(
    mut source: S,
    normalizer: GestureNormalizer,
    slot: SignalSlot,
    shutdown: Arc<AtomicBool>,
) -> io::Result<TrackerHandle> {
    let join = thread::Builder::new()
        .name(format!("tracker-{}", source.id()))
        .spawn(move || {
            let mut tracker = Tracker::new(normalizer);
            debug!(source = source.id(), "tracker started");
            while !shutdown.load(Ordering::Relaxed) {
                match source.next_frame() {
                    Some(detection) => slot.publish(tracker.process(&detection)),
                    None => break,
                }
            }
            slot.publish(tracker.close());
            debug!(source = source.id(), frames = tracker.frames(), "tracker stopped");
            tracker
        })?;
    Ok(TrackerHandle { join })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinchclaw_perception::ReplaySource;
    use pinchclaw_perception::sim::{SweepSource, synthetic_hand};

    #[test]
    fn tracker_counts_acquisitions() {
        let mut t = Tracker::new(GestureNormalizer::default());
        let hand = HandDetection::single(synthetic_hand(0.4, 0.5, 0.1, false));
        t.process(&HandDetection::no_hand());
        t.process(&hand);
        t.process(&hand);
        t.process(&HandDetection::no_hand());
        t.process(&hand);
        assert_eq!(t.frames(), 5);
        assert_eq!(t.acquisitions(), 2);
        assert!(t.hand_present());
        assert_eq!(t.close(), HandSignal::NEUTRAL);
        assert!(!t.hand_present());
    }

    #[test]
    fn thread_publishes_every_frame_then_neutral() {
        let frames = vec![
            HandDetection::single(synthetic_hand(0.2, 0.4, 0.1, true)),
            HandDetection::single(synthetic_hand(0.3, 0.4, 0.1, true)),
        ];
        let slot = SignalSlot::new();
        let handle = spawn_tracker(
            ReplaySource::new("replay", frames),
            GestureNormalizer::default(),
            slot.clone(),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap();
        let tracker = handle.join().unwrap();

        assert_eq!(tracker.frames(), 2);
        // Two frames plus the closing neutral.
        assert_eq!(slot.write_count(), 3);
        assert_eq!(slot.latest(), HandSignal::NEUTRAL);
    }

    #[test]
    fn shutdown_stops_an_endless_source() {
        let slot = SignalSlot::new();
        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = spawn_tracker(
            SweepSource::new().with_interval(std::time::Duration::from_millis(1)),
            GestureNormalizer::default(),
            slot.clone(),
            Arc::clone(&shutdown),
        )
        .unwrap();

        while slot.write_count() < 5 {
            thread::yield_now();
        }
        shutdown.store(true, Ordering::Relaxed);
        let tracker = handle.join().unwrap();
        assert!(tracker.frames() >= 5);
        assert_eq!(slot.latest(), HandSignal::NEUTRAL);
    }
}
