//! [`FrameLoop`] – the fixed-rate game tick.
//!
//! Every frame:
//!
//! 1. **Read** – take the newest [`HandSignal`] (stale reads are expected).
//! 2. **Tick** – [`GameSession::tick`] moves the claw and evaluates
//!    grab/release.
//! 3. **Count** – every `frames_per_second` frames one second comes off the
//!    session clock.
//!
//! The loop stops when the session leaves [`GameStatus::Playing`], when the
//! shutdown flag is raised, or after `max_frames`.
//!
//! # Modes
//!
//! - **Realtime** ([`FrameLoop::run`]): frames are paced to wall-clock time
//!   and the signal comes from a [`SignalSlot`] fed by a tracker thread.
//! - **Lockstep** ([`FrameLoop::run_lockstep`]): one source frame per game
//!   frame, no sleeping.  Deterministic; used for headless simulation and
//!   tests.
//!
//! # Example
//!
//! ```rust
//! use pinchclaw_kernel::{GameSession, SessionConfig};
//! use pinchclaw_perception::sim::SweepSource;
//! use pinchclaw_runtime::frame_loop::{FrameLoop, FrameLoopConfig, StopReason};
//!
//! let mut session = GameSession::new(SessionConfig::default()).unwrap().with_seed(3);
//! session.start("ada");
//!
//! let config = FrameLoopConfig { realtime: false, max_frames: Some(300), ..Default::default() };
//! let report = FrameLoop::new(config).play(&mut session, SweepSource::new()).unwrap();
//! assert_eq!(report.frames, 300);
//! assert_eq!(report.stop, StopReason::FrameLimit);
//! ```

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use pinchclaw_kernel::GameSession;
use pinchclaw_perception::{GestureNormalizer, HandSource, SignalSlot};
use pinchclaw_types::{GameStatus, GrabEvent, HandSignal};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::tracker::{Tracker, spawn_tracker};

/// Configuration bundle for [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoopConfig {
    /// Game frames per second.  Also the number of frames per clock second.
    pub frames_per_second: u32,
    /// Pace frames to wall-clock time.  `false` runs as fast as possible.
    pub realtime: bool,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            realtime: true,
            max_frames: None,
        }
    }
}

impl FrameLoopConfig {
    fn fps(&self) -> u64 {
        u64::from(self.frames_per_second.max(1))
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps() as f64)
    }
}

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The session left `Playing`.
    Finished,
    Shutdown,
    FrameLimit,
}

/// Summary of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameLoopReport {
    pub frames: u64,
    pub grabs: u32,
    pub drops: u32,
    pub deposits: u32,
    pub final_score: u32,
    pub status: GameStatus,
    pub stop: StopReason,
}

impl FrameLoopReport {
    fn new() -> Self {
        Self {
            frames: 0,
            grabs: 0,
            drops: 0,
            deposits: 0,
            final_score: 0,
            status: GameStatus::Start,
            stop: StopReason::Finished,
        }
    }

    fn record(&mut self, event: GrabEvent) {
        match event {
            GrabEvent::Grabbed { .. } => self.grabs += 1,
            GrabEvent::Dropped { .. } => self.drops += 1,
            GrabEvent::Deposited { .. } => self.deposits += 1,
        }
    }
}

/// Drives a [`GameSession`] frame by frame.
pub struct FrameLoop {
    config: FrameLoopConfig,
    shutdown: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn new(config: FrameLoopConfig) -> Self {
        Self {
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned shutdown flag (e.g. set by Ctrl-C).
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn config(&self) -> &FrameLoopConfig {
        &self.config
    }

    /// Play `source` to the end of the session.
    ///
    /// In realtime mode the source runs on a tracker thread; otherwise the
    /// loop runs in lockstep.  The normalizer uses the session's pinch
    /// threshold.
    ///
    /// # Errors
    ///
    /// Fails only when the tracker thread cannot be spawned.
    pub fn play<S: HandSource>(
        &self,
        session: &mut GameSession,
        mut source: S,
    ) -> io::Result<FrameLoopReport> {
        let normalizer = GestureNormalizer::from_tuning(&session.config().tuning);
        if !self.config.realtime {
            return Ok(self.run_lockstep(session, &mut source, normalizer));
        }

        let slot = SignalSlot::new();
        let tracker_stop = Arc::new(AtomicBool::new(false));
        let handle = spawn_tracker(source, normalizer, slot.clone(), Arc::clone(&tracker_stop))?;

        let report = self.run(session, &slot);

        tracker_stop.store(true, Ordering::Relaxed);
        match handle.join() {
            Some(tracker) => debug!(
                frames = tracker.frames(),
                acquisitions = tracker.acquisitions(),
                "tracker joined"
            ),
            None => warn!("tracker thread panicked"),
        }
        Ok(report)
    }

    /// Realtime loop reading from `slot`.
    pub fn run(&self, session: &mut GameSession, slot: &SignalSlot) -> FrameLoopReport {
        let period = self.config.frame_period();
        let mut deadline = Instant::now();
        self.drive(session, || {
            deadline += period;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                // Behind schedule: do not try to catch up.
                deadline = now;
            }
            slot.latest()
        })
    }

    /// Lockstep loop pulling one frame from `source` per game frame.
    ///
    /// A closed source reads as an absent hand for the rest of the session.
    pub fn run_lockstep(
        &self,
        session: &mut GameSession,
        source: &mut dyn HandSource,
        normalizer: GestureNormalizer,
    ) -> FrameLoopReport {
        let mut tracker = Tracker::new(normalizer);
        let mut open = true;
        self.drive(session, || {
            if !open {
                return HandSignal::NEUTRAL;
            }
            match source.next_frame() {
                Some(detection) => tracker.process(&detection),
                None => {
                    open = false;
                    debug!(frames = tracker.frames(), "source closed");
                    tracker.close()
                }
            }
        })
    }

    fn drive(
        &self,
        session: &mut GameSession,
        mut next_signal: impl FnMut() -> HandSignal,
    ) -> FrameLoopReport {
        let fps = self.config.fps();
        let mut report = FrameLoopReport::new();

        info!(
            fps,
            realtime = self.config.realtime,
            max_frames = ?self.config.max_frames,
            "frame loop started"
        );

        report.stop = loop {
            if session.status() != GameStatus::Playing {
                break StopReason::Finished;
            }
            if self.shutdown.load(Ordering::Relaxed) {
                break StopReason::Shutdown;
            }
            if self.config.max_frames.is_some_and(|max| report.frames >= max) {
                break StopReason::FrameLimit;
            }

            let signal = next_signal();
            if let Some(event) = session.tick(&signal) {
                debug!(frame = report.frames, ?event, "grab event");
                report.record(event);
            }
            report.frames += 1;

            if report.frames % fps == 0 {
                if let Some(status) = session.tick_second() {
                    debug!(frame = report.frames, %status, "clock expired");
                }
            }
        };

        report.final_score = session.score();
        report.status = session.status();
        info!(
            frames = report.frames,
            deposits = report.deposits,
            score = report.final_score,
            status = %report.status,
            stop = ?report.stop,
            "frame loop stopped"
        );
        report
    }
}
