//! Hand signal producers.
//!
//! A [`HandSource`] delivers one [`HandDetection`] per tracker frame.  A
//! camera-backed implementation lives outside this workspace; the sources here
//! replay recorded frames or synthesize them (see [`crate::sim`]).

use std::collections::VecDeque;
use std::io::BufRead;
use std::thread;
use std::time::Duration;

use pinchclaw_types::ClawError;
use tracing::debug;

use crate::gesture::HandDetection;

/// Anything that can produce tracker frames.
///
/// `next_frame` may block (a camera waits for the next exposure).  It returns
/// `None` once the source is exhausted or closed; a frame with no hands is
/// `Some(HandDetection::no_hand())`.
pub trait HandSource: Send + 'static {
    /// Short label used in log output.
    fn id(&self) -> &str;

    fn next_frame(&mut self) -> Option<HandDetection>;
}

// ────────────────────────────────────────────────────────────────────────────
// ReplaySource
// ────────────────────────────────────────────────────────────────────────────

/// Replays a fixed sequence of recorded frames.
///
/// Frames can be paced with [`ReplaySource::with_interval`] to mimic the
/// tracker's own frame rate; without an interval they are returned
/// immediately.
#[derive(Debug)]
pub struct ReplaySource {
    id: String,
    frames: VecDeque<HandDetection>,
    interval: Option<Duration>,
}

impl ReplaySource {
    pub fn new(id: impl Into<String>, frames: Vec<HandDetection>) -> Self {
        Self {
            id: id.into(),
            frames: frames.into(),
            interval: None,
        }
    }

    /// Parse a JSON-lines recording: one [`HandDetection`] object per line.
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ClawError::Replay`] with the 1-based line number of the first
    /// line that cannot be read or parsed.
    pub fn from_jsonl(id: impl Into<String>, reader: impl BufRead) -> Result<Self, ClawError> {
        let mut frames = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ClawError::Replay {
                line: idx + 1,
                details: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let frame: HandDetection =
                serde_json::from_str(&line).map_err(|e| ClawError::Replay {
                    line: idx + 1,
                    details: e.to_string(),
                })?;
            frames.push(frame);
        }
        let id = id.into();
        debug!(source = %id, frames = frames.len(), "replay loaded");
        Ok(Self::new(id, frames))
    }

    /// Sleep `interval` before handing out each frame.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Frames not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl HandSource for ReplaySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn next_frame(&mut self) -> Option<HandDetection> {
        let frame = self.frames.pop_front()?;
        if let Some(interval) = self.interval {
            thread::sleep(interval);
        }
        Some(frame)
    }
}
