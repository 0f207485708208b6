//! Synthetic hand input for headless play and tests.
//!
//! [`synthetic_hand`] builds a complete 21-point landmark set whose
//! normalized reading is exactly the requested position, depth proxy and
//! pinch state.  [`SweepSource`] drives it along a deterministic pick-and-
//! deposit route over the play field.

use std::thread;
use std::time::Duration;

use pinchclaw_types::HandSignal;

use crate::gesture::{HandDetection, Landmark, landmark};
use crate::source::HandSource;

/// Thumb-to-index gap of an open synthetic hand (well above any sane pinch
/// threshold).
const OPEN_GAP: f32 = 0.1;
/// Thumb-to-index gap of a pinching synthetic hand.
const PINCH_GAP: f32 = 0.01;

/// Build a landmark set that normalizes to the given reading.
///
/// `x` is in signal space (already mirrored); the raw wrist is placed at
/// `1 − x`.  `depth_proxy` becomes the wrist to middle-knuckle spread.
pub fn synthetic_hand(x: f32, y: f32, depth_proxy: f32, pinching: bool) -> Vec<Landmark> {
    let raw_x = 1.0 - x;
    let wrist = Landmark::new(raw_x, y, 0.0);
    let knuckle = Landmark::new(raw_x, y - depth_proxy, 0.0);

    let mut hand: Vec<Landmark> = (0..landmark::COUNT)
        .map(|i| {
            let t = i as f32 / (landmark::COUNT - 1) as f32;
            Landmark::new(raw_x, y - depth_proxy * t, -0.01 * t)
        })
        .collect();

    let thumb = Landmark::new(raw_x + 0.04, y - depth_proxy * 0.8, 0.0);
    let gap = if pinching { PINCH_GAP } else { OPEN_GAP };
    hand[landmark::WRIST] = wrist;
    hand[landmark::MIDDLE_MCP] = knuckle;
    hand[landmark::THUMB_TIP] = thumb;
    hand[landmark::INDEX_TIP] = Landmark::new(thumb.x, thumb.y - gap, 0.0);
    hand
}

/// Convenience wrapper: a one-hand [`HandDetection`] for `signal`, or an
/// empty frame when the signal is absent.
pub fn detection_for(signal: HandSignal) -> HandDetection {
    if signal.is_present {
        HandDetection::single(synthetic_hand(
            signal.x,
            signal.y,
            signal.depth_proxy,
            signal.is_pinching,
        ))
    } else {
        HandDetection::no_hand()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SweepSource
// ────────────────────────────────────────────────────────────────────────────

// Phase lengths of one visit, in frames.
const TRAVEL: u64 = 40;
const DESCEND: u64 = 30;
const CLOSE: u64 = 10;
const LIFT: u64 = 30;
const CARRY: u64 = 40;
const OPEN: u64 = 10;
const CYCLE: u64 = TRAVEL + DESCEND + CLOSE + LIFT + CARRY + OPEN;

const GRID: u64 = 5;

/// Hand height that raises the claw near the ceiling.
const HIGH_Y: f32 = 0.3;
/// Hand height that lowers the claw to its floor limit.
const LOW_Y: f32 = 0.95;

/// Hand reading that places the claw over the deposit chute at (-7, 7).
const CHUTE_X: f32 = 0.5 - 7.0 / 34.0;
const CHUTE_DEPTH: f32 = 0.1 - 7.0 / 300.0;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Deterministic autopilot hand.
///
/// Visits a 5×5 grid of cells in serpentine order.  Each visit travels from
/// the chute to the cell, lowers the claw, pinches, lifts, carries back to
/// the chute and opens.
pub struct SweepSource {
    frame: u64,
    limit: Option<u64>,
    interval: Option<Duration>,
}

impl SweepSource {
    pub fn new() -> Self {
        Self {
            frame: 0,
            limit: None,
            interval: None,
        }
    }

    /// Close the source after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }

    /// Sleep `interval` before each frame.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Frames in one grid visit.
    pub const fn cycle_len() -> u64 {
        CYCLE
    }

    /// The hand reading the sweep produces at `frame`.
    pub fn signal_at(frame: u64) -> HandSignal {
        let visit = frame / CYCLE;
        let mut t = frame % CYCLE;
        let (cell_x, cell_depth) = Self::cell(visit);

        if t < TRAVEL {
            let f = t as f32 / TRAVEL as f32;
            return HandSignal::present(
                lerp(CHUTE_X, cell_x, f),
                HIGH_Y,
                lerp(CHUTE_DEPTH, cell_depth, f),
                false,
            );
        }
        t -= TRAVEL;
        if t < DESCEND {
            let f = t as f32 / DESCEND as f32;
            return HandSignal::present(cell_x, lerp(HIGH_Y, LOW_Y, f), cell_depth, false);
        }
        t -= DESCEND;
        if t < CLOSE {
            return HandSignal::present(cell_x, LOW_Y, cell_depth, true);
        }
        t -= CLOSE;
        if t < LIFT {
            let f = t as f32 / LIFT as f32;
            return HandSignal::present(cell_x, lerp(LOW_Y, HIGH_Y, f), cell_depth, true);
        }
        t -= LIFT;
        if t < CARRY {
            let f = t as f32 / CARRY as f32;
            return HandSignal::present(
                lerp(cell_x, CHUTE_X, f),
                HIGH_Y,
                lerp(cell_depth, CHUTE_DEPTH, f),
                true,
            );
        }
        HandSignal::present(CHUTE_X, HIGH_Y, CHUTE_DEPTH, false)
    }

    fn cell(visit: u64) -> (f32, f32) {
        let idx = visit % (GRID * GRID);
        let row = idx / GRID;
        let mut col = idx % GRID;
        if row % 2 == 1 {
            col = GRID - 1 - col;
        }
        (0.3 + col as f32 * 0.1, 0.125 - row as f32 * 0.017)
    }
}

impl Default for SweepSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HandSource for SweepSource {
    fn id(&self) -> &str {
        "sweep"
    }

    fn next_frame(&mut self) -> Option<HandDetection> {
        if self.limit.is_some_and(|limit| self.frame >= limit) {
            return None;
        }
        if let Some(interval) = self.interval {
            thread::sleep(interval);
        }
        let detection = detection_for(Self::signal_at(self.frame));
        self.frame += 1;
        Some(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureNormalizer;

    #[test]
    fn synthetic_hand_normalizes_to_requested_reading() {
        let normalizer = GestureNormalizer::new(0.06);
        for pinching in [false, true] {
            let signal = normalizer.normalize(&HandDetection::single(synthetic_hand(
                0.3, 0.6, 0.12, pinching,
            )));
            assert!(signal.is_present);
            assert!((signal.x - 0.3).abs() < 1e-5);
            assert!((signal.y - 0.6).abs() < 1e-5);
            assert!((signal.depth_proxy - 0.12).abs() < 1e-5);
            assert_eq!(signal.is_pinching, pinching);
        }
    }

    #[test]
    fn detection_for_absent_signal_is_empty() {
        assert_eq!(detection_for(HandSignal::NEUTRAL), HandDetection::no_hand());
    }

    #[test]
    fn sweep_pinches_only_between_close_and_open() {
        let pinched: Vec<bool> = (0..CYCLE)
            .map(|f| SweepSource::signal_at(f).is_pinching)
            .collect();
        let first = pinched.iter().position(|&p| p).unwrap() as u64;
        let last = pinched.iter().rposition(|&p| p).unwrap() as u64;
        assert_eq!(first, TRAVEL + DESCEND);
        assert_eq!(last, CYCLE - OPEN - 1);
    }

    #[test]
    fn sweep_ends_each_visit_over_the_chute() {
        let s = SweepSource::signal_at(CYCLE - 1);
        assert!((s.x - CHUTE_X).abs() < 1e-6);
        assert!((s.depth_proxy - CHUTE_DEPTH).abs() < 1e-6);
        assert!(!s.is_pinching);
    }

    #[test]
    fn sweep_limit_closes_source() {
        let mut source = SweepSource::new().with_limit(3);
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn serpentine_rows_reverse_direction() {
        let (first_row_end, _) = SweepSource::cell(GRID - 1);
        let (second_row_start, _) = SweepSource::cell(GRID);
        assert!((first_row_end - second_row_start).abs() < 1e-6);
    }
}
