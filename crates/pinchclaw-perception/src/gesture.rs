//! Gesture Normalizer.
//!
//! Reduces one frame of hand-landmark output to a [`HandSignal`].  Only the
//! first detected hand is considered.
//!
//! Three readings are extracted from the 21-point hand topology:
//!
//! - **Position** – the wrist landmark.  The x coordinate is mirrored once
//!   here (`x = 1 − wrist.x`) so that moving the hand to the player's right
//!   moves the claw right, matching a mirrored camera preview.  Nothing
//!   downstream mirrors again.
//! - **Depth proxy** – planar distance from the wrist to the middle-finger
//!   knuckle.  The hand appears larger as it approaches the camera, so a
//!   **closer hand yields a larger value**.
//! - **Pinch** – planar distance between thumb tip and index tip below a
//!   configurable threshold.
//!
//! Frames without a hand, with the wrong landmark count, or with non-finite
//! coordinates produce [`HandSignal::NEUTRAL`].
//!
//! # Example
//!
//! ```rust
//! use pinchclaw_perception::gesture::{GestureNormalizer, HandDetection};
//!
//! let normalizer = GestureNormalizer::new(0.06);
//! let signal = normalizer.normalize(&HandDetection::no_hand());
//! assert!(!signal.is_present);
//! assert_eq!(signal.x, 0.5);
//! ```

use pinchclaw_types::{ClawTuning, HandSignal};
use serde::{Deserialize, Serialize};

/// Indices into the 21-point hand landmark topology.
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    /// Number of landmarks in a complete hand.
    pub const COUNT: usize = 21;
}

/// One landmark in normalized image coordinates (`x`, `y` in `[0, 1]`,
/// `z` relative depth as reported by the tracker).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn planar_distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Raw output of one tracker frame: zero or more hands, each an ordered
/// landmark list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandDetection {
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
}

impl HandDetection {
    /// A frame in which no hand was found.
    pub fn no_hand() -> Self {
        Self::default()
    }

    /// A frame containing exactly one hand.
    pub fn single(landmarks: Vec<Landmark>) -> Self {
        Self {
            hands: vec![landmarks],
        }
    }
}

/// Stateless converter from [`HandDetection`] to [`HandSignal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureNormalizer {
    pinch_threshold: f32,
}

impl GestureNormalizer {
    pub fn new(pinch_threshold: f32) -> Self {
        Self { pinch_threshold }
    }

    pub fn from_tuning(tuning: &ClawTuning) -> Self {
        Self::new(tuning.pinch_threshold)
    }

    pub fn pinch_threshold(&self) -> f32 {
        self.pinch_threshold
    }

    pub fn set_pinch_threshold(&mut self, threshold: f32) {
        self.pinch_threshold = threshold;
    }

    /// Normalize one frame.  Never fails; degraded input yields
    /// [`HandSignal::NEUTRAL`].
    pub fn normalize(&self, detection: &HandDetection) -> HandSignal {
        match detection.hands.first() {
            Some(hand) => self.normalize_hand(hand),
            None => HandSignal::NEUTRAL,
        }
    }

    fn normalize_hand(&self, hand: &[Landmark]) -> HandSignal {
        if hand.len() != landmark::COUNT || !hand.iter().all(|l| l.is_finite()) {
            return HandSignal::NEUTRAL;
        }

        let wrist = hand[landmark::WRIST];
        let pinch_distance = hand[landmark::THUMB_TIP].planar_distance(hand[landmark::INDEX_TIP]);
        let spread = wrist.planar_distance(hand[landmark::MIDDLE_MCP]);

        HandSignal::present(
            1.0 - wrist.x,
            wrist.y,
            spread,
            pinch_distance < self.pinch_threshold,
        )
    }
}

impl Default for GestureNormalizer {
    fn default() -> Self {
        Self::from_tuning(&ClawTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_hand() -> Vec<Landmark> {
        let mut hand = vec![Landmark::new(0.5, 0.5, 0.0); landmark::COUNT];
        hand[landmark::WRIST] = Landmark::new(0.2, 0.7, 0.0);
        hand[landmark::MIDDLE_MCP] = Landmark::new(0.2, 0.55, 0.0);
        hand[landmark::THUMB_TIP] = Landmark::new(0.25, 0.5, 0.0);
        hand[landmark::INDEX_TIP] = Landmark::new(0.35, 0.45, 0.0);
        hand
    }

    #[test]
    fn no_hand_yields_neutral_signal() {
        let signal = GestureNormalizer::default().normalize(&HandDetection::no_hand());
        assert_eq!(signal, HandSignal::NEUTRAL);
        assert!((signal.depth_proxy - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn wrist_x_is_mirrored() {
        let signal = GestureNormalizer::default().normalize(&HandDetection::single(open_hand()));
        assert!(signal.is_present);
        assert!((signal.x - 0.8).abs() < 1e-6);
        assert!((signal.y - 0.7).abs() < 1e-6);
    }

    #[test]
    fn depth_proxy_grows_as_hand_approaches() {
        let normalizer = GestureNormalizer::default();
        let far = normalizer.normalize(&HandDetection::single(open_hand()));

        let mut near_hand = open_hand();
        near_hand[landmark::MIDDLE_MCP] = Landmark::new(0.2, 0.4, 0.0);
        let near = normalizer.normalize(&HandDetection::single(near_hand));

        assert!((far.depth_proxy - 0.15).abs() < 1e-6);
        assert!(near.depth_proxy > far.depth_proxy);
    }

    #[test]
    fn pinch_detected_below_threshold() {
        let normalizer = GestureNormalizer::new(0.06);
        assert!(!normalizer.normalize(&HandDetection::single(open_hand())).is_pinching);

        let mut pinched = open_hand();
        pinched[landmark::INDEX_TIP] = Landmark::new(0.27, 0.52, 0.0);
        assert!(normalizer.normalize(&HandDetection::single(pinched)).is_pinching);
    }

    #[test]
    fn pinch_threshold_is_configurable() {
        let mut normalizer = GestureNormalizer::new(0.06);
        // open_hand's thumb/index gap is ~0.112
        normalizer.set_pinch_threshold(0.2);
        assert!(normalizer.normalize(&HandDetection::single(open_hand())).is_pinching);
    }

    #[test]
    fn partial_landmark_set_is_treated_as_no_hand() {
        let mut hand = open_hand();
        hand.truncate(12);
        let signal = GestureNormalizer::default().normalize(&HandDetection::single(hand));
        assert_eq!(signal, HandSignal::NEUTRAL);
    }

    #[test]
    fn non_finite_landmark_is_treated_as_no_hand() {
        let mut hand = open_hand();
        hand[3].y = f32::NAN;
        let signal = GestureNormalizer::default().normalize(&HandDetection::single(hand));
        assert!(!signal.is_present);
    }

    #[test]
    fn only_first_hand_is_used() {
        let mut second = open_hand();
        second[landmark::WRIST] = Landmark::new(0.9, 0.1, 0.0);
        let detection = HandDetection {
            hands: vec![open_hand(), second],
        };
        let signal = GestureNormalizer::default().normalize(&detection);
        assert!((signal.x - 0.8).abs() < 1e-6);
    }

    #[test]
    fn detection_deserializes_without_z() {
        let json = r#"{"hands":[[{"x":0.1,"y":0.2}]]}"#;
        let detection: HandDetection = serde_json::from_str(json).unwrap();
        assert_eq!(detection.hands[0][0], Landmark::new(0.1, 0.2, 0.0));
    }
}
