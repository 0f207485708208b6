use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of one play session.  Generated fresh by every session start.
pub type SessionId = Uuid;

/// A point or displacement in play-field space.
///
/// The field is Y-up: `x` runs left/right, `y` is height above the floor and
/// `z` is depth (negative toward the back wall).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Distance measured in the horizontal (x, z) plane, ignoring height.
    pub fn planar_distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Full 3-D Euclidean distance.
    pub fn distance(self, other: Self) -> f32 {
        let dy = self.y - other.y;
        let planar = self.planar_distance(other);
        (planar * planar + dy * dy).sqrt()
    }

    /// Move `t` of the way from `self` toward `target`.
    pub fn lerp(self, target: Self, t: f32) -> Self {
        Self::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
            self.z + (target.z - self.z) * t,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Hand signal
// ────────────────────────────────────────────────────────────────────────────

/// Compact per-frame summary of the tracked hand.
///
/// Produced by the gesture normalizer and replaced whole every frame.  When
/// `is_present` is `false` the remaining fields carry no information; use
/// [`HandSignal::gated`] before making decisions on them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandSignal {
    /// Mirrored wrist x in `[0, 1]` (0 = player's left).
    pub x: f32,
    /// Wrist y in `[0, 1]` (0 = top of the camera frame).
    pub y: f32,
    /// Wrist to middle-knuckle spread.  Larger when the hand is closer.
    pub depth_proxy: f32,
    pub is_pinching: bool,
    pub is_present: bool,
}

impl HandSignal {
    /// Parked signal emitted when no hand is visible.
    pub const NEUTRAL: HandSignal = HandSignal {
        x: 0.5,
        y: 0.5,
        depth_proxy: 0.1,
        is_pinching: false,
        is_present: false,
    };

    /// A present hand with the given readings.
    pub fn present(x: f32, y: f32, depth_proxy: f32, is_pinching: bool) -> Self {
        Self {
            x,
            y,
            depth_proxy,
            is_pinching,
            is_present: true,
        }
    }

    /// Return `self` when a hand is present, otherwise [`HandSignal::NEUTRAL`].
    pub fn gated(self) -> Self {
        if self.is_present { self } else { Self::NEUTRAL }
    }
}

impl Default for HandSignal {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Collectibles
// ────────────────────────────────────────────────────────────────────────────

/// Session-unique identifier of a collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleId(pub u32);

impl std::fmt::Display for CollectibleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cosmetic model selector consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleVariant {
    GiftBox,
    Snowman,
    GingerbreadMan,
    Ornament,
}

impl CollectibleVariant {
    pub const ALL: [CollectibleVariant; 4] = [
        CollectibleVariant::GiftBox,
        CollectibleVariant::Snowman,
        CollectibleVariant::GingerbreadMan,
        CollectibleVariant::Ornament,
    ];

    /// Select a variant by index, wrapping around.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// An object lying in (or held above) the play field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: CollectibleId,
    /// Authoritative only while the collectible is not held.
    pub position: Vec3,
    pub variant: CollectibleVariant,
    /// Tint hue in degrees, `[0, 360)`.
    pub hue: f32,
}

/// Circular scoring zone on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositTarget {
    pub center_x: f32,
    pub center_z: f32,
    pub radius: f32,
}

impl DepositTarget {
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.center_x, 0.0, self.center_z)
    }

    /// Planar distance from `point` to the zone center.
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        self.center().planar_distance(point)
    }

    /// `true` when `point` lies strictly inside the zone radius.
    pub fn contains(&self, point: Vec3) -> bool {
        self.planar_distance(point) < self.radius
    }
}

impl Default for DepositTarget {
    fn default() -> Self {
        Self {
            center_x: -7.0,
            center_z: 7.0,
            radius: 3.5,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Play field
// ────────────────────────────────────────────────────────────────────────────

/// Closed interval `[min, max]` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Reachable volume of the claw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayFieldBounds {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl PlayFieldBounds {
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        Vec3::new(self.x.clamp(p.x), self.y.clamp(p.y), self.z.clamp(p.z))
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }
}

impl Default for PlayFieldBounds {
    fn default() -> Self {
        Self {
            x: AxisRange::new(-9.0, 9.0),
            y: AxisRange::new(2.0, 14.0),
            z: AxisRange::new(-9.0, 15.0),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tunables
// ────────────────────────────────────────────────────────────────────────────

/// Gesture and grab tunables.  Every field has a serde default so partial
/// config files are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClawTuning {
    /// Negate the horizontal offset before clamping.
    #[serde(default)]
    pub invert_horizontal: bool,
    #[serde(default = "default_planar_grab_radius")]
    pub planar_grab_radius: f32,
    #[serde(default = "default_vertical_grab_tolerance")]
    pub vertical_grab_tolerance: f32,
    /// Distance below the claw body at which the fingers close.
    #[serde(default = "default_grip_depth_offset")]
    pub grip_depth_offset: f32,
    /// Thumb-to-index distance (landmark units) below which a pinch registers.
    #[serde(default = "default_pinch_threshold")]
    pub pinch_threshold: f32,
    /// Fraction of the remaining distance to target closed per frame.
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f32,
}

fn default_planar_grab_radius() -> f32 {
    2.5
}
fn default_vertical_grab_tolerance() -> f32 {
    3.5
}
fn default_grip_depth_offset() -> f32 {
    2.5
}
fn default_pinch_threshold() -> f32 {
    0.06
}
fn default_smoothing_factor() -> f32 {
    0.2
}

impl Default for ClawTuning {
    fn default() -> Self {
        Self {
            invert_horizontal: false,
            planar_grab_radius: default_planar_grab_radius(),
            vertical_grab_tolerance: default_vertical_grab_tolerance(),
            grip_depth_offset: default_grip_depth_offset(),
            pinch_threshold: default_pinch_threshold(),
            smoothing_factor: default_smoothing_factor(),
        }
    }
}

impl ClawTuning {
    /// Reject values that would make the claw unusable.
    ///
    /// # Errors
    ///
    /// Returns [`ClawError::InvalidTuning`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ClawError> {
        let positive = [
            ("planar_grab_radius", self.planar_grab_radius),
            ("vertical_grab_tolerance", self.vertical_grab_tolerance),
            ("pinch_threshold", self.pinch_threshold),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ClawError::InvalidTuning {
                    field: field.to_string(),
                    details: format!("{value} must be a positive number"),
                });
            }
        }
        if !self.grip_depth_offset.is_finite() {
            return Err(ClawError::InvalidTuning {
                field: "grip_depth_offset".to_string(),
                details: format!("{} must be finite", self.grip_depth_offset),
            });
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(ClawError::InvalidTuning {
                field: "smoothing_factor".to_string(),
                details: format!("{} must lie in (0, 1]", self.smoothing_factor),
            });
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session-level vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// Lifecycle of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Start,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Start => write!(f, "start"),
            GameStatus::Playing => write!(f, "playing"),
            GameStatus::Won => write!(f, "won"),
            GameStatus::Lost => write!(f, "lost"),
        }
    }
}

/// Informational record of a grab state transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum GrabEvent {
    /// A collectible was attached to the claw.
    Grabbed { id: CollectibleId },
    /// A held collectible was released outside the deposit zone.
    Dropped { id: CollectibleId, position: Vec3 },
    /// A held collectible was released inside the deposit zone and removed.
    Deposited { id: CollectibleId, points: u32 },
}

/// Error type for configuration and replay input.
///
/// The per-frame pipeline itself has no error paths.
#[derive(Error, Debug)]
pub enum ClawError {
    #[error("Invalid tuning for {field}: {details}")]
    InvalidTuning { field: String, details: String },

    #[error("Collectible {0} is already registered")]
    DuplicateCollectible(CollectibleId),

    #[error("Replay input error at line {line}: {details}")]
    Replay { line: usize, details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(3.0, -4.0, 4.0);
        assert!((a.planar_distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_moves_fraction_of_remaining_distance() {
        let p = Vec3::zero().lerp(Vec3::new(10.0, -10.0, 5.0), 0.2);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert!((p.y + 2.0).abs() < 1e-6);
        assert!((p.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn gated_signal_replaces_absent_readings() {
        let stale = HandSignal {
            x: 0.9,
            y: 0.1,
            depth_proxy: 0.4,
            is_pinching: true,
            is_present: false,
        };
        assert_eq!(stale.gated(), HandSignal::NEUTRAL);

        let live = HandSignal::present(0.9, 0.1, 0.4, true);
        assert_eq!(live.gated(), live);
    }

    #[test]
    fn deposit_target_contains_is_strict() {
        let target = DepositTarget::default();
        assert!(target.contains(Vec3::new(-7.0, 0.75, 9.0)));
        assert!(!target.contains(Vec3::new(-7.0, 0.75, 10.5)));
    }

    #[test]
    fn bounds_clamp_to_nearest_edge() {
        let bounds = PlayFieldBounds::default();
        let p = bounds.clamp(Vec3::new(-40.0, 1.0, 99.0));
        assert_eq!(p, Vec3::new(-9.0, 2.0, 15.0));
        assert!(bounds.contains(p));
    }

    #[test]
    fn variant_index_wraps() {
        assert_eq!(CollectibleVariant::from_index(5), CollectibleVariant::Snowman);
    }

    #[test]
    fn tuning_defaults_fill_missing_fields() {
        let tuning: ClawTuning = serde_json::from_str(r#"{"invert_horizontal": true}"#).unwrap();
        assert!(tuning.invert_horizontal);
        assert!((tuning.planar_grab_radius - 2.5).abs() < f32::EPSILON);
        assert!((tuning.smoothing_factor - 0.2).abs() < f32::EPSILON);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn tuning_validation_rejects_bad_smoothing() {
        let tuning = ClawTuning {
            smoothing_factor: 1.5,
            ..ClawTuning::default()
        };
        let err = tuning.validate().unwrap_err();
        assert!(err.to_string().contains("smoothing_factor"));

        let tuning = ClawTuning {
            pinch_threshold: 0.0,
            ..ClawTuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ClawError::InvalidTuning { field, .. }) if field == "pinch_threshold"
        ));
    }

    #[test]
    fn grab_event_roundtrip() {
        let event = GrabEvent::Dropped {
            id: CollectibleId(3),
            position: Vec3::new(1.0, 0.75, -2.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Dropped"));
        let back: GrabEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn game_status_display_and_finish() {
        assert_eq!(GameStatus::Won.to_string(), "won");
        assert!(GameStatus::Lost.is_finished());
        assert!(!GameStatus::Playing.is_finished());
    }

    #[test]
    fn claw_error_display() {
        let err = ClawError::DuplicateCollectible(CollectibleId(7));
        assert!(err.to_string().contains("#7"));
    }
}
