//! [`GrabStateMachine`] – pinch-to-grab, release-to-drop.
//!
//! Two states, evaluated once per frame after the claw has moved:
//!
//! | State | Input | Effect |
//! |---|---|---|
//! | `Empty` | pinching | grab the nearest eligible collectible, if any |
//! | `Holding(id)` | not pinching | drop at floor level; deposit if over the chute |
//! | `Empty` | not pinching | nothing |
//! | `Holding(id)` | pinching | nothing |
//!
//! # Eligibility
//!
//! The fingers close `grip_depth_offset` below the claw body.  A collectible
//! is eligible when its planar distance to the claw is below
//! `planar_grab_radius` **and** its height differs from the grip point by
//! less than `vertical_grab_tolerance`.  Among eligible collectibles the one
//! with the smallest `sqrt(planar² + vertical²)` wins; on equal scores the
//! earlier one in registry order is kept.
//!
//! # Example
//!
//! ```rust
//! use pinchclaw_kernel::grab::{GrabConfig, GrabState, GrabStateMachine};
//! use pinchclaw_kernel::registry::CollectibleRegistry;
//! use pinchclaw_kernel::score::{Scoreboard, SessionRules};
//! use pinchclaw_types::{Collectible, CollectibleId, CollectibleVariant, Vec3};
//!
//! let mut registry = CollectibleRegistry::new();
//! registry.insert(Collectible {
//!     id: CollectibleId(0),
//!     position: Vec3::new(1.0, 1.5, 0.0),
//!     variant: CollectibleVariant::Snowman,
//!     hue: 120.0,
//! }).unwrap();
//!
//! let mut score = Scoreboard::new(SessionRules::default());
//! let mut machine = GrabStateMachine::new(GrabConfig::default());
//!
//! // Claw at (0, 4, 0): grip point at y = 1.5, planar distance 1.0.
//! machine.step(Vec3::new(0.0, 4.0, 0.0), true, &mut registry, &mut score);
//! assert_eq!(machine.state(), GrabState::Holding(CollectibleId(0)));
//! ```

use pinchclaw_types::{ClawTuning, CollectibleId, DepositTarget, GrabEvent, Vec3};
use tracing::{debug, error, info};

use crate::registry::CollectibleRegistry;
use crate::score::ScoreSink;

/// Geometry and payout of the grab logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabConfig {
    pub planar_grab_radius: f32,
    pub vertical_grab_tolerance: f32,
    pub grip_depth_offset: f32,
    /// Height at which released collectibles come to rest.
    pub resting_height: f32,
    pub points_per_deposit: u32,
    pub deposit: DepositTarget,
}

impl GrabConfig {
    pub fn from_tuning(tuning: &ClawTuning, deposit: DepositTarget) -> Self {
        Self {
            planar_grab_radius: tuning.planar_grab_radius,
            vertical_grab_tolerance: tuning.vertical_grab_tolerance,
            grip_depth_offset: tuning.grip_depth_offset,
            deposit,
            ..Self::default()
        }
    }
}

impl Default for GrabConfig {
    fn default() -> Self {
        let tuning = ClawTuning::default();
        Self {
            planar_grab_radius: tuning.planar_grab_radius,
            vertical_grab_tolerance: tuning.vertical_grab_tolerance,
            grip_depth_offset: tuning.grip_depth_offset,
            resting_height: 0.75,
            points_per_deposit: 100,
            deposit: DepositTarget::default(),
        }
    }
}

/// What the claw is holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrabState {
    #[default]
    Empty,
    Holding(CollectibleId),
}

/// The per-frame grab/release decision maker.
#[derive(Debug, Clone)]
pub struct GrabStateMachine {
    config: GrabConfig,
    state: GrabState,
}

impl GrabStateMachine {
    pub fn new(config: GrabConfig) -> Self {
        Self {
            config,
            state: GrabState::Empty,
        }
    }

    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    pub fn state(&self) -> GrabState {
        self.state
    }

    pub fn held(&self) -> Option<CollectibleId> {
        match self.state {
            GrabState::Holding(id) => Some(id),
            GrabState::Empty => None,
        }
    }

    /// Where the fingers close for a claw at `claw`.
    pub fn grip_point(&self, claw: Vec3) -> Vec3 {
        Vec3::new(claw.x, claw.y - self.config.grip_depth_offset, claw.z)
    }

    /// Evaluate one frame.  `claw` must already be this frame's position.
    pub fn step(
        &mut self,
        claw: Vec3,
        pinching: bool,
        registry: &mut CollectibleRegistry,
        score: &mut dyn ScoreSink,
    ) -> Option<GrabEvent> {
        match (self.state, pinching) {
            (GrabState::Empty, true) => self.try_grab(claw, registry),
            (GrabState::Holding(_), false) => self.release(claw, registry, score),
            _ => None,
        }
    }

    /// Attach the best eligible collectible.  No-op while holding or when
    /// nothing is in reach.
    pub fn try_grab(&mut self, claw: Vec3, registry: &CollectibleRegistry) -> Option<GrabEvent> {
        if self.state != GrabState::Empty {
            return None;
        }
        let id = self.find_candidate(claw, registry)?;
        self.state = GrabState::Holding(id);
        debug!(collectible = %id, x = claw.x, y = claw.y, z = claw.z, "grabbed");
        Some(GrabEvent::Grabbed { id })
    }

    /// Let go of the held collectible.  No-op while empty.
    pub fn release(
        &mut self,
        claw: Vec3,
        registry: &mut CollectibleRegistry,
        score: &mut dyn ScoreSink,
    ) -> Option<GrabEvent> {
        let GrabState::Holding(id) = self.state else {
            return None;
        };
        self.state = GrabState::Empty;

        let drop_at = Vec3::new(claw.x, self.config.resting_height, claw.z);
        let found = registry.set_position(id, drop_at);
        debug_assert!(found, "held collectible {id} is not in the registry");
        if !found {
            error!(collectible = %id, "held collectible missing from registry; claw reset");
            return None;
        }

        if self.config.deposit.contains(drop_at) {
            registry.remove(id);
            score.award(self.config.points_per_deposit);
            info!(collectible = %id, points = self.config.points_per_deposit, "deposited");
            Some(GrabEvent::Deposited {
                id,
                points: self.config.points_per_deposit,
            })
        } else {
            debug!(collectible = %id, x = drop_at.x, z = drop_at.z, "dropped outside chute");
            Some(GrabEvent::Dropped {
                id,
                position: drop_at,
            })
        }
    }

    /// The collectible a pinch at `claw` would pick up.
    pub fn find_candidate(
        &self,
        claw: Vec3,
        registry: &CollectibleRegistry,
    ) -> Option<CollectibleId> {
        let grip = self.grip_point(claw);
        let mut best: Option<(CollectibleId, f32)> = None;

        for c in registry.iter() {
            let planar = c.position.planar_distance(claw);
            let vertical = (c.position.y - grip.y).abs();
            if planar >= self.config.planar_grab_radius
                || vertical >= self.config.vertical_grab_tolerance
            {
                continue;
            }
            let score = (planar * planar + vertical * vertical).sqrt();
            if best.is_none_or(|(_, d)| score < d) {
                best = Some((c.id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Forget the held reference without touching the registry.
    pub fn clear(&mut self) {
        self.state = GrabState::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{Scoreboard, SessionRules};
    use pinchclaw_types::{Collectible, CollectibleVariant};

    const CLAW_Y: f32 = 4.0; // grip point at 1.5

    fn item(id: u32, position: Vec3) -> Collectible {
        Collectible {
            id: CollectibleId(id),
            position,
            variant: CollectibleVariant::Ornament,
            hue: 200.0,
        }
    }

    fn board() -> Scoreboard {
        let mut b = Scoreboard::new(SessionRules::default());
        b.start();
        b
    }

    fn holding(id: u32) -> GrabState {
        GrabState::Holding(CollectibleId(id))
    }

    #[test]
    fn pinch_grabs_single_eligible_collectible() {
        let mut reg = CollectibleRegistry::new();
        // planar 1.0, vertical |2.0 − 1.5| = 0.5
        reg.insert(item(4, Vec3::new(1.0, 2.0, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();

        let ev = m.step(Vec3::new(0.0, CLAW_Y, 0.0), true, &mut reg, &mut score);
        assert_eq!(ev, Some(GrabEvent::Grabbed { id: CollectibleId(4) }));
        assert_eq!(m.state(), holding(4));
        assert_eq!(m.held(), Some(CollectibleId(4)));
    }

    #[test]
    fn pinch_with_nothing_in_reach_stays_empty() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(0, Vec3::new(2.6, 1.5, 0.0))).unwrap(); // planar too far
        reg.insert(item(1, Vec3::new(0.0, 5.5, 0.0))).unwrap(); // vertical 4.0 too far
        let before: Vec<Collectible> = reg.iter().copied().collect();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();

        let ev = m.step(Vec3::new(0.0, CLAW_Y, 0.0), true, &mut reg, &mut score);
        assert_eq!(ev, None);
        assert_eq!(m.state(), GrabState::Empty);
        let after: Vec<Collectible> = reg.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn nearest_combined_distance_wins() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(0, Vec3::new(0.2, 4.0, 0.0))).unwrap(); // planar 0.2, vertical 2.5
        reg.insert(item(1, Vec3::new(1.0, 1.5, 0.0))).unwrap(); // planar 1.0, vertical 0
        let m = GrabStateMachine::new(GrabConfig::default());
        assert_eq!(
            m.find_candidate(Vec3::new(0.0, CLAW_Y, 0.0), &reg),
            Some(CollectibleId(1))
        );
    }

    #[test]
    fn ties_go_to_registry_order() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(7, Vec3::new(1.0, 1.5, 0.0))).unwrap();
        reg.insert(item(3, Vec3::new(-1.0, 1.5, 0.0))).unwrap();
        reg.insert(item(5, Vec3::new(0.0, 1.5, 1.0))).unwrap();
        let m = GrabStateMachine::new(GrabConfig::default());
        assert_eq!(
            m.find_candidate(Vec3::new(0.0, CLAW_Y, 0.0), &reg),
            Some(CollectibleId(7))
        );
    }

    #[test]
    fn pinching_while_holding_is_a_noop() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(0, Vec3::new(0.0, 1.5, 0.0))).unwrap();
        reg.insert(item(1, Vec3::new(0.5, 1.5, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();
        let claw = Vec3::new(0.0, CLAW_Y, 0.0);

        m.step(claw, true, &mut reg, &mut score);
        for _ in 0..10 {
            assert_eq!(m.step(claw, true, &mut reg, &mut score), None);
        }
        assert_eq!(m.state(), holding(0));
    }

    #[test]
    fn release_inside_chute_deposits_and_scores() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(2, Vec3::new(0.0, 1.5, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();

        m.step(Vec3::new(0.0, CLAW_Y, 0.0), true, &mut reg, &mut score);
        // Chute center (-7, 7), radius 3.5: release 2.0 away.
        let ev = m.step(Vec3::new(-7.0, 10.0, 9.0), false, &mut reg, &mut score);
        assert_eq!(
            ev,
            Some(GrabEvent::Deposited {
                id: CollectibleId(2),
                points: 100
            })
        );
        assert!(!reg.contains(CollectibleId(2)));
        assert_eq!(score.score(), 100);
        assert_eq!(m.state(), GrabState::Empty);
    }

    #[test]
    fn release_outside_chute_leaves_collectible_on_floor() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(2, Vec3::new(0.0, 1.5, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();

        m.step(Vec3::new(0.0, CLAW_Y, 0.0), true, &mut reg, &mut score);
        // 5.0 away from the chute center.
        let ev = m.step(Vec3::new(-7.0, 10.0, 2.0), false, &mut reg, &mut score);
        let drop_at = Vec3::new(-7.0, 0.75, 2.0);
        assert_eq!(
            ev,
            Some(GrabEvent::Dropped {
                id: CollectibleId(2),
                position: drop_at
            })
        );
        assert_eq!(reg.get(CollectibleId(2)).unwrap().position, drop_at);
        assert_eq!(score.score(), 0);
        assert_eq!(m.state(), GrabState::Empty);
    }

    #[test]
    fn dropped_collectible_can_be_grabbed_again() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(2, Vec3::new(0.0, 1.5, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();

        m.step(Vec3::new(0.0, CLAW_Y, 0.0), true, &mut reg, &mut score);
        m.step(Vec3::new(3.0, CLAW_Y, 3.0), false, &mut reg, &mut score);
        // Resting height 0.75; a claw at y = 3.0 grips at 0.5.
        let ev = m.step(Vec3::new(3.0, 3.0, 3.0), true, &mut reg, &mut score);
        assert_eq!(ev, Some(GrabEvent::Grabbed { id: CollectibleId(2) }));
    }

    #[test]
    fn second_release_is_a_noop() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(2, Vec3::new(0.0, 1.5, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();
        let claw = Vec3::new(0.0, CLAW_Y, 0.0);

        m.step(claw, true, &mut reg, &mut score);
        assert!(m.release(claw, &mut reg, &mut score).is_some());
        let snapshot: Vec<Collectible> = reg.iter().copied().collect();
        assert_eq!(m.release(claw, &mut reg, &mut score), None);
        assert_eq!(m.step(claw, false, &mut reg, &mut score), None);
        let after: Vec<Collectible> = reg.iter().copied().collect();
        assert_eq!(snapshot, after);
        assert_eq!(score.score(), 0);
    }

    #[test]
    fn at_most_one_collectible_is_ever_held() {
        let mut reg = CollectibleRegistry::new();
        for i in 0..5 {
            reg.insert(item(i, Vec3::new(i as f32 * 0.3, 1.5, 0.0))).unwrap();
        }
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();

        let path = [(0.0, true), (0.6, true), (1.2, false), (0.3, true), (-7.0, false)];
        for (x, pinch) in path {
            let z = if x < -5.0 { 7.0 } else { 0.0 };
            m.step(Vec3::new(x, CLAW_Y, z), pinch, &mut reg, &mut score);
            if let Some(id) = m.held() {
                assert!(reg.contains(id));
            }
        }
        assert_eq!(m.state(), GrabState::Empty);
        assert_eq!(reg.len(), 4);
        assert_eq!(score.score(), 100);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "not in the registry")]
    fn missing_held_collectible_asserts_in_debug() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(2, Vec3::new(0.0, 1.5, 0.0))).unwrap();
        let mut m = GrabStateMachine::new(GrabConfig::default());
        let mut score = board();
        let claw = Vec3::new(0.0, CLAW_Y, 0.0);
        m.step(claw, true, &mut reg, &mut score);
        reg.clear();
        m.step(claw, false, &mut reg, &mut score);
    }
}
