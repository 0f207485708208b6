//! [`CollectibleRegistry`] – the live set of collectibles.
//!
//! Items are kept in insertion order.  Iteration order is therefore stable
//! and is what the grab machine uses to break distance ties.
//!
//! # Placement
//!
//! [`CollectibleRegistry::populate`] fills up to `count` slots.  For each slot
//! a planar position is drawn uniformly from the spawn square and rejected if
//! it lies within `min_deposit_distance` of the deposit chute.  After
//! `max_attempts` rejections the slot is skipped, so a large exclusion zone
//! yields fewer collectibles instead of an unbounded loop.

use pinchclaw_types::{
    ClawError, Collectible, CollectibleId, CollectibleVariant, DepositTarget, Vec3,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of the initial collectible layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationPlan {
    /// Number of slots to attempt.
    pub count: usize,
    /// Positions are drawn from `[-h, h)` on both planar axes.
    pub spawn_half_extent: f32,
    /// Height at which collectibles are placed.
    pub spawn_height: f32,
    /// Minimum planar distance from the deposit center.
    pub min_deposit_distance: f32,
    /// Sampling attempts per slot before the slot is skipped.
    pub max_attempts: u32,
}

impl Default for PopulationPlan {
    fn default() -> Self {
        Self {
            count: 14,
            spawn_half_extent: 10.0,
            spawn_height: 1.5,
            min_deposit_distance: 6.0,
            max_attempts: 20,
        }
    }
}

impl PopulationPlan {
    /// Reject plans that cannot be sampled.
    ///
    /// # Errors
    ///
    /// Returns [`ClawError::InvalidTuning`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ClawError> {
        if !(self.spawn_half_extent.is_finite() && self.spawn_half_extent > 0.0) {
            return Err(ClawError::InvalidTuning {
                field: "spawn_half_extent".to_string(),
                details: format!("{} must be a positive number", self.spawn_half_extent),
            });
        }
        let finite = [
            ("spawn_height", self.spawn_height),
            ("min_deposit_distance", self.min_deposit_distance),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ClawError::InvalidTuning {
                    field: field.to_string(),
                    details: format!("{value} must be finite"),
                });
            }
        }
        Ok(())
    }
}

/// Ordered, id-unique set of in-play collectibles.
#[derive(Debug, Clone, Default)]
pub struct CollectibleRegistry {
    items: Vec<Collectible>,
}

impl CollectibleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly sampled layout.
    ///
    /// Slot `i` receives id `i` when accepted.  Returns the number of
    /// collectibles placed, which may be less than `plan.count`.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        plan: &PopulationPlan,
        deposit: &DepositTarget,
    ) -> usize {
        self.items.clear();
        let h = plan.spawn_half_extent;

        for slot in 0..plan.count {
            let placed = (0..plan.max_attempts).find_map(|_| {
                let x = rng.gen_range(-h..h);
                let z = rng.gen_range(-h..h);
                let candidate = Vec3::new(x, plan.spawn_height, z);
                (deposit.planar_distance(candidate) > plan.min_deposit_distance)
                    .then_some(candidate)
            });

            match placed {
                Some(position) => self.items.push(Collectible {
                    id: CollectibleId(slot as u32),
                    position,
                    variant: CollectibleVariant::from_index(
                        rng.gen_range(0..CollectibleVariant::ALL.len()),
                    ),
                    hue: rng.gen_range(0.0..360.0),
                }),
                None => debug!(slot, "no valid placement found; slot skipped"),
            }
        }
        self.items.len()
    }

    /// Add a single collectible.
    ///
    /// # Errors
    ///
    /// Returns [`ClawError::DuplicateCollectible`] when the id is taken.
    pub fn insert(&mut self, collectible: Collectible) -> Result<(), ClawError> {
        if self.contains(collectible.id) {
            return Err(ClawError::DuplicateCollectible(collectible.id));
        }
        self.items.push(collectible);
        Ok(())
    }

    pub fn get(&self, id: CollectibleId) -> Option<&Collectible> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CollectibleId) -> bool {
        self.get(id).is_some()
    }

    /// Overwrite the stored position.  Returns `false` for unknown ids.
    pub fn set_position(&mut self, id: CollectibleId, position: Vec3) -> bool {
        match self.items.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.position = position;
                true
            }
            None => false,
        }
    }

    /// Remove permanently, preserving the order of the remaining items.
    pub fn remove(&mut self, id: CollectibleId) -> Option<Collectible> {
        let idx = self.items.iter().position(|c| c.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn item(id: u32, x: f32, z: f32) -> Collectible {
        Collectible {
            id: CollectibleId(id),
            position: Vec3::new(x, 1.5, z),
            variant: CollectibleVariant::GiftBox,
            hue: 0.0,
        }
    }

    #[test]
    fn default_plan_is_valid() {
        assert!(PopulationPlan::default().validate().is_ok());
    }

    #[test]
    fn non_finite_exclusion_radius_is_rejected() {
        let plan = PopulationPlan {
            min_deposit_distance: f32::INFINITY,
            ..PopulationPlan::default()
        };
        assert!(matches!(
            plan.validate(),
            Err(ClawError::InvalidTuning { field, .. }) if field == "min_deposit_distance"
        ));
    }

    #[test]
    fn populate_respects_deposit_exclusion() {
        let mut rng = StdRng::seed_from_u64(7);
        let deposit = DepositTarget::default();
        let plan = PopulationPlan::default();
        let mut reg = CollectibleRegistry::new();

        let placed = reg.populate(&mut rng, &plan, &deposit);
        assert_eq!(placed, reg.len());
        assert!(placed <= plan.count);
        assert!(placed > 0);
        for c in reg.iter() {
            assert!(deposit.planar_distance(c.position) > plan.min_deposit_distance);
            assert!(c.position.x >= -10.0 && c.position.x < 10.0);
            assert!(c.position.z >= -10.0 && c.position.z < 10.0);
            assert!((c.position.y - 1.5).abs() < f32::EPSILON);
            assert!((0.0..360.0).contains(&c.hue));
        }
    }

    #[test]
    fn populate_assigns_unique_ids() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut reg = CollectibleRegistry::new();
        reg.populate(&mut rng, &PopulationPlan::default(), &DepositTarget::default());
        let mut ids: Vec<_> = reg.iter().map(|c| c.id).collect();
        let n = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[test]
    fn oversized_exclusion_under_populates_without_looping() {
        let mut rng = StdRng::seed_from_u64(1);
        let plan = PopulationPlan {
            min_deposit_distance: 1_000.0,
            ..PopulationPlan::default()
        };
        let mut reg = CollectibleRegistry::new();
        assert_eq!(reg.populate(&mut rng, &plan, &DepositTarget::default()), 0);
        assert!(reg.is_empty());
    }

    #[test]
    fn populate_replaces_previous_contents() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(500, 0.0, 0.0)).unwrap();
        reg.populate(&mut rng, &PopulationPlan::default(), &DepositTarget::default());
        assert!(!reg.contains(CollectibleId(500)));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(1, 0.0, 0.0)).unwrap();
        let err = reg.insert(item(1, 5.0, 5.0)).unwrap_err();
        assert!(matches!(err, ClawError::DuplicateCollectible(CollectibleId(1))));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn set_position_and_lookup() {
        let mut reg = CollectibleRegistry::new();
        reg.insert(item(2, 0.0, 0.0)).unwrap();
        assert!(reg.set_position(CollectibleId(2), Vec3::new(3.0, 0.75, -1.0)));
        assert_eq!(reg.get(CollectibleId(2)).unwrap().position, Vec3::new(3.0, 0.75, -1.0));
        assert!(!reg.set_position(CollectibleId(9), Vec3::zero()));
    }

    #[test]
    fn remove_is_permanent_and_keeps_order() {
        let mut reg = CollectibleRegistry::new();
        for i in 0..3 {
            reg.insert(item(i, i as f32, 0.0)).unwrap();
        }
        let removed = reg.remove(CollectibleId(1)).unwrap();
        assert_eq!(removed.id, CollectibleId(1));
        assert!(reg.remove(CollectibleId(1)).is_none());
        let order: Vec<_> = reg.iter().map(|c| c.id.0).collect();
        assert_eq!(order, vec![0, 2]);
    }
}
