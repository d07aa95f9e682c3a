//! Environmental signal sources.
//!
//! The transition engine does not look at the room itself. It receives an
//! [`EnvironmentalSignal`] per tick from an [`EnvironmentSource`], which is
//! asked for the signal at each simulated time so that food going stale
//! mid-catch-up is accounted for at the right tick.

use digivice_types::{EnvironmentalSignal, WorldObject};
use serde::{Deserialize, Serialize};

/// Supplies the environmental signal at a simulated time.
pub trait EnvironmentSource {
    /// The signal as it stood at `at` (epoch ms).
    fn signal_at(&self, at: u64) -> EnvironmentalSignal;
}

/// A source that reports the same signal at every time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstantEnvironment(pub EnvironmentalSignal);

impl ConstantEnvironment {
    /// A constant signal with `count` unhygienic objects.
    pub const fn with_unhygienic(count: u32) -> Self {
        Self(EnvironmentalSignal {
            unhygienic_object_count: count,
        })
    }
}

impl EnvironmentSource for ConstantEnvironment {
    fn signal_at(&self, _at: u64) -> EnvironmentalSignal {
        self.0
    }
}

/// Objects lying in the character's room. Persisted with the save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldObjects {
    objects: Vec<WorldObject>,
}

impl WorldObjects {
    /// An empty room.
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Every object in placement order.
    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    /// Number of objects of any kind.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the room is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Drop a piece of waste at `at`.
    pub fn drop_waste(&mut self, at: u64) {
        self.objects.push(WorldObject::Waste { dropped_at: at });
    }

    /// Place food at `at`.
    pub fn place_food(&mut self, at: u64) {
        self.objects.push(WorldObject::Food { placed_at: at });
    }

    /// Remove all waste. Returns how many pieces were removed.
    pub fn clean_waste(&mut self) -> usize {
        let before = self.objects.len();
        self.objects
            .retain(|object| !matches!(object, WorldObject::Waste { .. }));
        before.saturating_sub(self.objects.len())
    }

    /// Whether any food is lying in the room.
    pub fn has_food(&self) -> bool {
        self.objects
            .iter()
            .any(|object| matches!(object, WorldObject::Food { .. }))
    }

    /// Remove the oldest food. Returns whether any food was present.
    pub fn take_food(&mut self) -> bool {
        let oldest = self
            .objects
            .iter()
            .enumerate()
            .filter_map(|(index, object)| match object {
                WorldObject::Food { placed_at } => Some((index, *placed_at)),
                WorldObject::Waste { .. } => None,
            })
            .min_by_key(|&(_, placed_at)| placed_at)
            .map(|(index, _)| index);
        let Some(index) = oldest else {
            return false;
        };
        self.objects.remove(index);
        true
    }

    /// Waste present at `at` plus food that has been lying for longer than
    /// `stale_food_threshold_ms` by then.
    pub fn unhygienic_count(&self, at: u64, stale_food_threshold_ms: u64) -> u32 {
        let count = self
            .objects
            .iter()
            .filter(|object| match **object {
                WorldObject::Waste { dropped_at } => dropped_at <= at,
                WorldObject::Food { placed_at } => {
                    placed_at <= at && at.saturating_sub(placed_at) > stale_food_threshold_ms
                }
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Bind a stale threshold to produce an [`EnvironmentSource`].
    pub const fn with_stale_threshold(&self, stale_food_threshold_ms: u64) -> WorldEnvironment<'_> {
        WorldEnvironment {
            world: self,
            stale_food_threshold_ms,
        }
    }
}

/// A room viewed through a stale-food threshold.
#[derive(Debug, Clone, Copy)]
pub struct WorldEnvironment<'a> {
    world: &'a WorldObjects,
    stale_food_threshold_ms: u64,
}

impl EnvironmentSource for WorldEnvironment<'_> {
    fn signal_at(&self, at: u64) -> EnvironmentalSignal {
        EnvironmentalSignal {
            unhygienic_object_count: self
                .world
                .unhygienic_count(at, self.stale_food_threshold_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_source_ignores_time() {
        let source = ConstantEnvironment::with_unhygienic(3);
        assert_eq!(source.signal_at(0).unhygienic_object_count, 3);
        assert_eq!(source.signal_at(u64::MAX).unhygienic_object_count, 3);
    }

    #[test]
    fn waste_counts_once_dropped() {
        let mut world = WorldObjects::new();
        world.drop_waste(1_000);
        assert_eq!(world.unhygienic_count(999, 60_000), 0);
        assert_eq!(world.unhygienic_count(1_000, 60_000), 1);
    }

    #[test]
    fn food_counts_only_once_stale() {
        let mut world = WorldObjects::new();
        world.place_food(0);
        assert_eq!(world.unhygienic_count(60_000, 60_000), 0);
        assert_eq!(world.unhygienic_count(60_001, 60_000), 1);
    }

    #[test]
    fn stale_food_appears_mid_span() {
        let mut world = WorldObjects::new();
        world.drop_waste(0);
        world.place_food(0);
        let source = world.with_stale_threshold(10_000);
        assert_eq!(source.signal_at(5_000).unhygienic_object_count, 1);
        assert_eq!(source.signal_at(20_000).unhygienic_object_count, 2);
    }

    #[test]
    fn clean_waste_keeps_food() {
        let mut world = WorldObjects::new();
        world.drop_waste(0);
        world.drop_waste(10);
        world.place_food(20);
        assert_eq!(world.clean_waste(), 2);
        assert_eq!(world.len(), 1);
        assert_eq!(world.clean_waste(), 0);
    }

    #[test]
    fn take_food_removes_oldest() {
        let mut world = WorldObjects::new();
        world.place_food(500);
        world.place_food(100);
        assert!(world.take_food());
        assert_eq!(world.objects(), &[WorldObject::Food { placed_at: 500 }]);
        assert!(world.take_food());
        assert!(!world.take_food());
        assert!(world.is_empty());
    }
}
