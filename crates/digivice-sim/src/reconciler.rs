//! Catch-up over elapsed time.
//!
//! [`catch_up`] replays a span of wall-clock time as discrete ticks at the
//! granularity [`select_step`] picks, folding [`apply_tick`] over them.
//! Ticks land at `from + k * step`, with the last one clamped to `to`, so a
//! span split at a tick boundary replays to the same record as the whole.
//!
//! [`BackgroundReconciler`] wraps this for app resume: load the save, bring
//! it up to date, and persist it exactly once.

use digivice_types::{CharacterRecord, DeathCause, StatusChange};
use rand::Rng;
use tracing::{info, warn};

use crate::config::GameRules;
use crate::environment::EnvironmentSource;
use crate::error::SimError;
use crate::granularity::{TickStep, select_step};
use crate::store::{CharacterStore, SaveState, sanitize};
use crate::transition::{TickContext, apply_tick, kill};

/// Result of a catch-up pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchUp {
    /// The record at the end of the span.
    pub record: CharacterRecord,
    /// Ticks executed.
    pub ticks: u64,
    /// Granularity used for the span.
    pub step: TickStep,
    /// Every change, in order.
    pub changes: Vec<StatusChange>,
}

impl CatchUp {
    /// Whether the pass died of neglect instead of simulating.
    pub fn hit_neglect_ceiling(&self) -> bool {
        self.step == TickStep::NeglectCeiling
    }
}

/// Replay `record` from `from` to `to`.
///
/// A span at or beyond the neglect ceiling is not simulated: the character
/// dies of neglect at `to`, whatever its state. Replay stops early once the
/// character is dead since no later tick can change it.
pub fn catch_up<E>(
    record: &CharacterRecord,
    from: u64,
    to: u64,
    env: &E,
    rules: &GameRules,
    rng: &mut impl Rng,
) -> CatchUp
where
    E: EnvironmentSource + ?Sized,
{
    let elapsed = to.saturating_sub(from);
    let step = select_step(elapsed);
    let mut current = record.clone();
    let mut changes = Vec::new();

    let TickStep::Every(step_ms) = step else {
        changes.extend(kill(&mut current.snapshot, DeathCause::Neglect, to));
        return CatchUp {
            record: current,
            ticks: 0,
            step,
            changes,
        };
    };

    let mut ticks: u64 = 0;
    let mut now = from;
    while now < to && !current.snapshot.is_dead() {
        now = now.saturating_add(step_ms).min(to);
        let ctx = TickContext {
            now,
            env: env.signal_at(now),
        };
        apply_tick(&mut current, ctx, rules, rng, &mut changes);
        ticks = ticks.saturating_add(1);
    }

    CatchUp {
        record: current,
        ticks,
        step,
        changes,
    }
}

/// Outcome of [`BackgroundReconciler::resume`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resumed {
    /// The up-to-date save, already persisted.
    pub save: SaveState,
    /// What the catch-up did.
    pub catch_up: CatchUp,
    /// Whether the save was missing or unreadable and a new egg was laid.
    pub started_fresh: bool,
}

/// Brings a persisted character up to date when the app returns.
#[derive(Debug)]
pub struct BackgroundReconciler<'a, S> {
    store: &'a mut S,
    rules: &'a GameRules,
}

impl<'a, S: CharacterStore> BackgroundReconciler<'a, S> {
    /// A reconciler over `store` using `rules`.
    pub const fn new(store: &'a mut S, rules: &'a GameRules) -> Self {
        Self { store, rules }
    }

    /// Catch up over `elapsed_ms` ending at `now`, then persist once.
    pub fn resume(
        &mut self,
        elapsed_ms: u64,
        now: u64,
        rng: &mut impl Rng,
    ) -> Result<Resumed, SimError> {
        let (save, started_fresh) = self.load_or_fresh(now);
        let from = if started_fresh {
            now
        } else {
            now.saturating_sub(elapsed_ms)
        };
        self.finish(save, from, now, started_fresh, rng)
    }

    /// Catch up from the save's own checkpoint to `now`, then persist once.
    pub fn resume_from_checkpoint(
        &mut self,
        now: u64,
        rng: &mut impl Rng,
    ) -> Result<Resumed, SimError> {
        let (save, started_fresh) = self.load_or_fresh(now);
        let from = save.checkpoint_ms.min(now);
        self.finish(save, from, now, started_fresh, rng)
    }

    fn finish(
        &mut self,
        mut save: SaveState,
        from: u64,
        now: u64,
        started_fresh: bool,
        rng: &mut impl Rng,
    ) -> Result<Resumed, SimError> {
        let env = save
            .world
            .with_stale_threshold(self.rules.profile.stale_food_threshold_ms);
        let outcome = catch_up(&save.record, from, now, &env, self.rules, rng);

        info!(
            character_id = %outcome.record.snapshot.id,
            elapsed_ms = now.saturating_sub(from),
            ticks = outcome.ticks,
            changes = outcome.changes.len(),
            neglected = outcome.hit_neglect_ceiling(),
            "Background catch-up complete"
        );

        save.record.clone_from(&outcome.record);
        save.checkpoint_ms = now;
        self.store.persist(&save)?;

        Ok(Resumed {
            save,
            catch_up: outcome,
            started_fresh,
        })
    }

    fn load_or_fresh(&mut self, now: u64) -> (SaveState, bool) {
        match self.store.load() {
            Ok(Some(mut save)) => {
                let repairs = sanitize(&mut save, now);
                if repairs > 0 {
                    warn!(repairs, "Repaired out-of-range values in save");
                }
                (save, false)
            }
            Ok(None) => {
                info!(species = %self.rules.egg_species, "No save found, laying a new egg");
                (SaveState::fresh(self.rules.egg_species.as_str(), now), true)
            }
            Err(e) => {
                warn!(error = %e, "Save unreadable, laying a new egg");
                (SaveState::fresh(self.rules.egg_species.as_str(), now), true)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::config::TunableProfile;
    use crate::environment::ConstantEnvironment;
    use crate::evolution::EvolutionTable;
    use crate::granularity::{NEGLECT_CEILING_MS, tick_count};
    use crate::store::MemoryStore;
    use digivice_types::{CheckScheduler, LifeStage, MAX_STAMINA};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const HOUR: u64 = 3_600_000;

    fn calm_rules() -> GameRules {
        GameRules {
            profile: TunableProfile {
                base_sickness_probability: 0.0,
                sickness_probability_per_unhygienic_object: 0.0,
                jitter_ratio: 0.0,
                ..TunableProfile::production()
            },
            evolution: EvolutionTable::default(),
            egg_species: "speckled_egg".to_owned(),
        }
    }

    fn hatched_save(at: u64) -> SaveState {
        let mut save = SaveState::fresh("mochi", at);
        save.record.snapshot.life_stage = LifeStage::StageA;
        save.record.scheduler = CheckScheduler::starting_at(at);
        save
    }

    #[test]
    fn zero_span_runs_no_ticks() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let save = hatched_save(0);
        let out = catch_up(&save.record, 500, 500, &ConstantEnvironment::default(), &rules, &mut rng);
        assert_eq!(out.ticks, 0);
        assert_eq!(out.record, save.record);
    }

    #[test]
    fn last_tick_lands_on_end() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let save = hatched_save(0);
        let out = catch_up(&save.record, 0, 1_001, &ConstantEnvironment::default(), &rules, &mut rng);
        assert_eq!(out.step, TickStep::Every(500));
        assert_eq!(out.ticks, 3);
        assert_eq!(out.ticks, tick_count(1_001, 500));
    }

    #[test]
    fn tick_count_matches_plan_for_every_bucket() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let save = hatched_save(0);
        let env = ConstantEnvironment::default();
        for elapsed in [100, 30_000, 2 * HOUR, 9 * HOUR] {
            let out = catch_up(&save.record, 0, elapsed, &env, &rules, &mut rng);
            let step = out.step.step_ms().unwrap();
            assert_eq!(out.ticks, tick_count(elapsed, step), "span {elapsed}");
        }
    }

    #[test]
    fn neglect_kills_without_ticking() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let egg = CharacterRecord::new_egg("speckled_egg", 0);
        let out = catch_up(&egg, 0, NEGLECT_CEILING_MS, &ConstantEnvironment::default(), &rules, &mut rng);
        assert!(out.hit_neglect_ceiling());
        assert_eq!(out.ticks, 0);
        assert!(out.record.snapshot.is_dead());
        assert_eq!(out.record.snapshot.stamina, 0);
    }

    #[test]
    fn replay_stops_once_dead() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut save = hatched_save(0);
        save.record.snapshot.stamina = 0;
        save.record.snapshot.time_of_zero_stamina = Some(0);
        let out = catch_up(&save.record, 0, 24 * HOUR, &ConstantEnvironment::default(), &rules, &mut rng);
        assert!(out.record.snapshot.is_dead());
        assert!(out.ticks < 24 * HOUR / 60_000);
    }

    #[test]
    fn resume_persists_exactly_once() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut store = MemoryStore::with_save(hatched_save(0));
        let resumed = BackgroundReconciler::new(&mut store, &rules)
            .resume(3 * HOUR, 3 * HOUR, &mut rng)
            .unwrap();
        assert!(!resumed.started_fresh);
        assert_eq!(resumed.save.record.snapshot.stamina, MAX_STAMINA - 3);
        assert_eq!(store.persist_count(), 1);
        assert_eq!(store.saved().unwrap().checkpoint_ms, 3 * HOUR);
    }

    #[test]
    fn resume_without_save_lays_egg() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut store = MemoryStore::new();
        let resumed = BackgroundReconciler::new(&mut store, &rules)
            .resume(10 * 24 * HOUR, 50 * HOUR, &mut rng)
            .unwrap();
        assert!(resumed.started_fresh);
        assert_eq!(resumed.catch_up.ticks, 0);
        assert_eq!(resumed.save.record.snapshot.life_stage, LifeStage::Egg);
        assert_eq!(resumed.save.record.snapshot.species, "speckled_egg");
        assert_eq!(store.persist_count(), 1);
    }

    #[test]
    fn resume_from_checkpoint_uses_saved_time() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut save = hatched_save(0);
        save.checkpoint_ms = HOUR;
        save.record.scheduler = CheckScheduler::starting_at(HOUR);
        let mut store = MemoryStore::with_save(save);
        let resumed = BackgroundReconciler::new(&mut store, &rules)
            .resume_from_checkpoint(3 * HOUR, &mut rng)
            .unwrap();
        assert_eq!(resumed.save.record.snapshot.stamina, MAX_STAMINA - 2);
    }

    #[test]
    fn resume_sanitizes_loaded_save() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut save = hatched_save(0);
        save.record.snapshot.stamina = 99;
        let mut store = MemoryStore::with_save(save);
        let resumed = BackgroundReconciler::new(&mut store, &rules)
            .resume(0, 0, &mut rng)
            .unwrap();
        assert_eq!(resumed.save.record.snapshot.stamina, MAX_STAMINA);
    }
}
