//! The pure per-tick state transition.
//!
//! [`advance`] maps a prior record, a simulated time, and an environmental
//! signal to the next record plus the status changes it produced. It reads
//! no clock and touches no storage; all randomness comes from the caller's
//! RNG so replays under a seeded generator are exact.
//!
//! # Order of operations
//!
//! 1. Dead characters are terminal: nothing changes
//! 2. Eggs only check for hatching
//! 3. Sickness roll and sick stamina drain
//! 4. Death by starvation
//! 5. Stamina decay
//! 6. Evolution gauge growth and evolution

use digivice_types::{
    CharacterRecord, CharacterSnapshot, CharacterState, CheckCategory, DeathCause,
    EVOLUTION_GAUGE_FULL, EnvironmentalSignal, LifeStage, StatusChange, StatusDelta,
};
use rand::Rng;
use tracing::debug;

use crate::config::{GameRules, TunableProfile};
use crate::scheduler;

/// Inputs for one tick besides the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Simulated time of the tick (epoch ms).
    pub now: u64,
    /// Room conditions at `now`.
    pub env: EnvironmentalSignal,
}

/// Output of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The record after the tick.
    pub record: CharacterRecord,
    /// Changes in the order they happened.
    pub changes: Vec<StatusChange>,
}

/// Apply one tick to `prior`, returning the next record.
pub fn advance(
    prior: &CharacterRecord,
    ctx: TickContext,
    rules: &GameRules,
    rng: &mut impl Rng,
) -> Transition {
    let mut record = prior.clone();
    let mut changes = Vec::new();
    apply_tick(&mut record, ctx, rules, rng, &mut changes);
    Transition { record, changes }
}

/// In-place form of [`advance`], appending changes to `changes`.
pub fn apply_tick(
    record: &mut CharacterRecord,
    ctx: TickContext,
    rules: &GameRules,
    rng: &mut impl Rng,
    changes: &mut Vec<StatusChange>,
) {
    // 1. Dead is terminal
    if record.snapshot.is_dead() {
        return;
    }

    // 2. Eggs do nothing but wait to hatch
    if record.snapshot.life_stage == LifeStage::Egg {
        check_hatch(record, ctx.now, rules, rng, changes);
        return;
    }

    // 3. Sickness
    check_sickness(record, ctx, &rules.profile, rng, changes);

    // 4. Starvation
    if check_starvation(&mut record.snapshot, ctx.now, &rules.profile, changes) {
        return;
    }

    // 5. Stamina decay
    check_stamina(record, ctx.now, &rules.profile, rng, changes);

    // 6. Evolution
    check_evolution(record, ctx.now, rules, rng, changes);
}

/// Probability of falling sick at one roll given the room.
pub fn sickness_probability(profile: &TunableProfile, env: EnvironmentalSignal) -> f64 {
    let p = f64::from(env.unhygienic_object_count).mul_add(
        profile.sickness_probability_per_unhygienic_object,
        profile.base_sickness_probability,
    );
    if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 }
}

/// Kill the character. Returns the change, or `None` if it was already dead.
///
/// Death zeroes stamina and clears the starvation countdown.
pub fn kill(snapshot: &mut CharacterSnapshot, cause: DeathCause, at: u64) -> Option<StatusChange> {
    snapshot.stamina = 0;
    snapshot.time_of_zero_stamina = None;
    if snapshot.is_dead() {
        return None;
    }
    snapshot.state = CharacterState::Dead;
    debug!(character_id = %snapshot.id, %cause, at, "Character died");
    Some(StatusChange {
        at,
        delta: StatusDelta::Died { cause },
    })
}

/// Lower stamina by `amount`, starting the starvation countdown when it
/// first reaches zero.
pub fn decrease_stamina(
    snapshot: &mut CharacterSnapshot,
    amount: u32,
    at: u64,
    changes: &mut Vec<StatusChange>,
) {
    let previous = snapshot.stamina;
    let current = previous.saturating_sub(amount);
    if current == previous {
        return;
    }
    snapshot.stamina = current;
    if current == 0 && snapshot.time_of_zero_stamina.is_none() {
        snapshot.time_of_zero_stamina = Some(at);
    }
    changes.push(StatusChange {
        at,
        delta: StatusDelta::StaminaChanged { previous, current },
    });
}

/// Hatch once strictly more than the egg timeout has passed since laying.
fn check_hatch(
    record: &mut CharacterRecord,
    now: u64,
    rules: &GameRules,
    rng: &mut impl Rng,
    changes: &mut Vec<StatusChange>,
) {
    let waited = now.saturating_sub(record.snapshot.created_at);
    if waited <= rules.profile.egg_hatch_timeout_ms {
        return;
    }

    let snapshot = &mut record.snapshot;
    if let Some(species) = rules.evolution.resolve(&snapshot.species, rng) {
        snapshot.species = species;
    }
    snapshot.life_stage = LifeStage::StageA;
    snapshot.state = CharacterState::Idle;
    scheduler::reset_all(&mut record.scheduler, now, rules.profile.jitter_ratio, rng);

    debug!(character_id = %snapshot.id, species = %snapshot.species, now, "Egg hatched");
    changes.push(StatusChange {
        at: now,
        delta: StatusDelta::Hatched {
            species: snapshot.species.clone(),
        },
    });
}

fn check_sickness(
    record: &mut CharacterRecord,
    ctx: TickContext,
    profile: &TunableProfile,
    rng: &mut impl Rng,
    changes: &mut Vec<StatusChange>,
) {
    if record.snapshot.state.shields_from_sickness() {
        return;
    }
    if !scheduler::category_due(
        &record.scheduler,
        CheckCategory::Sickness,
        ctx.now,
        profile.sickness_check_interval_ms,
    ) {
        return;
    }
    scheduler::fire(
        &mut record.scheduler,
        CheckCategory::Sickness,
        ctx.now,
        profile.jitter_ratio,
        rng,
    );

    if !record.snapshot.sickness {
        let p = sickness_probability(profile, ctx.env);
        if rng.random::<f64>() < p {
            record.snapshot.sickness = true;
            changes.push(StatusChange {
                at: ctx.now,
                delta: StatusDelta::SicknessChanged { sick: true },
            });
        }
    }

    // Sick characters lose an extra point on a half-length stamina interval.
    // The regular stamina clock is left alone.
    if record.snapshot.sickness
        && ctx.now.saturating_sub(record.scheduler.last_stamina_check)
            >= profile.sick_stamina_interval_ms()
    {
        decrease_stamina(
            &mut record.snapshot,
            profile.stamina_decrease_amount,
            ctx.now,
            changes,
        );
    }
}

fn check_starvation(
    snapshot: &mut CharacterSnapshot,
    now: u64,
    profile: &TunableProfile,
    changes: &mut Vec<StatusChange>,
) -> bool {
    let Some(zero_since) = snapshot.time_of_zero_stamina else {
        return false;
    };
    if now.saturating_sub(zero_since) <= profile.death_timeout_after_zero_stamina_ms {
        return false;
    }
    changes.extend(kill(snapshot, DeathCause::Starvation, now));
    true
}

fn check_stamina(
    record: &mut CharacterRecord,
    now: u64,
    profile: &TunableProfile,
    rng: &mut impl Rng,
    changes: &mut Vec<StatusChange>,
) {
    // Once the countdown runs, there is nothing left to decay.
    if record.snapshot.death_countdown_started() {
        return;
    }
    if !scheduler::category_due(
        &record.scheduler,
        CheckCategory::Stamina,
        now,
        profile.stamina_decrease_interval_ms,
    ) {
        return;
    }
    scheduler::fire(
        &mut record.scheduler,
        CheckCategory::Stamina,
        now,
        profile.jitter_ratio,
        rng,
    );
    decrease_stamina(
        &mut record.snapshot,
        profile.stamina_decrease_amount,
        now,
        changes,
    );
}

#[allow(clippy::arithmetic_side_effects)]
fn check_evolution(
    record: &mut CharacterRecord,
    now: u64,
    rules: &GameRules,
    rng: &mut impl Rng,
    changes: &mut Vec<StatusChange>,
) {
    let profile = &rules.profile;
    if record.snapshot.stamina < profile.evolution_stamina_threshold {
        return;
    }
    if !scheduler::category_due(
        &record.scheduler,
        CheckCategory::Evolution,
        now,
        profile.evolution_check_interval_ms,
    ) {
        return;
    }
    scheduler::fire(
        &mut record.scheduler,
        CheckCategory::Evolution,
        now,
        profile.jitter_ratio,
        rng,
    );

    let snapshot = &mut record.snapshot;
    let Some(next_stage) = snapshot.life_stage.next() else {
        return;
    };
    if rules.evolution.is_terminal(&snapshot.species) {
        return;
    }
    let increment = profile
        .evolution_gauge_increment
        .for_stage(snapshot.life_stage);
    if increment <= 0.0 {
        return;
    }

    let gauge = snapshot.evolution_gauge + increment;
    if gauge < EVOLUTION_GAUGE_FULL {
        snapshot.evolution_gauge = gauge;
        changes.push(StatusChange {
            at: now,
            delta: StatusDelta::EvolutionGaugeChanged { gauge },
        });
        return;
    }

    let Some(species) = rules.evolution.resolve(&snapshot.species, rng) else {
        return;
    };
    let from = snapshot.life_stage;
    let remainder = gauge - EVOLUTION_GAUGE_FULL;
    snapshot.life_stage = next_stage;
    snapshot.species.clone_from(&species);
    snapshot.evolution_gauge = remainder;

    debug!(
        character_id = %snapshot.id,
        ?from,
        to = ?next_stage,
        species = %species,
        now,
        "Character evolved"
    );
    changes.push(StatusChange {
        at: now,
        delta: StatusDelta::Evolved {
            from,
            to: next_stage,
            species,
        },
    });
    changes.push(StatusChange {
        at: now,
        delta: StatusDelta::EvolutionGaugeChanged { gauge: remainder },
    });
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::evolution::EvolutionTable;
    use digivice_types::{CheckScheduler, MAX_STAMINA};
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

    fn hatched(species: &str, at: u64) -> CharacterRecord {
        let mut record = CharacterRecord::new_egg(species, at);
        record.snapshot.life_stage = LifeStage::StageA;
        record.scheduler = CheckScheduler::starting_at(at);
        record
    }

    fn tick(now: u64) -> TickContext {
        TickContext {
            now,
            env: EnvironmentalSignal::default(),
        }
    }

    #[test]
    fn dead_character_never_changes() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        kill(&mut record.snapshot, DeathCause::Starvation, 0);
        let out = advance(&record, tick(100 * HOUR), &rules, &mut rng);
        assert_eq!(out.record, record);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn egg_hatches_strictly_after_timeout() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let egg = CharacterRecord::new_egg("speckled_egg", 0);
        let timeout = rules.profile.egg_hatch_timeout_ms;

        let still_egg = advance(&egg, tick(timeout), &rules, &mut rng);
        assert_eq!(still_egg.record.snapshot.life_stage, LifeStage::Egg);

        let out = advance(&egg, tick(timeout + 1), &rules, &mut rng);
        let snap = &out.record.snapshot;
        assert_eq!(snap.life_stage, LifeStage::StageA);
        assert!(snap.species == "mochi" || snap.species == "pebble");
        for category in CheckCategory::ALL {
            assert_eq!(out.record.scheduler.last_fired(category), timeout + 1);
        }
        assert!(matches!(out.changes[0].delta, StatusDelta::Hatched { .. }));
    }

    #[test]
    fn egg_runs_no_other_checks() {
        let mut rules = calm_rules();
        rules.profile.base_sickness_probability = 1.0;
        let mut rng = SmallRng::seed_from_u64(42);
        let egg = CharacterRecord::new_egg("speckled_egg", 0);
        let out = advance(&egg, tick(rules.profile.egg_hatch_timeout_ms), &rules, &mut rng);
        assert_eq!(out.record.snapshot.stamina, MAX_STAMINA);
        assert!(!out.record.snapshot.sickness);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn stamina_decays_once_per_interval() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let record = hatched("mochi", 0);
        let early = advance(&record, tick(HOUR - 1), &rules, &mut rng);
        assert_eq!(early.record.snapshot.stamina, MAX_STAMINA);

        let out = advance(&record, tick(HOUR), &rules, &mut rng);
        assert_eq!(out.record.snapshot.stamina, MAX_STAMINA - 1);
        assert_eq!(out.record.scheduler.last_stamina_check, HOUR);
    }

    #[test]
    fn zero_stamina_starts_countdown_once() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        record.snapshot.stamina = 1;

        let out = advance(&record, tick(HOUR), &rules, &mut rng);
        assert_eq!(out.record.snapshot.stamina, 0);
        assert_eq!(out.record.snapshot.time_of_zero_stamina, Some(HOUR));

        let later = advance(&out.record, tick(2 * HOUR), &rules, &mut rng);
        assert_eq!(later.record.snapshot.time_of_zero_stamina, Some(HOUR));
        assert_eq!(later.record.scheduler.last_stamina_check, HOUR);
    }

    #[test]
    fn starvation_after_timeout() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        record.snapshot.stamina = 0;
        record.snapshot.time_of_zero_stamina = Some(0);
        let timeout = rules.profile.death_timeout_after_zero_stamina_ms;

        let alive = advance(&record, tick(timeout), &rules, &mut rng);
        assert!(!alive.record.snapshot.is_dead());

        let out = advance(&record, tick(timeout + 1), &rules, &mut rng);
        let snap = &out.record.snapshot;
        assert!(snap.is_dead());
        assert_eq!(snap.stamina, 0);
        assert_eq!(snap.time_of_zero_stamina, None);
        assert_eq!(
            out.changes.last().unwrap().delta,
            StatusDelta::Died {
                cause: DeathCause::Starvation
            }
        );
    }

    #[test]
    fn certain_sickness_is_contracted() {
        let mut rules = calm_rules();
        rules.profile.base_sickness_probability = 1.0;
        let mut rng = SmallRng::seed_from_u64(42);
        let record = hatched("mochi", 0);
        let out = advance(
            &record,
            tick(rules.profile.sickness_check_interval_ms),
            &rules,
            &mut rng,
        );
        assert!(out.record.snapshot.sickness);
        assert!(out.changes.contains(&StatusChange {
            at: rules.profile.sickness_check_interval_ms,
            delta: StatusDelta::SicknessChanged { sick: true },
        }));
    }

    #[test]
    fn sleeping_shields_from_sickness_timer() {
        let mut rules = calm_rules();
        rules.profile.base_sickness_probability = 1.0;
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        record.snapshot.state = CharacterState::Sleeping;
        let out = advance(
            &record,
            tick(rules.profile.sickness_check_interval_ms),
            &rules,
            &mut rng,
        );
        assert!(!out.record.snapshot.sickness);
        assert_eq!(out.record.scheduler.last_sickness_check, 0);
    }

    #[test]
    fn unhygienic_objects_raise_probability() {
        let profile = TunableProfile::production();
        let clean = sickness_probability(&profile, EnvironmentalSignal::default());
        let dirty = sickness_probability(
            &profile,
            EnvironmentalSignal {
                unhygienic_object_count: 5,
            },
        );
        assert!((dirty - clean - 0.05).abs() < 1e-9);
        let filthy = sickness_probability(
            &profile,
            EnvironmentalSignal {
                unhygienic_object_count: u32::MAX,
            },
        );
        assert!((filthy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sick_character_loses_extra_stamina_without_moving_stamina_clock() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        record.snapshot.sickness = true;
        let half = rules.profile.sick_stamina_interval_ms();
        assert_eq!(half, rules.profile.sickness_check_interval_ms);

        let out = advance(&record, tick(half), &rules, &mut rng);
        assert_eq!(out.record.snapshot.stamina, MAX_STAMINA - 1);
        assert_eq!(out.record.scheduler.last_stamina_check, 0);
        assert_eq!(out.record.scheduler.last_sickness_check, half);
    }

    #[test]
    fn evolution_needs_stamina_threshold() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        record.snapshot.stamina = rules.profile.evolution_stamina_threshold - 1;
        let out = advance(
            &record,
            tick(rules.profile.evolution_check_interval_ms),
            &rules,
            &mut rng,
        );
        assert!(out.record.snapshot.evolution_gauge.abs() < f64::EPSILON);
        assert_eq!(out.record.scheduler.last_evolution_check, 0);
    }

    #[test]
    fn evolution_gauge_grows_by_stage_increment() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let record = hatched("mochi", 0);
        let out = advance(
            &record,
            tick(rules.profile.evolution_check_interval_ms),
            &rules,
            &mut rng,
        );
        assert!((out.record.snapshot.evolution_gauge - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gauge_overflow_evolves_and_carries_remainder() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("mochi", 0);
        record.snapshot.evolution_gauge = 95.0;
        let out = advance(
            &record,
            tick(rules.profile.evolution_check_interval_ms),
            &rules,
            &mut rng,
        );
        let snap = &out.record.snapshot;
        assert_eq!(snap.life_stage, LifeStage::StageB);
        assert!(snap.species == "fluff" || snap.species == "sprout");
        assert!((snap.evolution_gauge - 5.0).abs() < 1e-9);
    }

    #[test]
    fn terminal_species_does_not_accumulate() {
        let rules = calm_rules();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut record = hatched("loner", 0);
        record.snapshot.evolution_gauge = 50.0;
        let out = advance(
            &record,
            tick(rules.profile.evolution_check_interval_ms),
            &rules,
            &mut rng,
        );
        assert!((out.record.snapshot.evolution_gauge - 50.0).abs() < f64::EPSILON);
        assert_eq!(out.record.snapshot.life_stage, LifeStage::StageA);
    }

    #[test]
    fn kill_is_idempotent() {
        let mut snap = CharacterSnapshot::new_egg("x", 0);
        assert!(kill(&mut snap, DeathCause::Neglect, 5).is_some());
        assert!(kill(&mut snap, DeathCause::Neglect, 6).is_none());
        assert!(snap.is_dead());
    }
}
