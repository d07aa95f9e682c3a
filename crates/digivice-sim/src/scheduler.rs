//! Per-category check scheduling with jitter.
//!
//! Each periodic category (sickness, stamina, evolution) fires when the
//! time since it last fired reaches its base interval scaled by a stored
//! jitter factor. The factor is redrawn every time the category fires, so
//! consecutive intervals differ slightly while replays stay deterministic
//! under a seeded RNG.

use digivice_types::{CheckCategory, CheckScheduler};
use rand::Rng;

/// Interval after applying a jitter factor: `base * (1 + jitter)`, rounded.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::arithmetic_side_effects
)]
pub fn effective_interval_ms(base_ms: u64, jitter: f64) -> u64 {
    let factor = if jitter.is_finite() { 1.0 + jitter } else { 1.0 };
    let scaled = (base_ms as f64) * factor;
    scaled.round().max(0.0) as u64
}

/// Whether a check whose last firing was `last_fired` is due at `now`.
///
/// A `last_fired` in the future (clock moved backwards, or a tampered
/// save) makes the check due immediately so it cannot be suppressed.
pub fn is_due(now: u64, last_fired: u64, base_interval_ms: u64, jitter: f64) -> bool {
    if last_fired > now {
        return true;
    }
    now.saturating_sub(last_fired) >= effective_interval_ms(base_interval_ms, jitter)
}

/// Draw a jitter factor uniformly from `[-ratio, ratio]`.
pub fn draw_jitter(ratio: f64, rng: &mut impl Rng) -> f64 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0.0;
    }
    rng.random_range(-ratio..=ratio)
}

/// Whether `category` is due at `now` given the record's scheduler.
pub fn category_due(
    scheduler: &CheckScheduler,
    category: CheckCategory,
    now: u64,
    base_interval_ms: u64,
) -> bool {
    is_due(
        now,
        scheduler.last_fired(category),
        base_interval_ms,
        scheduler.jitter(category),
    )
}

/// Mark `category` as fired at `now` and redraw its jitter.
pub fn fire(
    scheduler: &mut CheckScheduler,
    category: CheckCategory,
    now: u64,
    jitter_ratio: f64,
    rng: &mut impl Rng,
) {
    let next = draw_jitter(jitter_ratio, rng);
    scheduler.record_firing(category, now, next);
}

/// Restart every category at `now` with fresh jitter (used on hatch).
pub fn reset_all(scheduler: &mut CheckScheduler, now: u64, jitter_ratio: f64, rng: &mut impl Rng) {
    for category in CheckCategory::ALL {
        fire(scheduler, category, now, jitter_ratio, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn zero_jitter_keeps_base_interval() {
        assert_eq!(effective_interval_ms(3_600_000, 0.0), 3_600_000);
    }

    #[test]
    fn jitter_scales_interval() {
        assert_eq!(effective_interval_ms(1_000, 0.1), 1_100);
        assert_eq!(effective_interval_ms(1_000, -0.1), 900);
        assert_eq!(effective_interval_ms(1_000, f64::NAN), 1_000);
    }

    #[test]
    fn due_exactly_at_interval() {
        assert!(!is_due(1_999, 1_000, 1_000, 0.0));
        assert!(is_due(2_000, 1_000, 1_000, 0.0));
        assert!(is_due(5_000, 1_000, 1_000, 0.0));
    }

    #[test]
    fn future_last_fired_is_due() {
        assert!(is_due(1_000, 9_000, 1_000, 0.0));
    }

    #[test]
    fn jitter_draws_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let j = draw_jitter(0.1, &mut rng);
            assert!((-0.1..=0.1).contains(&j), "jitter {j} out of range");
        }
    }

    #[test]
    fn non_positive_ratio_draws_zero() {
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(draw_jitter(0.0, &mut rng).abs() < f64::EPSILON);
        assert!(draw_jitter(-0.5, &mut rng).abs() < f64::EPSILON);
    }

    #[test]
    fn fire_updates_only_that_category() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut scheduler = CheckScheduler::starting_at(0);
        fire(&mut scheduler, CheckCategory::Stamina, 500, 0.1, &mut rng);
        assert_eq!(scheduler.last_stamina_check, 500);
        assert_eq!(scheduler.last_sickness_check, 0);
        assert_eq!(scheduler.last_evolution_check, 0);
        assert!(scheduler.stamina_jitter.abs() <= 0.1);
    }

    #[test]
    fn reset_all_restarts_every_category() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut scheduler = CheckScheduler::starting_at(0);
        reset_all(&mut scheduler, 7_000, 0.0, &mut rng);
        for category in CheckCategory::ALL {
            assert_eq!(scheduler.last_fired(category), 7_000);
            assert!(scheduler.jitter(category).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn category_due_reads_stored_jitter() {
        let mut scheduler = CheckScheduler::starting_at(0);
        scheduler.record_firing(CheckCategory::Evolution, 0, 0.5);
        assert!(!category_due(&scheduler, CheckCategory::Evolution, 1_000, 1_000));
        assert!(category_due(&scheduler, CheckCategory::Evolution, 1_500, 1_000));
    }
}
