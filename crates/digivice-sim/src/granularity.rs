//! Tick granularity selection.
//!
//! Catch-up replays elapsed time as a sequence of discrete ticks. The step
//! between ticks grows with the size of the gap so that long absences stay
//! cheap while short ones keep frame-level resolution. Gaps at or beyond
//! [`NEGLECT_CEILING_MS`] are not simulated at all; the character dies of
//! neglect.

/// One frame at 60 fps.
pub const FRAME_STEP_MS: u64 = 16;

/// Step for gaps under a minute.
pub const SHORT_STEP_MS: u64 = 500;

/// Step for gaps under four hours.
pub const MEDIUM_STEP_MS: u64 = 2_000;

/// Step for gaps under the neglect ceiling.
pub const LONG_STEP_MS: u64 = 60_000;

/// Gaps below this use [`FRAME_STEP_MS`].
pub const FRAME_BUCKET_LIMIT_MS: u64 = 500;

/// Gaps below this use [`SHORT_STEP_MS`].
pub const SHORT_BUCKET_LIMIT_MS: u64 = 60_000;

/// Gaps below this use [`MEDIUM_STEP_MS`].
pub const MEDIUM_BUCKET_LIMIT_MS: u64 = 4 * 60 * 60 * 1_000;

/// Absences of at least this long kill the character outright (three days).
pub const NEGLECT_CEILING_MS: u64 = 3 * 24 * 60 * 60 * 1_000;

/// How an elapsed span is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStep {
    /// Replay with one tick every `n` milliseconds.
    Every(u64),
    /// Skip simulation; the character dies of neglect.
    NeglectCeiling,
}

impl TickStep {
    /// The step in milliseconds, or `None` past the neglect ceiling.
    pub const fn step_ms(self) -> Option<u64> {
        match self {
            Self::Every(step) => Some(step),
            Self::NeglectCeiling => None,
        }
    }
}

/// Pick the tick step for an elapsed span.
///
/// Step size is monotonically non-decreasing in `elapsed_ms`.
pub const fn select_step(elapsed_ms: u64) -> TickStep {
    if elapsed_ms < FRAME_BUCKET_LIMIT_MS {
        TickStep::Every(FRAME_STEP_MS)
    } else if elapsed_ms < SHORT_BUCKET_LIMIT_MS {
        TickStep::Every(SHORT_STEP_MS)
    } else if elapsed_ms < MEDIUM_BUCKET_LIMIT_MS {
        TickStep::Every(MEDIUM_STEP_MS)
    } else if elapsed_ms < NEGLECT_CEILING_MS {
        TickStep::Every(LONG_STEP_MS)
    } else {
        TickStep::NeglectCeiling
    }
}

/// Number of ticks needed to cover `elapsed_ms` at `step_ms`, with the
/// final tick landing exactly on the end of the span.
#[cfg(test)]
pub(crate) const fn tick_count(elapsed_ms: u64, step_ms: u64) -> u64 {
    if step_ms == 0 {
        return 0;
    }
    elapsed_ms.div_ceil(step_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(select_step(0), TickStep::Every(FRAME_STEP_MS));
        assert_eq!(select_step(499), TickStep::Every(FRAME_STEP_MS));
        assert_eq!(select_step(500), TickStep::Every(SHORT_STEP_MS));
        assert_eq!(select_step(59_999), TickStep::Every(SHORT_STEP_MS));
        assert_eq!(select_step(60_000), TickStep::Every(MEDIUM_STEP_MS));
        assert_eq!(
            select_step(MEDIUM_BUCKET_LIMIT_MS - 1),
            TickStep::Every(MEDIUM_STEP_MS)
        );
        assert_eq!(select_step(MEDIUM_BUCKET_LIMIT_MS), TickStep::Every(LONG_STEP_MS));
        assert_eq!(select_step(NEGLECT_CEILING_MS - 1), TickStep::Every(LONG_STEP_MS));
        assert_eq!(select_step(NEGLECT_CEILING_MS), TickStep::NeglectCeiling);
        assert_eq!(select_step(u64::MAX), TickStep::NeglectCeiling);
    }

    #[test]
    fn step_is_monotonic() {
        let samples = [
            0,
            100,
            499,
            500,
            30_000,
            60_000,
            3_600_000,
            MEDIUM_BUCKET_LIMIT_MS,
            86_400_000,
            NEGLECT_CEILING_MS - 1,
        ];
        let mut previous = 0;
        for elapsed in samples {
            let step = select_step(elapsed).step_ms().unwrap_or(u64::MAX);
            assert!(step >= previous, "step shrank at {elapsed}ms");
            previous = step;
        }
    }

    #[test]
    fn neglect_has_no_step() {
        assert_eq!(TickStep::NeglectCeiling.step_ms(), None);
        assert_eq!(TickStep::Every(16).step_ms(), Some(16));
    }

    #[test]
    fn tick_count_rounds_up() {
        assert_eq!(tick_count(0, 16), 0);
        assert_eq!(tick_count(16, 16), 1);
        assert_eq!(tick_count(17, 16), 2);
        assert_eq!(tick_count(600_001, 2_000), 301);
        assert_eq!(tick_count(10, 0), 0);
    }
}
