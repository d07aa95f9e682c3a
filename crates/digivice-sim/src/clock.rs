//! Wall-clock access.
//!
//! The simulation never reads time on its own. Hosts pass timestamps in,
//! taking them from a [`Clock`].

use chrono::Utc;

/// A source of epoch-millisecond timestamps.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-epoch clocks read as zero.
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now: u64,
}

impl ManualClock {
    /// A clock stopped at `now`.
    pub const fn at(now: u64) -> Self {
        Self { now }
    }

    /// Move forward by `ms`.
    pub const fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }

    /// Jump to `now`, forwards or backwards.
    pub const fn set(&mut self, now: u64) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn manual_clock_moves_on_demand() {
        let mut clock = ManualClock::at(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
        clock.set(u64::MAX);
        clock.advance(1);
        assert_eq!(clock.now_ms(), u64::MAX);
    }
}
