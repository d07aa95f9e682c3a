//! The foreground session loop.
//!
//! [`run_live`] calls [`LiveDriver::on_frame`] on a fixed frame interval
//! until the run limit passes, the shutdown future resolves, or the
//! character dies, then suspends the driver so the final state is saved.

use std::future::Future;
use std::time::Duration;

use digivice_sim::clock::Clock;
use digivice_sim::live::{LiveDriver, StatusListener};
use digivice_sim::store::{CharacterStore, SaveState};
use rand::Rng;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::error::EngineError;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// The configured run time elapsed.
    RunLimitReached,
    /// The shutdown signal fired (Ctrl-C).
    Interrupted,
    /// The character died.
    CharacterDied,
}

/// Result of a session.
#[derive(Debug)]
pub struct SessionResult {
    /// Why the session ended.
    pub end_reason: SessionEndReason,
    /// Frames processed.
    pub frames: u64,
    /// The save as persisted on exit.
    pub save: SaveState,
}

/// Wall-clock time anchored at startup and advanced by tokio's monotonic
/// clock, so paused-time tests move it too.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin_ms: u64,
    start: Instant,
}

impl TokioClock {
    /// A clock reading `origin_ms` now.
    pub fn anchored_at(origin_ms: u64) -> Self {
        Self {
            origin_ms,
            start: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        let elapsed = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.origin_ms.saturating_add(elapsed)
    }
}

/// Drive `driver` until a stop condition, then suspend it.
///
/// A `run_limit` of `None` runs until `shutdown` resolves or the character
/// dies. Persist failures during frames are logged and retried on the next
/// change; a failure while suspending is returned.
pub async fn run_live<S, L, R>(
    mut driver: LiveDriver<'_, S, L, R>,
    clock: &dyn Clock,
    frame_interval: Duration,
    run_limit: Option<Duration>,
    shutdown: impl Future<Output = ()>,
) -> Result<SessionResult, EngineError>
where
    S: CharacterStore,
    L: StatusListener,
    R: Rng,
{
    let mut frames: u64 = 0;
    let mut ticker = tokio::time::interval(frame_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Without a limit the sleep branch is disabled and its deadline unused.
    let deadline = run_limit.and_then(|limit| Instant::now().checked_add(limit));
    let limited = deadline.is_some();
    let limit_sleep = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now));
    tokio::pin!(limit_sleep);
    tokio::pin!(shutdown);

    info!(
        ?frame_interval,
        run_limit_secs = run_limit.map(|l| l.as_secs()),
        "Live session starting"
    );

    let end_reason = loop {
        if driver.snapshot().is_dead() {
            break SessionEndReason::CharacterDied;
        }
        tokio::select! {
            () = &mut shutdown => break SessionEndReason::Interrupted,
            () = &mut limit_sleep, if limited => break SessionEndReason::RunLimitReached,
            _ = ticker.tick() => {
                if let Err(e) = driver.on_frame(clock.now_ms()) {
                    warn!(error = %e, "Frame failed to persist");
                }
                frames = frames.saturating_add(1);
            }
        }
    };

    let save = driver.suspend()?;
    Ok(SessionResult {
        end_reason,
        frames,
        save,
    })
}

/// Log the end of a session.
pub fn log_session_end(result: &SessionResult) {
    let snapshot = &result.save.record.snapshot;
    info!(
        reason = ?result.end_reason,
        frames = result.frames,
        character_id = %snapshot.id,
        species = %snapshot.species,
        stage = ?snapshot.life_stage,
        state = ?snapshot.state,
        stamina = snapshot.stamina,
        sick = snapshot.sickness,
        evolution_gauge = snapshot.evolution_gauge,
        checkpoint_ms = result.save.checkpoint_ms,
        "Session ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use digivice_sim::config::{GameRules, TunableProfile};
    use digivice_sim::evolution::EvolutionTable;
    use digivice_sim::live::NoOpListener;
    use digivice_sim::store::MemoryStore;
    use digivice_types::{CharacterState, LifeStage};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn fast_rules() -> GameRules {
        GameRules {
            profile: TunableProfile {
                base_sickness_probability: 0.0,
                sickness_probability_per_unhygienic_object: 0.0,
                ..TunableProfile::fast_iteration()
            },
            evolution: EvolutionTable::default(),
            egg_species: "speckled_egg".to_owned(),
        }
    }

    fn driver(rules: &GameRules, save: SaveState) -> LiveDriver<'_, MemoryStore, NoOpListener, SmallRng> {
        LiveDriver::new(
            rules,
            save,
            MemoryStore::new(),
            NoOpListener,
            SmallRng::seed_from_u64(42),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn run_limit_ends_session_after_hatching() {
        let rules = fast_rules();
        let clock = TokioClock::anchored_at(0);
        let live = driver(&rules, SaveState::fresh("speckled_egg", 0));

        let result = run_live(
            live,
            &clock,
            Duration::from_millis(100),
            Some(Duration::from_secs(15)),
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::RunLimitReached);
        assert!(result.frames >= 140, "only {} frames", result.frames);
        assert_eq!(result.save.record.snapshot.life_stage, LifeStage::StageA);
        assert!(result.save.checkpoint_ms >= 14_000);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_session() {
        let rules = fast_rules();
        let clock = TokioClock::anchored_at(0);
        let live = driver(&rules, SaveState::fresh("speckled_egg", 0));

        let result = run_live(
            live,
            &clock,
            Duration::from_millis(16),
            None,
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::Interrupted);
        assert_eq!(result.save.record.snapshot.life_stage, LifeStage::Egg);
    }

    #[tokio::test(start_paused = true)]
    async fn death_ends_session() {
        let rules = fast_rules();
        let timeout = rules.profile.death_timeout_after_zero_stamina_ms;
        let mut save = SaveState::fresh("mochi", 0);
        save.record.snapshot.life_stage = LifeStage::StageA;
        save.record.snapshot.stamina = 0;
        save.record.snapshot.time_of_zero_stamina = Some(0);
        let clock = TokioClock::anchored_at(timeout);
        let live = driver(&rules, save);

        let result = run_live(
            live,
            &clock,
            Duration::from_millis(100),
            None,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::CharacterDied);
        assert_eq!(result.save.record.snapshot.state, CharacterState::Dead);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_time() {
        let clock = TokioClock::anchored_at(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(clock.now_ms(), 1_250);
    }
}
