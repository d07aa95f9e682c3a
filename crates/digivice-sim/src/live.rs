//! Foreground frame driver.
//!
//! While the app is visible the host calls [`LiveDriver::on_frame`] once
//! per rendered frame. Each call replays the time since the previous frame
//! through the same catch-up path the background reconciler uses, notifies
//! the [`StatusListener`] of every change, and persists whenever the record
//! moved. Player care actions go through the driver too so the listener and
//! the save stay in step with them.

use digivice_types::{CharacterRecord, CharacterSnapshot, CharacterState, StatusChange};
use rand::Rng;
use tracing::{debug, info};

use crate::care;
use crate::config::GameRules;
use crate::error::SimError;
use crate::reconciler::catch_up;
use crate::store::{CharacterStore, SaveState};

/// Receives status changes as they happen.
pub trait StatusListener {
    /// Called once per change, with the snapshot after the whole frame.
    fn on_status_changed(&mut self, change: &StatusChange, snapshot: &CharacterSnapshot);
}

/// A listener that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl StatusListener for NoOpListener {
    fn on_status_changed(&mut self, _change: &StatusChange, _snapshot: &CharacterSnapshot) {}
}

/// What one frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Changes emitted.
    pub changes: usize,
    /// Whether the save was written.
    pub persisted: bool,
}

/// Drives a character frame by frame while the app is in the foreground.
#[derive(Debug)]
pub struct LiveDriver<'r, S, L, R> {
    rules: &'r GameRules,
    store: S,
    listener: L,
    rng: R,
    save: SaveState,
    last_frame_ms: u64,
}

impl<'r, S, L, R> LiveDriver<'r, S, L, R>
where
    S: CharacterStore,
    L: StatusListener,
    R: Rng,
{
    /// Start driving `save`, treating its checkpoint as the previous frame.
    pub const fn new(rules: &'r GameRules, save: SaveState, store: S, listener: L, rng: R) -> Self {
        let last_frame_ms = save.checkpoint_ms;
        Self {
            rules,
            store,
            listener,
            rng,
            save,
            last_frame_ms,
        }
    }

    /// The current character.
    pub const fn snapshot(&self) -> &CharacterSnapshot {
        &self.save.record.snapshot
    }

    /// The current save, including the room.
    pub const fn save(&self) -> &SaveState {
        &self.save
    }

    /// Time of the last processed frame.
    pub const fn last_frame_ms(&self) -> u64 {
        self.last_frame_ms
    }

    /// The store backing this driver.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The listener receiving changes.
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    /// Advance to `now`. Frames at or before the previous one do nothing.
    pub fn on_frame(&mut self, now: u64) -> Result<FrameSummary, SimError> {
        if now <= self.last_frame_ms {
            return Ok(FrameSummary::default());
        }

        let env = self
            .save
            .world
            .with_stale_threshold(self.rules.profile.stale_food_threshold_ms);
        let outcome = catch_up(
            &self.save.record,
            self.last_frame_ms,
            now,
            &env,
            self.rules,
            &mut self.rng,
        );
        self.last_frame_ms = now;

        let changed = outcome.record != self.save.record;
        self.save.record = outcome.record;
        for change in &outcome.changes {
            self.listener
                .on_status_changed(change, &self.save.record.snapshot);
        }
        if changed {
            self.checkpoint(now)?;
        }

        Ok(FrameSummary {
            ticks: outcome.ticks,
            changes: outcome.changes.len(),
            persisted: changed,
        })
    }

    /// Feed the character.
    pub fn increase_stamina(&mut self, amount: u32, now: u64) -> Result<(), SimError> {
        self.apply_care(now, |record, at| {
            care::increase_stamina(record, amount, at)
        })
    }

    /// Let the character eat the oldest food in the room, gaining `amount`
    /// stamina. Returns `false` when there was no food to eat.
    pub fn eat_food(&mut self, amount: u32, now: u64) -> Result<bool, SimError> {
        self.on_frame(now)?;
        if !self.save.world.has_food() {
            return Ok(false);
        }
        self.apply_care(now, |record, at| {
            care::increase_stamina(record, amount, at)
        })?;
        self.save.world.take_food();
        let at = self.last_frame_ms;
        self.checkpoint(at)?;
        Ok(true)
    }

    /// Give the character medicine.
    pub fn cure_sickness(&mut self, now: u64) -> Result<(), SimError> {
        self.apply_care(now, |record, at| care::cure_sickness(&mut record.snapshot, at))
    }

    /// Put the character to bed, wake it, or start it eating or walking.
    pub fn set_activity(&mut self, state: CharacterState, now: u64) -> Result<(), SimError> {
        self.apply_care(now, |record, at| {
            care::set_activity(&mut record.snapshot, state, at)
        })
    }

    /// Record a piece of waste dropped at `now`.
    pub fn drop_waste(&mut self, now: u64) -> Result<(), SimError> {
        self.on_frame(now)?;
        self.save.world.drop_waste(now);
        self.checkpoint(now)
    }

    /// Place food in the room at `now`.
    pub fn place_food(&mut self, now: u64) -> Result<(), SimError> {
        self.on_frame(now)?;
        self.save.world.place_food(now);
        self.checkpoint(now)
    }

    /// Clean up all waste. Returns how many pieces were removed.
    pub fn clean_waste(&mut self, now: u64) -> Result<usize, SimError> {
        self.on_frame(now)?;
        let removed = self.save.world.clean_waste();
        if removed > 0 {
            self.checkpoint(now)?;
        }
        Ok(removed)
    }

    /// Persist at the last frame and hand back the save. Called when the
    /// app leaves the foreground.
    pub fn suspend(mut self) -> Result<SaveState, SimError> {
        let at = self.last_frame_ms;
        self.checkpoint(at)?;
        info!(
            character_id = %self.save.record.snapshot.id,
            checkpoint_ms = at,
            "Live session suspended"
        );
        Ok(self.save)
    }

    fn apply_care<F>(&mut self, now: u64, action: F) -> Result<(), SimError>
    where
        F: FnOnce(&mut CharacterRecord, u64) -> Result<Option<StatusChange>, SimError>,
    {
        self.on_frame(now)?;
        let at = self.last_frame_ms;
        if let Some(change) = action(&mut self.save.record, at)? {
            debug!(delta = ?change.delta, at, "Care action applied");
            self.listener
                .on_status_changed(&change, &self.save.record.snapshot);
            self.checkpoint(at)?;
        }
        Ok(())
    }

    fn checkpoint(&mut self, now: u64) -> Result<(), SimError> {
        self.save.checkpoint_ms = now;
        self.store.persist(&self.save)?;
        Ok(())
    }
}
