//! Host-driven care actions.
//!
//! Feeding, curing, and activity changes come from the player, not from the
//! clock. Each action validates that it applies to the current character
//! and returns the change it produced, if any. A dead character accepts no
//! actions.

use digivice_types::{
    CharacterRecord, CharacterSnapshot, CharacterState, CheckCategory, MAX_STAMINA, StatusChange,
    StatusDelta,
};

use crate::error::SimError;

fn ensure_alive(snapshot: &CharacterSnapshot) -> Result<(), SimError> {
    if snapshot.is_dead() {
        return Err(SimError::CharacterDead { id: snapshot.id });
    }
    Ok(())
}

fn ensure_hatched(snapshot: &CharacterSnapshot) -> Result<(), SimError> {
    ensure_alive(snapshot)?;
    if !snapshot.life_stage.is_hatched() {
        return Err(SimError::StillAnEgg { id: snapshot.id });
    }
    Ok(())
}

/// Raise stamina by `amount`, capped at [`MAX_STAMINA`].
///
/// Any positive result cancels a running starvation countdown. Stamina
/// decay is paused while the countdown runs, so cancelling it restarts the
/// stamina clock at `at` with its pending jitter.
pub fn increase_stamina(
    record: &mut CharacterRecord,
    amount: u32,
    at: u64,
) -> Result<Option<StatusChange>, SimError> {
    let snapshot = &mut record.snapshot;
    ensure_hatched(snapshot)?;
    let previous = snapshot.stamina;
    let current = previous.saturating_add(amount).min(MAX_STAMINA);
    snapshot.stamina = current;
    if current > 0 && snapshot.time_of_zero_stamina.take().is_some() {
        let jitter = record.scheduler.jitter(CheckCategory::Stamina);
        record
            .scheduler
            .record_firing(CheckCategory::Stamina, at, jitter);
    }
    if current == previous {
        return Ok(None);
    }
    Ok(Some(StatusChange {
        at,
        delta: StatusDelta::StaminaChanged { previous, current },
    }))
}

/// Clear sickness.
pub fn cure_sickness(
    snapshot: &mut CharacterSnapshot,
    at: u64,
) -> Result<Option<StatusChange>, SimError> {
    ensure_hatched(snapshot)?;
    if !snapshot.sickness {
        return Ok(None);
    }
    snapshot.sickness = false;
    Ok(Some(StatusChange {
        at,
        delta: StatusDelta::SicknessChanged { sick: false },
    }))
}

/// Switch the activity state. `Dead` is reserved for the simulation.
pub fn set_activity(
    snapshot: &mut CharacterSnapshot,
    state: CharacterState,
    at: u64,
) -> Result<Option<StatusChange>, SimError> {
    if state == CharacterState::Dead {
        return Err(SimError::InvalidActivity { state });
    }
    ensure_hatched(snapshot)?;
    if snapshot.state == state {
        return Ok(None);
    }
    snapshot.state = state;
    Ok(Some(StatusChange {
        at,
        delta: StatusDelta::ActivityChanged { state },
    }))
}
