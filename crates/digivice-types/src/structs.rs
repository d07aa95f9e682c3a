//! Core state structs for the Digivice life simulation.
//!
//! A character is persisted as a [`CharacterRecord`]: the
//! [`CharacterSnapshot`] (what the player sees) plus the
//! [`CheckScheduler`] (when each periodic check last fired). Both
//! replay paths read and write the pair together.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{CharacterState, CheckCategory, DeathCause, LifeStage};
use crate::ids::CharacterId;

/// Upper bound for stamina. Stamina is clamped to `0..=MAX_STAMINA` on every mutation.
pub const MAX_STAMINA: u32 = 10;

/// The evolution gauge value at which a character evolves.
///
/// Stored gauges are always strictly below this value; overflow carries
/// into the next stage.
pub const EVOLUTION_GAUGE_FULL: f64 = 100.0;

// ---------------------------------------------------------------------------
// Character snapshot
// ---------------------------------------------------------------------------

/// The player-visible state of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterSnapshot {
    /// Stable identifier assigned when the egg was created.
    pub id: CharacterId,
    /// Species identity. Keys the hatch/evolution table.
    pub species: String,
    /// Current growth stage.
    pub life_stage: LifeStage,
    /// Current activity. `Dead` is terminal.
    pub state: CharacterState,
    /// Stamina, `0..=MAX_STAMINA`.
    ///
    /// Accepts any number on load; negative and fractional values
    /// saturate and truncate instead of failing the whole save.
    #[serde(deserialize_with = "deserialize_stamina")]
    pub stamina: u32,
    /// Sickness overlay, orthogonal to `state`.
    pub sickness: bool,
    /// Progress toward the next stage, `0 <= gauge < 100`.
    pub evolution_gauge: f64,
    /// When stamina last crossed from positive to zero (epoch ms).
    ///
    /// Starts the death countdown. Set once per zero-crossing.
    #[ts(type = "number | null")]
    pub time_of_zero_stamina: Option<u64>,
    /// When the egg was created (epoch ms). Never changes.
    #[ts(type = "number")]
    pub created_at: u64,
}

impl CharacterSnapshot {
    /// Create a fresh egg of the given species, laid at `now`.
    pub fn new_egg(species: impl Into<String>, now: u64) -> Self {
        Self {
            id: CharacterId::new(),
            species: species.into(),
            life_stage: LifeStage::Egg,
            state: CharacterState::Idle,
            stamina: MAX_STAMINA,
            sickness: false,
            evolution_gauge: 0.0,
            time_of_zero_stamina: None,
            created_at: now,
        }
    }

    /// Whether the character is dead.
    pub const fn is_dead(&self) -> bool {
        matches!(self.state, CharacterState::Dead)
    }

    /// Whether the death countdown is running.
    pub const fn death_countdown_started(&self) -> bool {
        self.time_of_zero_stamina.is_some()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deserialize_stamina<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw <= 0.0 {
        return Ok(0);
    }
    Ok(raw.min(f64::from(u32::MAX)).trunc() as u32)
}

// ---------------------------------------------------------------------------
// Check scheduler
// ---------------------------------------------------------------------------

/// Per-character record of when each periodic check last fired.
///
/// Each category also keeps the jitter factor drawn at its last firing;
/// the effective interval is `base * (1 + jitter)`. Missing fields in a
/// persisted record default to zero, which makes that check due at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CheckScheduler {
    /// Last stamina check (epoch ms).
    #[serde(default)]
    #[ts(type = "number")]
    pub last_stamina_check: u64,
    /// Last sickness check (epoch ms).
    #[serde(default)]
    #[ts(type = "number")]
    pub last_sickness_check: u64,
    /// Last evolution check (epoch ms).
    #[serde(default)]
    #[ts(type = "number")]
    pub last_evolution_check: u64,
    /// Jitter factor for the pending stamina interval.
    #[serde(default)]
    pub stamina_jitter: f64,
    /// Jitter factor for the pending sickness interval.
    #[serde(default)]
    pub sickness_jitter: f64,
    /// Jitter factor for the pending evolution interval.
    #[serde(default)]
    pub evolution_jitter: f64,
}

impl CheckScheduler {
    /// A scheduler whose checks all last fired at `now`, with no jitter.
    pub const fn starting_at(now: u64) -> Self {
        Self {
            last_stamina_check: now,
            last_sickness_check: now,
            last_evolution_check: now,
            stamina_jitter: 0.0,
            sickness_jitter: 0.0,
            evolution_jitter: 0.0,
        }
    }

    /// When the given category last fired.
    pub const fn last_fired(&self, category: CheckCategory) -> u64 {
        match category {
            CheckCategory::Sickness => self.last_sickness_check,
            CheckCategory::Stamina => self.last_stamina_check,
            CheckCategory::Evolution => self.last_evolution_check,
        }
    }

    /// The jitter factor pending for the given category.
    pub const fn jitter(&self, category: CheckCategory) -> f64 {
        match category {
            CheckCategory::Sickness => self.sickness_jitter,
            CheckCategory::Stamina => self.stamina_jitter,
            CheckCategory::Evolution => self.evolution_jitter,
        }
    }

    /// Record that `category` fired at `now` and store the jitter for its next interval.
    pub const fn record_firing(&mut self, category: CheckCategory, now: u64, next_jitter: f64) {
        match category {
            CheckCategory::Sickness => {
                self.last_sickness_check = now;
                self.sickness_jitter = next_jitter;
            }
            CheckCategory::Stamina => {
                self.last_stamina_check = now;
                self.stamina_jitter = next_jitter;
            }
            CheckCategory::Evolution => {
                self.last_evolution_check = now;
                self.evolution_jitter = next_jitter;
            }
        }
    }
}

/// A character's snapshot and scheduler, persisted and advanced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterRecord {
    /// Player-visible state.
    pub snapshot: CharacterSnapshot,
    /// Check timers.
    #[serde(default)]
    pub scheduler: CheckScheduler,
}

impl CharacterRecord {
    /// A fresh egg whose scheduler starts at the moment it was laid.
    pub fn new_egg(species: impl Into<String>, now: u64) -> Self {
        Self {
            snapshot: CharacterSnapshot::new_egg(species, now),
            scheduler: CheckScheduler::starting_at(now),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Read-only environmental input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnvironmentalSignal {
    /// Uncleaned waste plus stale food at the simulated time.
    pub unhygienic_object_count: u32,
}

/// An object lying in the character's room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WorldObject {
    /// Uncleaned waste.
    Waste {
        /// When it was dropped (epoch ms).
        #[ts(type = "number")]
        dropped_at: u64,
    },
    /// Uneaten food. Becomes unhygienic once it goes stale.
    Food {
        /// When it was placed (epoch ms).
        #[ts(type = "number")]
        placed_at: u64,
    },
}

// ---------------------------------------------------------------------------
// Status notifications
// ---------------------------------------------------------------------------

/// A granular change to a character, emitted for UI reactivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum StatusDelta {
    /// The egg hatched into the given species.
    Hatched {
        /// Species picked by the hatch table.
        species: String,
    },
    /// Stamina moved.
    StaminaChanged {
        /// Value before the change.
        previous: u32,
        /// Value after the change.
        current: u32,
    },
    /// Sickness was contracted or cured.
    SicknessChanged {
        /// The new sickness flag.
        sick: bool,
    },
    /// The evolution gauge moved without an evolution.
    EvolutionGaugeChanged {
        /// The new gauge value.
        gauge: f64,
    },
    /// The character advanced a life stage.
    Evolved {
        /// Stage before evolving.
        from: LifeStage,
        /// Stage after evolving.
        to: LifeStage,
        /// Species after evolving.
        species: String,
    },
    /// The activity state changed.
    ActivityChanged {
        /// The new activity.
        state: CharacterState,
    },
    /// The character died.
    Died {
        /// Why it died.
        cause: DeathCause,
    },
}

/// A [`StatusDelta`] stamped with the simulated time it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatusChange {
    /// Simulated time of the change (epoch ms).
    #[ts(type = "number")]
    pub at: u64,
    /// What changed.
    pub delta: StatusDelta,
}
