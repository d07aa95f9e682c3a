//! Enumeration types for the Digivice life simulation.
//!
//! Life stage and activity state are deliberately separate axes: a
//! character in `StageB` can be `Sleeping`, and sickness is a boolean
//! overlay on the snapshot rather than another state variant.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Life stage
// ---------------------------------------------------------------------------

/// Growth stage of a character.
///
/// `Egg` is pre-life. `StageA` through `StageD` only ever move forward,
/// one step per evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LifeStage {
    /// Unhatched egg. No checks run until it hatches.
    Egg,
    /// First stage after hatching.
    StageA,
    /// Second stage.
    StageB,
    /// Third stage.
    StageC,
    /// Terminal stage. Its evolution gauge no longer accumulates.
    StageD,
}

impl LifeStage {
    /// The stage that follows this one, or `None` for the terminal stage.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Egg => Some(Self::StageA),
            Self::StageA => Some(Self::StageB),
            Self::StageB => Some(Self::StageC),
            Self::StageC => Some(Self::StageD),
            Self::StageD => None,
        }
    }

    /// Whether the character has hatched.
    pub const fn is_hatched(self) -> bool {
        !matches!(self, Self::Egg)
    }
}

// ---------------------------------------------------------------------------
// Activity state
// ---------------------------------------------------------------------------

/// What the character is currently doing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum CharacterState {
    /// Standing around.
    #[default]
    Idle,
    /// Wandering the screen.
    Walking,
    /// Asleep. Sickness is not rolled while sleeping.
    Sleeping,
    /// Eating. Sickness is not rolled while eating.
    Eating,
    /// Dead. Terminal: no further simulation or mutation applies.
    Dead,
}

impl CharacterState {
    /// Whether this state blocks the sickness check.
    pub const fn shields_from_sickness(self) -> bool {
        matches!(self, Self::Sleeping | Self::Eating)
    }
}

// ---------------------------------------------------------------------------
// Check categories
// ---------------------------------------------------------------------------

/// A periodic check category tracked by the check scheduler.
///
/// Death has no category of its own: it is gated by the time stamina
/// reached zero plus a fixed timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CheckCategory {
    /// Sickness roll.
    Sickness,
    /// Stamina decay.
    Stamina,
    /// Evolution gauge growth.
    Evolution,
}

impl CheckCategory {
    /// All categories in per-tick evaluation order.
    pub const ALL: [Self; 3] = [Self::Sickness, Self::Stamina, Self::Evolution];
}

impl core::fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Sickness => write!(f, "sickness"),
            Self::Stamina => write!(f, "stamina"),
            Self::Evolution => write!(f, "evolution"),
        }
    }
}

// ---------------------------------------------------------------------------
// Death
// ---------------------------------------------------------------------------

/// Why a character died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DeathCause {
    /// Stamina stayed at zero longer than the death timeout.
    Starvation,
    /// The app was away for longer than the neglect ceiling.
    Neglect,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::Neglect => write!(f, "neglect"),
        }
    }
}
