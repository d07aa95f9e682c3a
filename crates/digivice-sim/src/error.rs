//! Error types for the simulation core.
//!
//! The transition engine itself is total and never fails. Errors come from
//! persistence and from host mutations that do not apply to the current
//! character.

use digivice_types::{CharacterId, CharacterState};

/// Errors from reading or writing a save.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The save file could not be read or written.
    #[error("save file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The save file is not valid JSON for the expected shape.
    #[error("save file is corrupt: {source}")]
    Corrupt {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Errors from simulation operations.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The character is dead; only reads are permitted.
    #[error("character {id} is dead")]
    CharacterDead {
        /// The dead character.
        id: CharacterId,
    },

    /// The character has not hatched yet.
    #[error("character {id} is still an egg")]
    StillAnEgg {
        /// The unhatched character.
        id: CharacterId,
    },

    /// The requested activity cannot be set directly.
    #[error("activity {state:?} cannot be set by the host")]
    InvalidActivity {
        /// The rejected state.
        state: CharacterState,
    },

    /// Persisting the record failed.
    #[error("persistence failed: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}
