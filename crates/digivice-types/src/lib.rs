//! Shared type definitions for the Digivice life simulation.
//!
//! This crate holds the persisted data model that both the simulation
//! core and its host collaborators (rendering, UI, storage) agree on.
//! Types flow to `TypeScript` via `ts-rs` for the UI layer.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for character identifiers
//! - [`enums`] -- Life stage, activity state, check categories, death causes
//! - [`structs`] -- Snapshot, scheduler, environment, and status notifications

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{CharacterState, CheckCategory, DeathCause, LifeStage};
pub use ids::CharacterId;
pub use structs::{
    CharacterRecord, CharacterSnapshot, CheckScheduler, EVOLUTION_GAUGE_FULL,
    EnvironmentalSignal, MAX_STAMINA, StatusChange, StatusDelta, WorldObject,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the UI layer.

    #[test]
    fn export_bindings() {
        use ts_rs::TS;

        let _ = crate::ids::CharacterId::export_all();

        let _ = crate::enums::LifeStage::export_all();
        let _ = crate::enums::CharacterState::export_all();
        let _ = crate::enums::CheckCategory::export_all();
        let _ = crate::enums::DeathCause::export_all();

        let _ = crate::structs::CharacterSnapshot::export_all();
        let _ = crate::structs::CheckScheduler::export_all();
        let _ = crate::structs::CharacterRecord::export_all();
        let _ = crate::structs::EnvironmentalSignal::export_all();
        let _ = crate::structs::WorldObject::export_all();
        let _ = crate::structs::StatusDelta::export_all();
        let _ = crate::structs::StatusChange::export_all();
    }
}
