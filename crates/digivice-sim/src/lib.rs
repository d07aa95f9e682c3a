//! Life simulation core for the Digivice virtual pet.
//!
//! This crate turns wall-clock time into character state. It never reads a
//! clock or touches the UI: hosts hand it timestamps and get back updated
//! records plus the status changes that happened along the way. The same
//! pure transition drives both the foreground frame loop and the background
//! catch-up that runs when the app returns after hours or days away.
//!
//! # Modules
//!
//! - [`care`] -- Player actions: feeding, medicine, activity changes.
//! - [`clock`] -- [`Clock`] trait with system and manual clocks.
//! - [`config`] -- Tunable profiles and configuration loading from
//!   `digivice-config.yaml` ([`TunableProfile`], [`GameRules`]).
//! - [`environment`] -- [`EnvironmentSource`] trait and the persisted room.
//! - [`error`] -- Error types ([`SimError`], [`StoreError`]).
//! - [`evolution`] -- Weighted hatch and evolution tables.
//! - [`granularity`] -- Tick step selection by elapsed span.
//! - [`live`] -- Foreground frame driver ([`LiveDriver`]).
//! - [`reconciler`] -- Catch-up fold and background resume.
//! - [`scheduler`] -- Per-category check timing with jitter.
//! - [`store`] -- Save persistence ([`CharacterStore`]).
//! - [`transition`] -- The pure per-tick state transition.
//!
//! [`Clock`]: clock::Clock
//! [`TunableProfile`]: config::TunableProfile
//! [`GameRules`]: config::GameRules
//! [`EnvironmentSource`]: environment::EnvironmentSource
//! [`SimError`]: error::SimError
//! [`StoreError`]: error::StoreError
//! [`LiveDriver`]: live::LiveDriver
//! [`CharacterStore`]: store::CharacterStore

pub mod care;
pub mod clock;
pub mod config;
pub mod environment;
pub mod error;
pub mod evolution;
pub mod granularity;
pub mod live;
pub mod reconciler;
pub mod scheduler;
pub mod store;
pub mod transition;
