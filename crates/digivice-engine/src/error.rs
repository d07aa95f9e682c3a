//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the live session.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: digivice_sim::config::ConfigError,
    },

    /// A simulation operation failed.
    #[error("simulation error: {source}")]
    Sim {
        /// The underlying simulation error.
        #[from]
        source: digivice_sim::error::SimError,
    },
}
