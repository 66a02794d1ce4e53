//! Error types for reward selection, spawning and tuning.

use thiserror::Error;

/// Errors raised by the clicker core.
#[derive(Error, Debug)]
pub enum ClickerError {
    /// The rarity curve landed on a tier with no rewards and the
    /// empty-tier policy is `Fail`.
    #[error("no reward defined for rarity tier {tier}")]
    EmptyTier {
        /// The tier the curve resolved to.
        tier: u32,
    },

    /// Spawn was asked for a negative number of particles.
    #[error("invalid spawn count: {0}")]
    InvalidSpawnCount(i64),

    /// Tuning values that would make the simulation meaningless.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Tuning JSON could not be parsed.
    #[error("malformed tuning json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for clicker operations.
pub type Result<T> = std::result::Result<T, ClickerError>;
