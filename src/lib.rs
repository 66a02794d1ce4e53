//! Egg Clicker - tap the shell until it cracks, see what's inside
//!
//! Core modules:
//! - `sim`: Reward selection, shell progression and particle physics
//! - `tuning`: Data-driven game balance and variant presets
//! - `settings`: Player preferences (volume, particles, motion)
//! - `audio`: Procedural Web Audio cues (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ClickerError, Result};
pub use settings::Settings;
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Flat gravity increment applied to particle vertical velocity
    pub const GRAVITY: f32 = 20.0;
    /// Rarity curve exponent (lower = common rewards more often)
    pub const RARITY_CURVE: f64 = 0.3;

    /// Particle lifetime in seconds
    pub const PARTICLE_LIFE: f32 = 2.0;
    /// Particles requested by an ordinary interaction
    pub const TICK_PARTICLES: usize = 1;
    /// Particles requested when the shell cracks open
    pub const BURST_PARTICLES: usize = 35;

    /// Largest frame delta the frame driver hands to the sim (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Shell opening: crack to reward appearing (seconds)
    pub const REVEAL_DELAY: f32 = 1.5;
    /// Reward bounce-in before it becomes clickable (seconds)
    pub const SETTLE_DELAY: f32 = 0.5;
    /// Reward evaporates before the shell closes (seconds)
    pub const CLOSE_DELAY: f32 = 0.3;
    /// Shell bounces back before accepting taps again (seconds)
    pub const RESET_DELAY: f32 = 0.5;
}

/// Uniform real in `[min, max)`. Tolerates `min > max` (draws from `(max, min]`).
#[inline]
pub fn random_between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.random::<f32>() * (max - min) + min
}
