//! Clicker simulation module
//!
//! All gameplay logic lives here, free of DOM and audio dependencies:
//! - Seeded RNG only
//! - State owned by `ClickerState`, passed explicitly
//! - Events queued for the presentation layer

pub mod event;
pub mod particle;
pub mod reward;
pub mod state;
pub mod tick;

pub use event::{AudioCue, GameEvent};
pub use particle::{
    GravityPolicy, Particle, ParticleEngine, ParticleTuning, ParticleView, SpawnRanges,
    TickOutput,
};
pub use reward::{
    EmptyTierPolicy, GrindRange, RewardDefinition, RewardSelector, Selection, SelectionStrategy,
};
pub use state::{ClickerState, OpenRule, PhaseTiming, ProgressionState, ShellPhase};
pub use tick::{
    Interaction, audio_cues, click_reward, register_interaction, select_next_reward, spawn, tick,
};
