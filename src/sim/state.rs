//! Game state and shell progression
//!
//! All mutable state lives in one `ClickerState` owned by the frame driver.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::particle::ParticleEngine;
use super::reward::{RewardDefinition, RewardSelector, Selection};
use crate::consts::*;
use crate::error::Result;
use crate::tuning::Tuning;

/// Where the shell is in its open/close cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShellPhase {
    /// Accepting taps
    Closed,
    /// Cracked, reward not yet visible
    Opening { timer: f32 },
    /// Reward bouncing in
    Revealing { timer: f32 },
    /// Reward waiting to be clicked
    Revealed,
    /// Reward evaporating
    Closing { timer: f32 },
    /// Shell bouncing back, next reward drawn when this ends
    Resetting { timer: f32 },
}

impl ShellPhase {
    /// Shell halves are apart
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            ShellPhase::Opening { .. } | ShellPhase::Revealing { .. } | ShellPhase::Revealed
        )
    }

    pub fn accepts_taps(&self) -> bool {
        matches!(self, ShellPhase::Closed)
    }
}

/// When a tap cracks the shell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpenRule {
    /// Once the interaction countdown reaches zero
    #[default]
    Countdown,
    /// Each tap opens with this probability
    CoinFlip { chance: f64 },
}

/// Durations of the timed shell phases, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTiming {
    pub reveal_delay: f32,
    pub settle_delay: f32,
    pub close_delay: f32,
    pub reset_delay: f32,
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self {
            reveal_delay: REVEAL_DELAY,
            settle_delay: SETTLE_DELAY,
            close_delay: CLOSE_DELAY,
            reset_delay: RESET_DELAY,
        }
    }
}

/// Progress toward the current reward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// `None` in shell-only builds
    pub current_reward: Option<RewardDefinition>,
    pub interactions_remaining: u32,
    pub phase: ShellPhase,
}

impl ProgressionState {
    pub fn new(selection: &Selection) -> Self {
        Self {
            current_reward: selection.reward.clone(),
            interactions_remaining: selection.interactions_required,
            phase: ShellPhase::Closed,
        }
    }

    pub fn shell_open(&self) -> bool {
        self.phase.is_open()
    }

    /// Overwrite the reward and countdown with a fresh draw
    pub fn apply_selection(&mut self, selection: &Selection) {
        self.current_reward = selection.reward.clone();
        self.interactions_remaining = selection.interactions_required;
    }

    /// Count one tap; true once the countdown has run out
    pub fn count_interaction(&mut self) -> bool {
        self.interactions_remaining = self.interactions_remaining.saturating_sub(1);
        self.interactions_remaining == 0
    }
}

/// Everything the clicker owns
#[derive(Debug, Clone)]
pub struct ClickerState {
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub selector: RewardSelector,
    pub progression: ProgressionState,
    pub particles: ParticleEngine,
    /// Seconds simulated so far
    pub time: f64,
    events: Vec<GameEvent>,
}

impl ClickerState {
    /// Validate `tuning`, seed the RNG and draw the first reward
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let selector = RewardSelector::new(
            tuning.rewards.clone(),
            tuning.strategy,
            tuning.empty_tier,
            tuning.grind,
        );
        let selection = selector.select(&mut rng)?;
        log::info!(
            "First reward: {} (tier {}, {} taps)",
            reward_name(&selection.reward),
            selection.tier,
            selection.interactions_required
        );

        Ok(Self {
            seed,
            rng,
            selector,
            progression: ProgressionState::new(&selection),
            particles: ParticleEngine::new(tuning.particles),
            tuning,
            time: 0.0,
            events: vec![GameEvent::RewardSelected(selection)],
        })
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Display name for log lines
pub fn reward_name(reward: &Option<RewardDefinition>) -> &str {
    reward.as_ref().map(|r| r.name.as_str()).unwrap_or("(empty shell)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_first_reward() {
        let mut state = ClickerState::new(12345, Tuning::egg()).unwrap();
        assert!(state.progression.current_reward.is_some());
        assert!(state.progression.interactions_remaining >= 3);
        assert!(!state.progression.shell_open());
        assert!(state.particles.is_empty());

        let events = state.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::RewardSelected(_)]));
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_same_seed_same_first_reward() {
        let a = ClickerState::new(99, Tuning::egg()).unwrap();
        let b = ClickerState::new(99, Tuning::egg()).unwrap();
        assert_eq!(a.progression, b.progression);
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let mut tuning = Tuning::egg();
        tuning.particles.life = 0.0;
        assert!(ClickerState::new(1, tuning).is_err());
    }

    #[test]
    fn test_countdown_saturates() {
        let mut progression = ProgressionState::new(&Selection {
            reward: None,
            tier: 0,
            interactions_required: 2,
        });
        assert!(!progression.count_interaction());
        assert!(progression.count_interaction());
        assert!(progression.count_interaction());
        assert_eq!(progression.interactions_remaining, 0);
    }

    #[test]
    fn test_phase_openness() {
        assert!(!ShellPhase::Closed.is_open());
        assert!(ShellPhase::Opening { timer: 1.0 }.is_open());
        assert!(ShellPhase::Revealed.is_open());
        assert!(!ShellPhase::Closing { timer: 0.1 }.is_open());
        assert!(!ShellPhase::Resetting { timer: 0.1 }.accepts_taps());
        assert!(ShellPhase::Closed.accepts_taps());
    }
}
