//! Events emitted by the sim for the presentation layer

use super::reward::{RewardDefinition, Selection};

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new reward is waiting inside the shell
    RewardSelected(Selection),
    /// An ordinary tap that did not open the shell
    Tap { remaining: u32 },
    /// The shell cracked open
    ShellOpened { reward: Option<RewardDefinition> },
    /// The reward pops out of the shell
    RewardShown { reward: Option<RewardDefinition> },
    /// The reward settled and can be clicked to close the shell
    RewardClickable,
    /// The reward was clicked and evaporates
    ShellClosing,
    /// The shell halves came back together
    ShellClosed,
    /// Closing finished and the shell accepts taps again
    ShellReady,
}

/// Sounds the presentation layer can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Tap,
    Crack,
    /// Jingle for the reward's rarity tier
    Rarity(u32),
    /// Start the looping shine pad
    ShineStart,
    /// Fade out the shine pad
    ShineStop,
}

impl GameEvent {
    /// Sound cues this event triggers
    pub fn audio_cues(&self) -> Vec<AudioCue> {
        match self {
            GameEvent::Tap { .. } => vec![AudioCue::Tap],
            GameEvent::ShellOpened { .. } => vec![AudioCue::Crack, AudioCue::ShineStart],
            GameEvent::RewardShown {
                reward: Some(reward),
            } => vec![AudioCue::Rarity(reward.rarity)],
            GameEvent::ShellClosing => vec![AudioCue::ShineStop],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_cracks_and_shines() {
        let event = GameEvent::ShellOpened { reward: None };
        assert_eq!(event.audio_cues(), vec![AudioCue::Crack, AudioCue::ShineStart]);
    }

    #[test]
    fn test_reveal_plays_rarity_jingle() {
        let event = GameEvent::RewardShown {
            reward: Some(RewardDefinition::new("moon", 2)),
        };
        assert_eq!(event.audio_cues(), vec![AudioCue::Rarity(2)]);

        // Shell-only builds reveal nothing and stay quiet
        let event = GameEvent::RewardShown { reward: None };
        assert!(event.audio_cues().is_empty());
    }
}
