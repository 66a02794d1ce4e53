//! Interaction handling and the per-frame update
//!
//! Input handlers call `register_interaction`/`click_reward`; the frame driver
//! calls `tick` once per display refresh with the elapsed seconds.

use rand::Rng;

use super::event::{AudioCue, GameEvent};
use super::particle::{ParticleView, TickOutput};
use super::reward::Selection;
use super::state::{ClickerState, OpenRule, ShellPhase, reward_name};
use crate::error::Result;

/// Outcome of a tap on the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interaction {
    /// This tap cracked the shell
    pub shell_opened: bool,
    /// Particles the caller should spawn for this tap
    pub particles_to_spawn: usize,
}

/// Draw a new reward and reset the countdown
pub fn select_next_reward(state: &mut ClickerState) -> Result<Selection> {
    let selection = state.selector.select(&mut state.rng)?;
    state.progression.apply_selection(&selection);
    log::info!(
        "Next reward: {} (tier {}, {} taps)",
        reward_name(&selection.reward),
        selection.tier,
        selection.interactions_required
    );
    state.push_event(GameEvent::RewardSelected(selection.clone()));
    Ok(selection)
}

/// Count a tap on the shell. Taps outside the closed phase are ignored.
pub fn register_interaction(state: &mut ClickerState) -> Interaction {
    if !state.progression.phase.accepts_taps() {
        return Interaction::default();
    }

    let countdown_done = state.progression.count_interaction();
    let opened = match state.tuning.open_rule {
        OpenRule::Countdown => countdown_done,
        OpenRule::CoinFlip { chance } => state.rng.random_bool(chance),
    };

    if opened {
        state.progression.phase = ShellPhase::Opening {
            timer: state.tuning.timing.reveal_delay,
        };
        let reward = state.progression.current_reward.clone();
        log::info!("Shell cracked: {}", reward_name(&reward));
        state.push_event(GameEvent::ShellOpened { reward });
        Interaction {
            shell_opened: true,
            particles_to_spawn: state.tuning.counts.burst,
        }
    } else {
        state.push_event(GameEvent::Tap {
            remaining: state.progression.interactions_remaining,
        });
        Interaction {
            shell_opened: false,
            particles_to_spawn: state.tuning.counts.tap,
        }
    }
}

/// Spawn particles with the state's RNG
pub fn spawn(state: &mut ClickerState, count: usize) -> Vec<ParticleView> {
    state.particles.spawn(&mut state.rng, count)
}

/// Click the revealed reward to start closing the shell
pub fn click_reward(state: &mut ClickerState) -> bool {
    if state.progression.phase != ShellPhase::Revealed {
        return false;
    }
    state.progression.phase = ShellPhase::Closing {
        timer: state.tuning.timing.close_delay,
    };
    state.push_event(GameEvent::ShellClosing);
    true
}

/// Advance shell timers and particles by `dt` seconds
///
/// `dt` is applied as given; callers clamp long frames. Particles advance
/// even when drawing the next reward fails; the shell then stays in
/// `Resetting` and the draw is retried next tick.
pub fn tick(state: &mut ClickerState, dt: f32) -> Result<TickOutput> {
    state.time += dt as f64;
    let advanced = advance_phase(state, dt);
    let out = state.particles.tick(dt);
    advanced.map(|()| out)
}

/// Step the shell through as many timed phases as `dt` covers
fn advance_phase(state: &mut ClickerState, dt: f32) -> Result<()> {
    let timing = state.tuning.timing;
    let mut remaining = dt.max(0.0);

    loop {
        let phase = state.progression.phase;
        let timer = match phase {
            ShellPhase::Opening { timer }
            | ShellPhase::Revealing { timer }
            | ShellPhase::Closing { timer }
            | ShellPhase::Resetting { timer } => timer,
            ShellPhase::Closed | ShellPhase::Revealed => return Ok(()),
        };

        if timer > remaining {
            let timer = timer - remaining;
            state.progression.phase = match phase {
                ShellPhase::Opening { .. } => ShellPhase::Opening { timer },
                ShellPhase::Revealing { .. } => ShellPhase::Revealing { timer },
                ShellPhase::Closing { .. } => ShellPhase::Closing { timer },
                _ => ShellPhase::Resetting { timer },
            };
            return Ok(());
        }
        remaining -= timer;

        match phase {
            ShellPhase::Opening { .. } => {
                state.progression.phase = ShellPhase::Revealing {
                    timer: timing.settle_delay,
                };
                let reward = state.progression.current_reward.clone();
                state.push_event(GameEvent::RewardShown { reward });
            }
            ShellPhase::Revealing { .. } => {
                state.progression.phase = ShellPhase::Revealed;
                state.push_event(GameEvent::RewardClickable);
            }
            ShellPhase::Closing { .. } => {
                state.progression.phase = ShellPhase::Resetting {
                    timer: timing.reset_delay,
                };
                state.push_event(GameEvent::ShellClosed);
            }
            _ => {
                if let Err(e) = select_next_reward(state) {
                    state.progression.phase = ShellPhase::Resetting { timer: 0.0 };
                    return Err(e);
                }
                state.progression.phase = ShellPhase::Closed;
                state.push_event(GameEvent::ShellReady);
            }
        }
    }
}

/// Sound cues for `events`, empty when the variant is silent
pub fn audio_cues(state: &ClickerState, events: &[GameEvent]) -> Vec<AudioCue> {
    if !state.tuning.audio {
        return Vec::new();
    }
    events.iter().flat_map(GameEvent::audio_cues).collect()
}
