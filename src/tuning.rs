//! Data-driven game balance
//!
//! Everything that distinguishes the egg game from its smaller siblings lives
//! here: the catalog, how rewards are drawn, particle physics and phase
//! timing. Tuning can be loaded from JSON; missing fields take the egg
//! defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{BURST_PARTICLES, TICK_PARTICLES};
use crate::error::{ClickerError, Result};
use crate::sim::{
    EmptyTierPolicy, GrindRange, OpenRule, ParticleTuning, PhaseTiming, RewardDefinition,
    SelectionStrategy,
};

/// Particles requested per interaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleCounts {
    /// Ordinary tap
    pub tap: usize,
    /// The tap that cracks the shell
    pub burst: usize,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            tap: TICK_PARTICLES,
            burst: BURST_PARTICLES,
        }
    }
}

/// Complete balance sheet for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub rewards: Vec<RewardDefinition>,
    pub strategy: SelectionStrategy,
    pub empty_tier: EmptyTierPolicy,
    pub grind: GrindRange,
    pub open_rule: OpenRule,
    pub particles: ParticleTuning,
    pub counts: ParticleCounts,
    pub timing: PhaseTiming,
    /// Emit audio cues
    pub audio: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::egg()
    }
}

impl Tuning {
    /// The full egg game: sixteen rewards over five rarity tiers
    pub fn egg() -> Self {
        let rewards = [
            ("diamond", 4),
            ("heart", 3),
            ("lamb", 3),
            ("moon", 2),
            ("rainbow", 2),
            ("rocket", 2),
            ("flower", 1),
            ("cloud", 1),
            ("traffic-lights", 1),
            ("clock", 1),
            ("socks", 0),
            ("bicycle", 0),
            ("boots", 0),
            ("pine", 0),
            ("plane", 0),
            ("window", 0),
        ]
        .into_iter()
        .map(|(name, rarity)| RewardDefinition::new(name, rarity))
        .collect();

        Self {
            rewards,
            strategy: SelectionStrategy::default(),
            empty_tier: EmptyTierPolicy::default(),
            grind: GrindRange::default(),
            open_rule: OpenRule::default(),
            particles: ParticleTuning::default(),
            counts: ParticleCounts::default(),
            timing: PhaseTiming::default(),
            audio: true,
        }
    }

    /// Two rewards drawn with a flat pick
    pub fn duo() -> Self {
        Self {
            rewards: vec![
                RewardDefinition::new("diamond", 1),
                RewardDefinition::new("socks", 0),
            ],
            strategy: SelectionStrategy::Uniform,
            ..Self::egg()
        }
    }

    /// A shell that just cracks: no catalog, no sound
    pub fn shell_only() -> Self {
        Self {
            rewards: Vec::new(),
            audio: false,
            ..Self::egg()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "egg" | "full" => Some(Self::egg()),
            "duo" => Some(Self::duo()),
            "shell" | "shell_only" | "shell-only" => Some(Self::shell_only()),
            _ => None,
        }
    }

    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the sim cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ClickerError::InvalidTuning(msg));

        if let SelectionStrategy::RarityCurve { exponent } = self.strategy {
            if !(exponent.is_finite() && exponent > 0.0) {
                return invalid(format!("rarity curve exponent must be positive, got {}", exponent));
            }
        }

        if let OpenRule::CoinFlip { chance } = self.open_rule {
            if !(0.0..=1.0).contains(&chance) {
                return invalid(format!("coin flip chance must be in [0, 1], got {}", chance));
            }
        }

        let grind = self.grind;
        if grind.min < 0.0 || grind.base_max < grind.min || grind.per_tier < 0.0 {
            return invalid(format!(
                "interaction range must satisfy 0 <= min <= base_max and per_tier >= 0, got {:?}",
                grind
            ));
        }

        for (name, [min, max]) in self.particles.spawn.named() {
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return invalid(format!("spawn range {} is inverted: [{}, {}]", name, min, max));
            }
        }

        let life = self.particles.life;
        if !(life.is_finite() && life > 0.0) {
            return invalid(format!("particle life must be positive, got {}", life));
        }

        let gravity = self.particles.gravity;
        if !gravity.is_finite() {
            return invalid(format!("gravity must be finite, got {}", gravity));
        }

        let t = self.timing;
        if [t.reveal_delay, t.settle_delay, t.close_delay, t.reset_delay]
            .iter()
            .any(|d| !(d.is_finite() && *d >= 0.0))
        {
            return invalid(format!("phase delays must be non-negative, got {:?}", t));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GravityPolicy;

    #[test]
    fn test_egg_catalog() {
        let tuning = Tuning::egg();
        assert_eq!(tuning.rewards.len(), 16);
        assert_eq!(tuning.rewards.iter().map(|r| r.rarity).max(), Some(4));
        assert_eq!(tuning.counts, ParticleCounts { tap: 1, burst: 35 });
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for name in ["egg", "duo", "shell-only"] {
            let tuning = Tuning::preset(name).unwrap();
            assert!(tuning.validate().is_ok(), "{} failed", name);
        }
        assert!(Tuning::preset("ostrich").is_none());
        assert!(Tuning::shell_only().rewards.is_empty());
        assert!(!Tuning::shell_only().audio);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "rewards": [{"name": "diamond", "rarity": 4}, {"name": "socks", "rarity": 0}],
            "particles": {"gravity": 20.0, "gravity_policy": "per_tick"}
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.rewards.len(), 2);
        assert_eq!(tuning.particles.gravity_policy, GravityPolicy::PerTick);
        assert_eq!(tuning.particles.life, 2.0);
        assert_eq!(tuning.strategy, SelectionStrategy::default());
        assert!(tuning.audio);
    }

    #[test]
    fn test_json_round_trip_of_strategy_tag() {
        let json = r#"{"strategy": {"kind": "uniform"}, "empty_tier": "fail"}"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.strategy, SelectionStrategy::Uniform);
        assert_eq!(tuning.empty_tier, EmptyTierPolicy::Fail);
    }

    #[test]
    fn test_rejects_bad_values() {
        let json = r#"{"strategy": {"kind": "rarity_curve", "exponent": 0.0}}"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(ClickerError::InvalidTuning(_))
        ));

        let json = r#"{"particles": {"spawn": {"vy": [-250.0, -800.0]}}}"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(ClickerError::InvalidTuning(_))
        ));

        let json = r#"{"open_rule": {"kind": "coin_flip", "chance": 1.5}}"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(ClickerError::InvalidTuning(_))
        ));

        let json = r#"{"timing": {"settle_delay": -0.5}}"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(ClickerError::InvalidTuning(_))
        ));

        assert!(matches!(
            Tuning::from_json("{not json"),
            Err(ClickerError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut tuning = Tuning::egg();
        tuning.particles.life = f32::NAN;
        assert!(matches!(tuning.validate(), Err(ClickerError::InvalidTuning(_))));

        let mut tuning = Tuning::egg();
        tuning.particles.gravity = f32::INFINITY;
        assert!(matches!(tuning.validate(), Err(ClickerError::InvalidTuning(_))));

        let mut tuning = Tuning::egg();
        tuning.timing.reveal_delay = f32::NAN;
        assert!(matches!(tuning.validate(), Err(ClickerError::InvalidTuning(_))));

        let mut tuning = Tuning::egg();
        tuning.timing.reset_delay = 0.0;
        assert!(tuning.validate().is_ok());
    }
}
