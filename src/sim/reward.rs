//! Reward catalog and rarity-weighted selection
//!
//! A selection happens in explicit steps: resolve a rarity tier, filter the
//! catalog to that tier, pick uniformly inside it, then roll how many
//! interactions the reward costs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::RARITY_CURVE;
use crate::error::{ClickerError, Result};

/// A reward that can hatch from the shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDefinition {
    pub name: String,
    /// Rarity tier (0 = common, higher = rarer)
    pub rarity: u32,
}

impl RewardDefinition {
    pub fn new(name: impl Into<String>, rarity: u32) -> Self {
        Self {
            name: name.into(),
            rarity,
        }
    }
}

/// How the next reward is drawn from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// `tier = round(max_rarity * (1 - u^exponent))`, then uniform within the tier
    RarityCurve { exponent: f64 },
    /// Flat pick over the whole catalog
    Uniform,
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        SelectionStrategy::RarityCurve {
            exponent: RARITY_CURVE,
        }
    }
}

/// What to do when the curve lands on a tier with no rewards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTierPolicy {
    /// Use the closest populated tier (ties go to the lower tier)
    #[default]
    Nearest,
    /// Report `ClickerError::EmptyTier`
    Fail,
}

/// Interaction cost formula: `round(uniform(min, base_max + tier * per_tier))`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrindRange {
    pub min: f32,
    pub base_max: f32,
    pub per_tier: f32,
}

impl Default for GrindRange {
    fn default() -> Self {
        Self {
            min: 3.0,
            base_max: 5.0,
            per_tier: 5.0,
        }
    }
}

impl GrindRange {
    /// Inclusive bounds of the interaction count for a tier
    pub fn bounds(&self, tier: u32) -> (f32, f32) {
        (self.min, self.base_max + tier as f32 * self.per_tier)
    }

    /// Map a uniform draw `u` in `[0, 1)` to an interaction count
    pub fn interactions_for(&self, tier: u32, u: f32) -> u32 {
        let (lo, hi) = self.bounds(tier);
        (u * (hi - lo) + lo).round().max(0.0) as u32
    }
}

/// Outcome of a reward draw
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `None` only when the catalog is empty (shell-only variant)
    pub reward: Option<RewardDefinition>,
    /// Tier of the chosen reward
    pub tier: u32,
    pub interactions_required: u32,
}

/// Picks rewards from a fixed catalog
#[derive(Debug, Clone)]
pub struct RewardSelector {
    catalog: Vec<RewardDefinition>,
    /// Distinct tiers present, ascending
    tiers: Vec<u32>,
    max_rarity: u32,
    strategy: SelectionStrategy,
    empty_tier: EmptyTierPolicy,
    grind: GrindRange,
}

impl RewardSelector {
    pub fn new(
        catalog: Vec<RewardDefinition>,
        strategy: SelectionStrategy,
        empty_tier: EmptyTierPolicy,
        grind: GrindRange,
    ) -> Self {
        let max_rarity = catalog.iter().map(|r| r.rarity).max().unwrap_or(0);
        let mut tiers: Vec<u32> = catalog.iter().map(|r| r.rarity).collect();
        tiers.sort_unstable();
        tiers.dedup();

        Self {
            catalog,
            tiers,
            max_rarity,
            strategy,
            empty_tier,
            grind,
        }
    }

    pub fn catalog(&self) -> &[RewardDefinition] {
        &self.catalog
    }

    pub fn max_rarity(&self) -> u32 {
        self.max_rarity
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    pub fn grind(&self) -> GrindRange {
        self.grind
    }

    /// Tier the rarity curve maps `u` to. `u = 0` gives the top tier.
    pub fn curve_tier(&self, u: f64, exponent: f64) -> u32 {
        let weighted = 1.0 - u.powf(exponent);
        let tier = (self.max_rarity as f64 * weighted).round();
        (tier.max(0.0) as u32).min(self.max_rarity)
    }

    /// Closest tier that has at least one reward
    fn nearest_populated(&self, target: u32) -> Option<u32> {
        self.tiers
            .iter()
            .copied()
            .min_by_key(|&t| (t.abs_diff(target), t))
    }

    /// Draw the next reward using `rng`
    pub fn select<R: Rng>(&self, rng: &mut R) -> Result<Selection> {
        let u_curve = rng.random::<f64>();
        let u_pick = rng.random::<f64>();
        let u_grind = rng.random::<f32>();
        self.select_with(u_curve, u_pick, u_grind)
    }

    /// Draw the next reward from explicit uniforms.
    ///
    /// `u_curve` feeds the rarity curve, `u_pick` the index inside the
    /// candidate set, `u_grind` the interaction count. All in `[0, 1)`.
    pub fn select_with(&self, u_curve: f64, u_pick: f64, u_grind: f32) -> Result<Selection> {
        if self.catalog.is_empty() {
            return Ok(Selection {
                reward: None,
                tier: 0,
                interactions_required: self.grind.interactions_for(0, u_grind),
            });
        }

        let candidates: Vec<&RewardDefinition> = match self.strategy {
            SelectionStrategy::RarityCurve { exponent } => {
                let target = self.curve_tier(u_curve, exponent);
                let tier = if self.tiers.binary_search(&target).is_ok() {
                    target
                } else {
                    match self.empty_tier {
                        EmptyTierPolicy::Fail => {
                            return Err(ClickerError::EmptyTier { tier: target });
                        }
                        EmptyTierPolicy::Nearest => {
                            let nearest = self
                                .nearest_populated(target)
                                .ok_or(ClickerError::EmptyTier { tier: target })?;
                            log::warn!("Rarity tier {} is empty, using tier {}", target, nearest);
                            nearest
                        }
                    }
                };
                self.catalog.iter().filter(|r| r.rarity == tier).collect()
            }
            SelectionStrategy::Uniform => self.catalog.iter().collect(),
        };

        let index = ((u_pick * candidates.len() as f64) as usize).min(candidates.len() - 1);
        let reward = candidates[index].clone();
        let tier = reward.rarity;

        Ok(Selection {
            interactions_required: self.grind.interactions_for(tier, u_grind),
            tier,
            reward: Some(reward),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn diamond_socks() -> RewardSelector {
        RewardSelector::new(
            vec![
                RewardDefinition::new("diamond", 4),
                RewardDefinition::new("socks", 0),
            ],
            SelectionStrategy::default(),
            EmptyTierPolicy::Fail,
            GrindRange::default(),
        )
    }

    fn full_tiers() -> RewardSelector {
        let catalog = (0..=4)
            .flat_map(|tier| {
                (0..3).map(move |i| RewardDefinition::new(format!("r{}_{}", tier, i), tier))
            })
            .collect();
        RewardSelector::new(
            catalog,
            SelectionStrategy::default(),
            EmptyTierPolicy::Fail,
            GrindRange::default(),
        )
    }

    #[test]
    fn test_u_zero_picks_top_tier() {
        let selector = diamond_socks();
        assert_eq!(selector.max_rarity(), 4);
        let sel = selector.select_with(0.0, 0.5, 0.5).unwrap();
        assert_eq!(sel.reward.unwrap().name, "diamond");
        assert_eq!(sel.tier, 4);
    }

    #[test]
    fn test_u_near_one_picks_bottom_tier() {
        let selector = diamond_socks();
        let sel = selector.select_with(1.0 - 1e-12, 0.5, 0.5).unwrap();
        assert_eq!(sel.reward.unwrap().name, "socks");
        assert_eq!(sel.tier, 0);
    }

    #[test]
    fn test_sparse_tier_fails_with_fail_policy() {
        let selector = diamond_socks();
        // 1 - 0.3^0.3 ≈ 0.303 -> round(4 * 0.303) = 1, which has no rewards
        let err = selector.select_with(0.3, 0.5, 0.5).unwrap_err();
        assert!(matches!(err, ClickerError::EmptyTier { tier: 1 }));
    }

    #[test]
    fn test_sparse_tier_falls_back_to_nearest() {
        let selector = RewardSelector::new(
            vec![
                RewardDefinition::new("diamond", 4),
                RewardDefinition::new("moon", 2),
                RewardDefinition::new("socks", 0),
            ],
            SelectionStrategy::default(),
            EmptyTierPolicy::Nearest,
            GrindRange::default(),
        );
        // Target tier 1 sits between 0 and 2; ties go low
        assert_eq!(selector.curve_tier(0.3, RARITY_CURVE), 1);
        let sel = selector.select_with(0.3, 0.0, 0.0).unwrap();
        assert_eq!(sel.reward.unwrap().name, "socks");

        // Target tier 3 ties between 2 and 4
        let sel = selector.select_with(0.01, 0.0, 0.0).unwrap();
        assert_eq!(selector.curve_tier(0.01, RARITY_CURVE), 3);
        assert_eq!(sel.reward.unwrap().name, "moon");
    }

    #[test]
    fn test_pick_within_tier_uses_index() {
        let selector = full_tiers();
        let first = selector.select_with(0.0, 0.0, 0.0).unwrap();
        let last = selector.select_with(0.0, 0.999, 0.0).unwrap();
        assert_eq!(first.reward.unwrap().name, "r4_0");
        assert_eq!(last.reward.unwrap().name, "r4_2");
    }

    #[test]
    fn test_empty_catalog_is_shell_only() {
        let selector = RewardSelector::new(
            Vec::new(),
            SelectionStrategy::default(),
            EmptyTierPolicy::Fail,
            GrindRange::default(),
        );
        let sel = selector.select_with(0.0, 0.0, 0.0).unwrap();
        assert!(sel.reward.is_none());
        assert_eq!(sel.tier, 0);
        assert_eq!(sel.interactions_required, 3);
    }

    #[test]
    fn test_curve_favors_common_tiers() {
        // 1 - u^0.3 is small for most u, so tier 0 outweighs the top tier by far
        let selector = full_tiers();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 5];
        for _ in 0..20_000 {
            let sel = selector.select(&mut rng).unwrap();
            counts[sel.tier as usize] += 1;
        }
        assert!(counts[0] > counts[4], "counts: {:?}", counts);
        // Above tier 1 every step up is rarer
        assert!(counts[1] > counts[2], "counts: {:?}", counts);
        assert!(counts[2] > counts[3], "counts: {:?}", counts);
        assert!(counts[3] > counts[4], "counts: {:?}", counts);
    }

    #[test]
    fn test_lower_exponent_means_more_commons() {
        let steep = RewardSelector::new(
            full_tiers().catalog().to_vec(),
            SelectionStrategy::RarityCurve { exponent: 0.1 },
            EmptyTierPolicy::Fail,
            GrindRange::default(),
        );
        let mild = full_tiers();
        let mut rng = Pcg32::seed_from_u64(7);
        let (mut steep_commons, mut mild_commons) = (0, 0);
        for _ in 0..5_000 {
            let u: f64 = rng.random();
            if steep.curve_tier(u, 0.1) == 0 {
                steep_commons += 1;
            }
            if mild.curve_tier(u, RARITY_CURVE) == 0 {
                mild_commons += 1;
            }
        }
        assert!(steep_commons > mild_commons);
    }

    #[test]
    fn test_uniform_strategy_reaches_every_reward() {
        let selector = RewardSelector::new(
            full_tiers().catalog().to_vec(),
            SelectionStrategy::Uniform,
            EmptyTierPolicy::Fail,
            GrindRange::default(),
        );
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            let sel = selector.select(&mut rng).unwrap();
            let reward = sel.reward.unwrap();
            assert_eq!(sel.tier, reward.rarity);
            seen.insert(reward.name);
        }
        assert_eq!(seen.len(), 15);
    }

    proptest! {
        #[test]
        fn prop_interactions_within_tier_bounds(
            u_curve in 0.0f64..1.0,
            u_pick in 0.0f64..1.0,
            u_grind in 0.0f32..1.0,
        ) {
            let selector = full_tiers();
            let sel = selector.select_with(u_curve, u_pick, u_grind).unwrap();
            prop_assert!(sel.tier <= 4);
            prop_assert!(sel.interactions_required >= 3);
            prop_assert!(sel.interactions_required <= 5 + 5 * sel.tier);
        }

        #[test]
        fn prop_curve_tier_in_range(u in 0.0f64..1.0, exponent in 0.01f64..3.0) {
            let selector = full_tiers();
            prop_assert!(selector.curve_tier(u, exponent) <= selector.max_rarity());
        }
    }
}
