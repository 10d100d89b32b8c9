//! Tuning for one hostile agent, loaded from a JSON creature definition.
//!
//! A definition lists one or more AI variants; a creature instance picks one of them
//! deterministically from its seed, weighted by `commonness`.

use std::collections::{BTreeMap, BTreeSet};

use ai_core::{DeterministicRng, SplitMix64};
use serde::{Deserialize, Serialize};

use crate::{BehaviorState, ConfigError};

/// How strongly the agent reacts to targets carrying `tag`, and in which state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetingRule {
    pub tag: String,
    #[serde(default)]
    pub state: BehaviorState,
    #[serde(default)]
    pub priority: f32,
}

impl TargetingRule {
    pub fn new(tag: impl Into<String>, state: BehaviorState, priority: f32) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            state,
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Priority given to a target the first time it is noticed.
    pub seed_priority: f32,
    /// Priority lost per second by every memory.
    pub fade_rate: f32,
    /// Priority gained per second by the target being fled from.
    pub fear_increase: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            seed_priority: 10.0,
            fade_rate: 0.5,
            fear_increase: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub update_targets_interval: f32,
    pub raycast_interval: f32,
    /// Upper bound on the retarget countdown right after being attacked.
    pub provoked_retarget_delay: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            update_targets_interval: 1.0,
            raycast_interval: 1.0,
            provoked_retarget_delay: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyAiConfig {
    /// Compared against other hostile agents to tag them `stronger` or `weaker`.
    pub combat_strength: f32,
    pub attack_when_provoked: bool,
    /// Prefer breaching through holes and outer doors over chewing on walls.
    pub aggressive_boarding: bool,
    /// Fraction of a target's sight range within which it is noticed.
    pub sight: f32,
    /// Fraction of a target's sound range within which it is noticed.
    pub hearing: f32,
    pub aggression_hurt: f32,
    pub aggression_greed: f32,
    pub flee_health_threshold: f32,
    pub targeting: Vec<TargetingRule>,
    pub memory: MemoryConfig,
    pub timing: TimingConfig,
}

impl Default for EnemyAiConfig {
    fn default() -> Self {
        Self {
            combat_strength: 1.0,
            attack_when_provoked: false,
            aggressive_boarding: false,
            sight: 0.0,
            hearing: 0.0,
            aggression_hurt: 100.0,
            aggression_greed: 10.0,
            flee_health_threshold: 0.0,
            targeting: Vec::new(),
            memory: MemoryConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl EnemyAiConfig {
    pub fn with_rule(mut self, tag: impl Into<String>, state: BehaviorState, priority: f32) -> Self {
        self.targeting.push(TargetingRule::new(tag, state, priority));
        self
    }

    /// Parses a creature definition and picks the variant for `seed`.
    pub fn from_definition_json(json: &str, seed: &str) -> Result<Self, ConfigError> {
        let definition: CreatureAiDefinition = serde_json::from_str(json)?;
        let variant = definition.choose(seed).ok_or(ConfigError::NoVariants)?;
        let config = variant.config.clone().normalized();
        config.validate()?;
        Ok(config)
    }

    /// Like [`EnemyAiConfig::from_definition_json`], but a broken definition degrades to the
    /// default tuning (no targeting rules) instead of failing.
    pub fn load_or_default(json: &str, seed: &str) -> Self {
        match Self::from_definition_json(json, seed) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "invalid ai definition, using default tuning");
                Self::default()
            }
        }
    }

    /// Lowercases every targeting tag.
    pub fn normalized(mut self) -> Self {
        for rule in &mut self.targeting {
            rule.tag = rule.tag.to_lowercase();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tuning = [
            ("combat_strength", self.combat_strength),
            ("sight", self.sight),
            ("hearing", self.hearing),
            ("aggression_hurt", self.aggression_hurt),
            ("aggression_greed", self.aggression_greed),
            ("flee_health_threshold", self.flee_health_threshold),
            ("memory.seed_priority", self.memory.seed_priority),
            ("memory.fade_rate", self.memory.fade_rate),
            ("memory.fear_increase", self.memory.fear_increase),
            ("timing.update_targets_interval", self.timing.update_targets_interval),
            ("timing.raycast_interval", self.timing.raycast_interval),
            ("timing.provoked_retarget_delay", self.timing.provoked_retarget_delay),
        ];
        for (field, value) in tuning {
            if !value.is_finite() {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }

        let mut seen = BTreeSet::new();
        for rule in &self.targeting {
            if rule.tag.trim().is_empty() {
                return Err(ConfigError::InvalidRule {
                    tag: rule.tag.clone(),
                    reason: "empty tag",
                });
            }
            if !rule.priority.is_finite() {
                return Err(ConfigError::InvalidRule {
                    tag: rule.tag.clone(),
                    reason: "priority is not finite",
                });
            }
            if !seen.insert(rule.tag.to_lowercase()) {
                return Err(ConfigError::DuplicateRule(rule.tag.clone()));
            }
        }
        Ok(())
    }

    /// Targeting rules keyed by lowercase tag.
    pub fn rule_map(&self) -> BTreeMap<String, TargetingRule> {
        self.targeting
            .iter()
            .map(|rule| {
                let tag = rule.tag.to_lowercase();
                let rule = TargetingRule {
                    tag: tag.clone(),
                    ..rule.clone()
                };
                (tag, rule)
            })
            .collect()
    }
}

/// One selectable AI block of a creature definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiVariant {
    #[serde(default = "default_commonness")]
    pub commonness: f32,
    #[serde(flatten)]
    pub config: EnemyAiConfig,
}

fn default_commonness() -> f32 {
    1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatureAiDefinition {
    #[serde(default)]
    pub variants: Vec<AiVariant>,
}

impl CreatureAiDefinition {
    /// The variant used by the creature seeded with `seed`.
    ///
    /// A single variant is always chosen; otherwise the draw is weighted by commonness and
    /// falls back to the first variant when every weight is zero.
    pub fn choose(&self, seed: &str) -> Option<&AiVariant> {
        match self.variants.len() {
            0 => None,
            1 => self.variants.first(),
            _ => {
                let weights: Vec<f32> = self.variants.iter().map(|v| v.commonness).collect();
                let mut rng = SplitMix64::from_str_seed(seed);
                let index = rng.choose_weighted(&weights).unwrap_or(0);
                self.variants.get(index)
            }
        }
    }
}
