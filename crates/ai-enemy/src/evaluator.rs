//! Target scoring.
//!
//! Every candidate is first classified into a targeting tag plus a context multiplier (a pure
//! function of the candidate and the agent's situation), then weighted by the matching rule,
//! the agent's memory of it and the square root of its effective distance.

use std::collections::BTreeMap;

use ai_core::{EntityId, Vec2};

use crate::{
    BehaviorState, EnemyWorld, HullInfo, Structure, Target, TargetKind, TargetMemoryStore,
    TargetingRule, WallBreachLocator,
};

/// Distances below this are treated as equal.
pub const MIN_EFFECTIVE_DISTANCE: f32 = 100.0;

/// Tag assigned to a candidate and the multiplier its context applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub tag: String,
    pub multiplier: f32,
}

impl Classification {
    fn new(tag: impl Into<String>, multiplier: f32) -> Self {
        Self {
            tag: tag.into(),
            multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub target: Option<EntityId>,
    pub rule: Option<TargetingRule>,
    pub score: f32,
}

/// Snapshot of the evaluating agent.
#[derive(Debug, Clone, Copy)]
pub struct TargetEvaluator<'a> {
    pub agent: EntityId,
    pub position: Vec2,
    pub submarine: Option<EntityId>,
    pub hull: Option<HullInfo>,
    pub state: BehaviorState,
    pub combat_strength: f32,
    pub sight: f32,
    pub hearing: f32,
    pub aggressive_boarding: bool,
    pub rules: &'a BTreeMap<String, TargetingRule>,
    pub locator: &'a WallBreachLocator,
}

impl TargetEvaluator<'_> {
    fn hull_id(&self) -> Option<EntityId> {
        self.hull.map(|hull| hull.id)
    }

    /// Scores every candidate in `world` and returns the best one.
    ///
    /// Memories are created for every candidate that survives the perception checks.
    pub fn evaluate<W: EnemyWorld + ?Sized>(
        &self,
        world: &W,
        memory: &mut TargetMemoryStore,
    ) -> Evaluation {
        let ceiling = world.level_height();
        let mut best = Evaluation::default();

        for target in world.targets() {
            if !target.enabled || target.id == self.agent {
                continue;
            }
            if ceiling.is_some_and(|height| target.position.y > height) {
                continue;
            }
            let structure = match target.kind {
                TargetKind::Structure => world.structure(target.id),
                _ => None,
            };
            let Some(class) = self.classify(target, structure) else {
                continue;
            };
            let Some(rule) = self.rules.get(&class.tag) else {
                continue;
            };
            let value = class.multiplier * rule.priority;
            if value == 0.0 {
                continue;
            }
            let Some(distance) = self.effective_distance(target, memory.contains(target.id))
            else {
                continue;
            };

            let remembered = memory.get_or_create(target.id).priority();
            let score = value * remembered / distance.sqrt();
            tracing::trace!(
                agent = %self.agent,
                target = %target.id,
                tag = %class.tag,
                score,
                "scored target"
            );
            if score > best.score {
                best = Evaluation {
                    target: Some(target.id),
                    rule: Some(rule.clone()),
                    score,
                };
            }
        }
        best
    }

    /// Perceived distance to `target`, or `None` when the agent cannot perceive it.
    pub fn effective_distance(&self, target: &Target, memorized: bool) -> Option<f32> {
        let to_target = target.position - self.position;
        let mut distance = to_target.length();
        if memorized {
            distance *= 0.5;
        }
        if distance > target.sight_range * self.sight && distance > target.sound_range * self.hearing
        {
            return None;
        }
        if !target.is_visible_from(self.position) {
            return None;
        }
        distance = distance.max(MIN_EFFECTIVE_DISTANCE);
        if self
            .hull
            .is_some_and(|hull| to_target.y.abs() > hull.height)
        {
            distance *= 3.0;
        }
        Some(distance)
    }

    /// Tag and context multiplier for `target`, or `None` when it is filtered out.
    ///
    /// `structure` carries the wall sections for structure targets.
    pub fn classify(&self, target: &Target, structure: Option<&Structure>) -> Option<Classification> {
        match &target.kind {
            TargetKind::Creature(creature) => {
                if creature.dead {
                    return self
                        .boundary_multiplier(target)
                        .map(|m| Classification::new("dead", m));
                }
                if let Some(strength) = creature.combat_strength() {
                    let tag = if strength > self.combat_strength {
                        Some("stronger")
                    } else if strength < self.combat_strength {
                        Some("weaker")
                    } else {
                        None
                    };
                    if self.state == BehaviorState::Escape && tag == Some("stronger") {
                        return Some(Classification::new("stronger", 2.0));
                    }
                    let multiplier = self.boundary_multiplier(target)?;
                    return tag.map(|tag| Classification::new(tag, multiplier));
                }
                if target.submarine.is_some() && self.submarine.is_none() {
                    return Some(Classification::new("room", 1.0));
                }
                let species = creature.species.to_lowercase();
                self.rules
                    .contains_key(&species)
                    .then(|| Classification::new(species, 1.0))
            }
            TargetKind::Room => {
                if self.hull.is_some() {
                    return None;
                }
                Some(Classification::new("room", 1.0))
            }
            TargetKind::Item(item) => {
                if target.is_destroyed() {
                    return None;
                }
                self.item_tag(target, &item.tags)
                    .map(|tag| Classification::new(tag, 1.0))
            }
            TargetKind::Door(door) => {
                let tag = match self.item_tag(target, &door.tags) {
                    Some(tag) if tag != "room" => tag,
                    _ => "door".to_owned(),
                };
                let open = door.open || target.is_destroyed();
                let multiplier = if self.aggressive_boarding {
                    if self.hull.is_none() {
                        flag(door.outdoor) * if open { 5.0 } else { 1.0 }
                    } else {
                        flag(!door.outdoor) * flag(!open)
                    }
                } else if open {
                    return None;
                } else {
                    1.0
                };
                Some(Classification::new(tag, multiplier))
            }
            TargetKind::Structure => {
                if target.is_destroyed() {
                    return None;
                }
                let mut multiplier = 1.0;
                if self.aggressive_boarding {
                    multiplier = if self.hull.is_none() { 2.0 } else { 0.0 };
                    if multiplier > 0.0 {
                        multiplier *= flag(structure.is_some_and(|s| s.has_body));
                    }
                    if let Some(structure) = structure {
                        for (i, section) in structure.sections.iter().enumerate() {
                            if self.locator.is_passable(structure, i) {
                                multiplier = 0.0;
                                break;
                            }
                            if let Some(gap) = section.gap {
                                multiplier *= 1.0 + gap.open;
                            }
                        }
                    }
                }
                Some(Classification::new("wall", multiplier))
            }
        }
    }

    /// `None` across the submarine boundary, `0.5` in another compartment.
    fn boundary_multiplier(&self, target: &Target) -> Option<f32> {
        if target.submarine != self.submarine {
            None
        } else if target.hull != self.hull_id() {
            Some(0.5)
        } else {
            Some(1.0)
        }
    }

    /// `room` for items inside while the agent is outside, unless one of the item's own tags
    /// has a rule (first matching tag wins).
    fn item_tag(&self, target: &Target, tags: &[String]) -> Option<String> {
        let own = tags
            .iter()
            .map(|tag| tag.to_lowercase())
            .find(|tag| self.rules.contains_key(tag));
        if own.is_some() {
            return own;
        }
        (target.hull.is_some() && self.hull.is_none()).then(|| "room".to_owned())
    }
}

fn flag(condition: bool) -> f32 {
    if condition {
        1.0
    } else {
        0.0
    }
}
