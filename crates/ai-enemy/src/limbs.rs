use ai_core::math::{inverse_lerp, lerp};
use ai_core::Vec2;

use crate::{Attack, AttackContext, AttackTarget, Limb, LimbId, Target};

/// Picks the limb to attack with.
///
/// A limb qualifies when it is intact, free, armed, off cooldown, usable in the body's current
/// medium and against the target's category, and (for creature targets) all of its
/// conditions hold. Among those the best `(1 + priority) * falloff` wins, where the falloff
/// drops linearly from 1 at the aim point to 0 at three times the attack range.
#[derive(Debug, Clone, Copy)]
pub struct AttackLimbSelector<'a> {
    pub aim: Vec2,
    pub context: AttackContext,
    pub target_type: AttackTarget,
    /// Creature being attacked, for conditional attacks.
    pub creature: Option<&'a Target>,
    pub ignored: Option<LimbId>,
}

impl<'a> AttackLimbSelector<'a> {
    pub fn new(aim: Vec2, context: AttackContext, target_type: AttackTarget) -> Self {
        Self {
            aim,
            context,
            target_type,
            creature: None,
            ignored: None,
        }
    }

    pub fn against_creature(mut self, creature: &'a Target) -> Self {
        self.creature = Some(creature);
        self
    }

    pub fn ignoring(mut self, limb: Option<LimbId>) -> Self {
        self.ignored = limb;
        self
    }

    pub fn is_eligible(&self, limb: &Limb) -> bool {
        if Some(limb.id) == self.ignored || limb.severed || limb.stuck {
            return false;
        }
        let Some(attack) = limb.attack.as_ref() else {
            return false;
        };
        if attack.is_cooling_down()
            || !attack.is_valid_context(self.context)
            || !attack.is_valid_target(self.target_type)
        {
            return false;
        }
        self.creature
            .filter(|target| target.as_creature().is_some())
            .map_or(true, |target| attack.conditions_match(target))
    }

    pub fn score(&self, limb: &Limb, attack: &Attack) -> f32 {
        let dist = limb.position.distance(self.aim);
        let falloff = lerp(1.0, 0.0, inverse_lerp(0.0, attack.range * 3.0, dist));
        (1.0 + attack.priority) * falloff
    }

    /// Highest strictly positive score; ties keep the earlier limb.
    pub fn select(&self, limbs: &[Limb]) -> Option<LimbId> {
        let mut best = None;
        let mut best_score = 0.0;
        for limb in limbs {
            if !self.is_eligible(limb) {
                continue;
            }
            let Some(attack) = limb.attack.as_ref() else {
                continue;
            };
            let score = self.score(limb, attack);
            if score > best_score {
                best_score = score;
                best = Some(limb.id);
            }
        }
        best
    }
}
