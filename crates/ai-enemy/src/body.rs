//! The agent's own body: limbs, their attacks, and the physical hooks the controller pulls.

use ai_core::{EntityId, Vec2};

use crate::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LimbId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimbKind {
    Torso,
    Head,
    Other,
}

/// What the agent does while its attack limb is cooling down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AfterAttack {
    #[default]
    Pursue,
    PursueIfCanAttack,
    FallBackUntilCanAttack,
    FallBack,
}

/// Medium an attack works in. Bodies report `Water` or `Ground`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackContext {
    #[default]
    Any,
    Water,
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackTarget {
    #[default]
    Any,
    Character,
    Structure,
}

/// Predicate an attack requires of a creature target.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackCondition {
    Species(String),
    NotSpecies(String),
    Dead(bool),
    HealthBelow(f32),
    HealthAbove(f32),
}

impl AttackCondition {
    pub fn matches(&self, target: &Target) -> bool {
        let creature = target.as_creature();
        match self {
            AttackCondition::Species(species) => {
                creature.is_some_and(|c| c.species.eq_ignore_ascii_case(species))
            }
            AttackCondition::NotSpecies(species) => {
                creature.map_or(true, |c| !c.species.eq_ignore_ascii_case(species))
            }
            AttackCondition::Dead(dead) => creature.is_some_and(|c| c.dead == *dead),
            AttackCondition::HealthBelow(limit) => target.health.is_some_and(|h| h < *limit),
            AttackCondition::HealthAbove(limit) => target.health.is_some_and(|h| h > *limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub range: f32,
    pub priority: f32,
    pub damage: f32,
    pub structure_damage: f32,
    pub cooldown: f32,
    pub cooldown_timer: f32,
    /// Time after which another limb may take over; `0` disables switching.
    pub secondary_cooldown: f32,
    pub secondary_cooldown_timer: f32,
    pub after_attack: AfterAttack,
    pub context: AttackContext,
    pub target_type: AttackTarget,
    pub conditions: Vec<AttackCondition>,
    /// The body swims backwards while this attack is active.
    pub reverse: bool,
}

impl Attack {
    pub fn new(range: f32, damage: f32, cooldown: f32) -> Self {
        Self {
            range,
            priority: 1.0,
            damage,
            structure_damage: 0.0,
            cooldown,
            cooldown_timer: 0.0,
            secondary_cooldown: 0.0,
            secondary_cooldown_timer: 0.0,
            after_attack: AfterAttack::default(),
            context: AttackContext::default(),
            target_type: AttackTarget::default(),
            conditions: Vec::new(),
            reverse: false,
        }
    }

    pub fn is_valid_context(&self, context: AttackContext) -> bool {
        self.context == AttackContext::Any || self.context == context
    }

    pub fn is_valid_target(&self, target: AttackTarget) -> bool {
        self.target_type == AttackTarget::Any || self.target_type == target
    }

    pub fn conditions_match(&self, target: &Target) -> bool {
        self.conditions.iter().all(|c| c.matches(target))
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_timer > 0.0
    }

    /// Arms both cooldowns after a landed hit.
    pub fn start_cooldown(&mut self) {
        self.cooldown_timer = self.cooldown;
        self.secondary_cooldown_timer = self.secondary_cooldown;
    }

    /// Counts both cooldowns down; called by whoever owns the body.
    pub fn tick(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        self.secondary_cooldown_timer = (self.secondary_cooldown_timer - dt).max(0.0);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Limb {
    pub id: LimbId,
    pub kind: LimbKind,
    pub position: Vec2,
    pub mass: f32,
    pub severed: bool,
    pub stuck: bool,
    /// World position of the mouth, for limbs that have one.
    pub mouth: Option<Vec2>,
    pub attack: Option<Attack>,
}

impl Limb {
    pub fn new(id: LimbId, kind: LimbKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            mass: 1.0,
            severed: false,
            stuck: false,
            mouth: None,
            attack: None,
        }
    }

    pub fn with_attack(mut self, attack: Attack) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn with_mouth(mut self, mouth: Vec2) -> Self {
        self.mouth = Some(mouth);
        self
    }
}

/// Interior compartment the body currently occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullInfo {
    pub id: EntityId,
    pub height: f32,
}

/// Physical body driven by one controller.
pub trait Body {
    fn id(&self) -> EntityId;
    fn position(&self) -> Vec2;
    fn health(&self) -> f32;
    fn vitality(&self) -> f32;
    /// Smallest dimension of the main collider.
    fn collider_size(&self) -> f32;
    /// Depth (a y coordinate) below which the body is crushed.
    fn crush_depth(&self) -> f32;
    fn submarine(&self) -> Option<EntityId>;
    fn hull(&self) -> Option<HullInfo>;
    fn attack_context(&self) -> AttackContext;
    fn limbs(&self) -> &[Limb];
    fn limbs_mut(&mut self) -> &mut [Limb];
    fn movement_speed(&self, run: bool) -> f32;
    fn release_stuck_limbs(&mut self);
    fn set_reverse(&mut self, reverse: bool);
    /// Take hold of a creature (eating).
    fn grab(&mut self, target: EntityId);
    fn apply_force(&mut self, force: Vec2, at: Vec2);

    fn limb(&self, id: LimbId) -> Option<&Limb> {
        self.limbs().iter().find(|limb| limb.id == id)
    }

    fn limb_mut(&mut self, id: LimbId) -> Option<&mut Limb> {
        self.limbs_mut().iter_mut().find(|limb| limb.id == id)
    }

    fn limb_of_kind(&self, kind: LimbKind) -> Option<&Limb> {
        self.limbs().iter().find(|limb| limb.kind == kind)
    }

    /// First limb with a mouth, else the head.
    fn mouth_limb(&self) -> Option<&Limb> {
        self.limbs()
            .iter()
            .find(|limb| limb.mouth.is_some())
            .or_else(|| self.limb_of_kind(LimbKind::Head))
    }

    fn mouth_position(&self) -> Option<Vec2> {
        self.mouth_limb()
            .map(|limb| limb.mouth.unwrap_or(limb.position))
    }
}
