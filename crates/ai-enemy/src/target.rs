//! World entities a hostile agent can notice, chase, breach or eat.
//!
//! The controller never owns targets. It refers to them by [`EntityId`] and re-reads them
//! from the world every tick; a target exists only while the world still lists it.

use ai_core::{EntityId, Vec2};

use crate::AttackTarget;

/// Cone from which a target can be perceived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub direction: Vec2,
    /// Radians; anything at or above `PI` covers every direction.
    pub half_angle: f32,
}

impl Sector {
    pub fn new(direction: Vec2, half_angle: f32) -> Self {
        Self {
            direction,
            half_angle,
        }
    }

    /// `true` when `point` lies inside the cone opening from `origin`.
    pub fn contains(&self, origin: Vec2, point: Vec2) -> bool {
        if self.half_angle >= core::f32::consts::PI {
            return true;
        }
        let to_point = point - origin;
        if to_point.length_squared() <= f32::EPSILON {
            return true;
        }
        let direction = self.direction.normalize_or(Vec2::UNIT_X);
        direction.dot(to_point.normalize_or_zero()) >= self.half_angle.cos()
    }
}

/// Who drives a creature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerKind {
    Player,
    HumanAi,
    EnemyAi { combat_strength: f32 },
}

/// A creature limb as seen by an attacker choosing where to bite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLimb {
    pub position: Vec2,
    /// How strongly the limb attracts attacks; larger is more attractive.
    pub attack_priority: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatureInfo {
    pub species: String,
    pub dead: bool,
    pub controller: ControllerKind,
    pub limbs: Vec<TargetLimb>,
}

impl CreatureInfo {
    pub fn new(species: impl Into<String>, controller: ControllerKind) -> Self {
        Self {
            species: species.into(),
            dead: false,
            controller,
            limbs: Vec::new(),
        }
    }

    pub fn combat_strength(&self) -> Option<f32> {
        match self.controller {
            ControllerKind::EnemyAi { combat_strength } => Some(combat_strength),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DoorInfo {
    pub tags: Vec<String>,
    pub open: bool,
    /// Leads from open water into a compartment.
    pub outdoor: bool,
    /// Passed horizontally (a door in a vertical wall); `false` for hatches.
    pub horizontal: bool,
    /// Half the opening, measured across the direction of passage.
    pub span: f32,
    /// Center of the compartment the door opens into.
    pub flow_target: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemInfo {
    pub tags: Vec<String>,
    /// Creature currently carrying the item.
    pub holder: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetKind {
    Creature(CreatureInfo),
    Door(DoorInfo),
    /// A wall; its sections live in the world's structure registry under the same id.
    Structure,
    Item(ItemInfo),
    /// An interior compartment.
    Room,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: EntityId,
    pub position: Vec2,
    pub sight_range: f32,
    pub sound_range: f32,
    pub sector: Option<Sector>,
    pub enabled: bool,
    /// Structure boundary the target is inside; `None` means open water.
    pub submarine: Option<EntityId>,
    pub hull: Option<EntityId>,
    /// Present only for damageable targets.
    pub health: Option<f32>,
    pub kind: TargetKind,
}

impl Target {
    pub fn new(id: EntityId, position: Vec2, kind: TargetKind) -> Self {
        Self {
            id,
            position,
            sight_range: 0.0,
            sound_range: 0.0,
            sector: None,
            enabled: true,
            submarine: None,
            hull: None,
            health: None,
            kind,
        }
    }

    pub fn creature(id: EntityId, position: Vec2, info: CreatureInfo) -> Self {
        Self::new(id, position, TargetKind::Creature(info)).with_health(100.0)
    }

    pub fn with_ranges(mut self, sight_range: f32, sound_range: f32) -> Self {
        self.sight_range = sight_range;
        self.sound_range = sound_range;
        self
    }

    pub fn with_sector(mut self, sector: Sector) -> Self {
        self.sector = Some(sector);
        self
    }

    pub fn with_health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn inside(mut self, submarine: EntityId, hull: Option<EntityId>) -> Self {
        self.submarine = Some(submarine);
        self.hull = hull;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn as_creature(&self) -> Option<&CreatureInfo> {
        match &self.kind {
            TargetKind::Creature(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_visible_from(&self, point: Vec2) -> bool {
        self.sector
            .map_or(true, |sector| sector.contains(self.position, point))
    }

    /// Damageable and out of health.
    pub fn is_destroyed(&self) -> bool {
        self.health.is_some_and(|health| health <= 0.0)
    }

    /// Category used to validate attacks against this target.
    pub fn attack_target(&self) -> AttackTarget {
        match self.kind {
            TargetKind::Creature(_) => AttackTarget::Character,
            _ => AttackTarget::Structure,
        }
    }
}
