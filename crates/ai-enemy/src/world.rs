//! What a hostile agent can ask of the simulation it lives in.

use ai_core::{EntityId, Vec2};
use ai_nav::Navigator;

use crate::{LimbId, Structure, Target};

/// First static body crossed by a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Wall that was hit, or `None` for any other static body.
    pub structure: Option<EntityId>,
    pub position: Vec2,
    /// Fraction of the ray travelled before the hit; `1` means unobstructed.
    pub fraction: f32,
}

/// Opening through which an agent can leave a submarine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exit {
    pub position: Vec2,
    pub open: f32,
    pub room_to_room: bool,
    pub submarine: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackRequest {
    pub attacker: EntityId,
    pub limb: LimbId,
    pub target: EntityId,
    pub aim: Vec2,
    pub distance: f32,
    pub damage: f32,
    pub structure_damage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttackResult {
    pub damage: f32,
}

/// A landed hit: the damage dealt and the target's health afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub result: AttackResult,
    pub target_health: f32,
}

pub trait EnemyWorld {
    /// Every live target, in a stable order.
    fn targets(&self) -> &[Target];

    fn target(&self, id: EntityId) -> Option<&Target> {
        self.targets().iter().find(|target| target.id == id)
    }

    fn structure(&self, id: EntityId) -> Option<&Structure>;

    /// Cast against static structures only; movable bodies are ignored.
    fn raycast_structures(&self, from: Vec2, to: Vec2) -> Option<RayHit>;

    fn exits(&self) -> &[Exit];

    fn navigator(&self) -> &dyn Navigator;

    /// Targets above this height are out of play.
    fn level_height(&self) -> Option<f32> {
        None
    }

    /// Resolves an attack; `None` when it missed.
    fn apply_attack(&mut self, request: &AttackRequest) -> Option<AttackOutcome>;
}
