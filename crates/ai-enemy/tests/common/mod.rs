#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use ai_core::{EntityId, TickContext, Vec2};
use ai_enemy::{
    Attachment, Attack, AttackContext, AttackOutcome, AttackRequest, AttackResult, Body,
    ControllerKind, CreatureInfo, EnemyAiConfig, EnemyWorld, Exit, HullInfo, Limb, LimbId,
    LimbKind, RayHit, Structure, Target, TargetKind,
};
use ai_nav::{NavPath, Navigator, OpenWater};

pub const AGENT: EntityId = EntityId(1);
pub const HEAD: LimbId = LimbId(1);
pub const TORSO: LimbId = LimbId(2);
pub const TAIL: LimbId = LimbId(3);

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1, 7)
}

/// Navigator that refuses goals listed in `blocked`.
#[derive(Debug, Default)]
pub struct TestNav {
    pub blocked: Vec<Vec2>,
}

impl Navigator for TestNav {
    fn find_path(&self, start: Vec2, goal: Vec2) -> NavPath {
        if self.blocked.iter().any(|b| b.distance(goal) < 1e-3) {
            NavPath::unreachable()
        } else {
            OpenWater.find_path(start, goal)
        }
    }
}

#[derive(Debug, Default)]
pub struct TestWorld {
    pub targets: Vec<Target>,
    pub structures: BTreeMap<EntityId, Structure>,
    pub exits: Vec<Exit>,
    pub nav: TestNav,
    pub level_height: Option<f32>,
    pub ray_hit: Option<RayHit>,
    pub attacks: Vec<AttackRequest>,
    pub miss: bool,
}

impl TestWorld {
    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    pub fn add_structure(&mut self, structure: Structure) {
        self.structures.insert(structure.id, structure);
    }

    pub fn remove_target(&mut self, id: EntityId) {
        self.targets.retain(|t| t.id != id);
    }

    pub fn target_mut(&mut self, id: EntityId) -> &mut Target {
        self.targets
            .iter_mut()
            .find(|t| t.id == id)
            .expect("target in world")
    }
}

impl EnemyWorld for TestWorld {
    fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn structure(&self, id: EntityId) -> Option<&Structure> {
        self.structures.get(&id)
    }

    fn raycast_structures(&self, _from: Vec2, _to: Vec2) -> Option<RayHit> {
        self.ray_hit
    }

    fn exits(&self) -> &[Exit] {
        &self.exits
    }

    fn navigator(&self) -> &dyn Navigator {
        &self.nav
    }

    fn level_height(&self) -> Option<f32> {
        self.level_height
    }

    fn apply_attack(&mut self, request: &AttackRequest) -> Option<AttackOutcome> {
        self.attacks.push(request.clone());
        if self.miss {
            return None;
        }
        let target = self.targets.iter_mut().find(|t| t.id == request.target)?;
        let damage = match target.kind {
            TargetKind::Creature(_) => request.damage,
            _ => request.structure_damage,
        };
        let health = target.health.as_mut()?;
        *health -= damage;
        Some(AttackOutcome {
            result: AttackResult { damage },
            target_health: *health,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TestBody {
    pub id: EntityId,
    pub position: Vec2,
    pub health: f32,
    pub vitality: f32,
    pub collider: f32,
    pub crush_depth: f32,
    pub submarine: Option<EntityId>,
    pub hull: Option<HullInfo>,
    pub context: AttackContext,
    pub limbs: Vec<Limb>,
    pub speed: f32,
    pub reversed: bool,
    pub released: usize,
    pub grabbed: Option<EntityId>,
    pub forces: Vec<(Vec2, Vec2)>,
}

impl TestBody {
    pub fn new(position: Vec2) -> Self {
        Self {
            id: AGENT,
            position,
            health: 100.0,
            vitality: 100.0,
            collider: 1.0,
            crush_depth: -10_000.0,
            submarine: None,
            hull: None,
            context: AttackContext::Water,
            limbs: Vec::new(),
            speed: 1.0,
            reversed: false,
            released: 0,
            grabbed: None,
            forces: Vec::new(),
        }
    }

    /// Torso at `position`, a biting head one unit to the right.
    pub fn biter(position: Vec2) -> Self {
        let mut body = Self::new(position);
        body.limbs = vec![
            Limb::new(HEAD, LimbKind::Head, position + Vec2::new(1.0, 0.0))
                .with_attack(Attack::new(5.0, 10.0, 2.0)),
            Limb::new(TORSO, LimbKind::Torso, position),
        ];
        body
    }

    pub fn attack_mut(&mut self, limb: LimbId) -> &mut Attack {
        self.limbs
            .iter_mut()
            .find(|l| l.id == limb)
            .and_then(|l| l.attack.as_mut())
            .expect("armed limb")
    }

    pub fn attack(&self, limb: LimbId) -> &Attack {
        self.limbs
            .iter()
            .find(|l| l.id == limb)
            .and_then(|l| l.attack.as_ref())
            .expect("armed limb")
    }

    pub fn tick_cooldowns(&mut self, dt: f32) {
        for attack in self.limbs.iter_mut().filter_map(|l| l.attack.as_mut()) {
            attack.tick(dt);
        }
    }
}

impl Body for TestBody {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn vitality(&self) -> f32 {
        self.vitality
    }

    fn collider_size(&self) -> f32 {
        self.collider
    }

    fn crush_depth(&self) -> f32 {
        self.crush_depth
    }

    fn submarine(&self) -> Option<EntityId> {
        self.submarine
    }

    fn hull(&self) -> Option<HullInfo> {
        self.hull
    }

    fn attack_context(&self) -> AttackContext {
        self.context
    }

    fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    fn limbs_mut(&mut self) -> &mut [Limb] {
        &mut self.limbs
    }

    fn movement_speed(&self, run: bool) -> f32 {
        if run {
            self.speed * 2.0
        } else {
            self.speed
        }
    }

    fn release_stuck_limbs(&mut self) {
        self.released += 1;
        for limb in &mut self.limbs {
            limb.stuck = false;
        }
    }

    fn set_reverse(&mut self, reverse: bool) {
        self.reversed = reverse;
    }

    fn grab(&mut self, target: EntityId) {
        self.grabbed = Some(target);
    }

    fn apply_force(&mut self, force: Vec2, at: Vec2) {
        self.forces.push((force, at));
    }
}

#[derive(Debug, Default)]
pub struct AttachState {
    pub attached: bool,
    pub detaches: usize,
    pub target: Option<(EntityId, Vec2, Vec2)>,
}

/// Attachment whose state stays observable after it is boxed into a controller.
#[derive(Debug, Clone, Default)]
pub struct SharedAttachment(pub Rc<RefCell<AttachState>>);

impl SharedAttachment {
    pub fn set_attached(&self, attached: bool) {
        self.0.borrow_mut().attached = attached;
    }
}

impl Attachment for SharedAttachment {
    fn is_attached(&self) -> bool {
        self.0.borrow().attached
    }

    fn detach(&mut self) {
        let mut state = self.0.borrow_mut();
        state.attached = false;
        state.detaches += 1;
    }

    fn set_attach_target(&mut self, structure: EntityId, point: Vec2, normal: Vec2) {
        self.0.borrow_mut().target = Some((structure, point, normal));
    }
}

pub fn creature(
    id: u64,
    position: Vec2,
    species: &str,
    controller: ControllerKind,
) -> Target {
    Target::creature(EntityId(id), position, CreatureInfo::new(species, controller))
        .with_ranges(1000.0, 1000.0)
}

pub fn human(id: u64, position: Vec2) -> Target {
    creature(id, position, "human", ControllerKind::Player)
}

/// Perceptive agent with the given rules.
pub fn hunter_config() -> EnemyAiConfig {
    EnemyAiConfig {
        sight: 1.0,
        hearing: 1.0,
        ..EnemyAiConfig::default()
    }
}
