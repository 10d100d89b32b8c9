//! A lone crawler hunting two divers in open water.
//!
//! Loads the crawler's AI from a JSON creature definition, then runs the controller for a few
//! simulated seconds while the host moves the body along the steering velocity and resolves
//! bites. Decisions are logged through `tracing`; raise verbosity with `RUST_LOG=debug`.
//!
//! Run:
//! `cargo run -p ai-enemy --example skirmish`

use ai_core::{EntityId, TickContext, Vec2};
use ai_enemy::{
    Attack, AttackContext, AttackOutcome, AttackRequest, AttackResult, Body, ControllerKind,
    CreatureInfo, EnemyAiConfig, EnemyAiController, EnemyWorld, Exit, HullInfo, Limb, LimbId,
    LimbKind, RayHit, Structure, Target, TargetKind,
};
use ai_nav::{Navigator, OpenWater, SteeringAccumulator};
use ai_tools::TraceLog;
use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

const DEFINITION: &str = r#"{
    "variants": [
        {
            "commonness": 3,
            "combat_strength": 2,
            "sight": 0.8,
            "hearing": 1.0,
            "flee_health_threshold": 25,
            "targeting": [
                { "tag": "human", "state": "attack", "priority": 60 },
                { "tag": "dead", "state": "eat", "priority": 20 }
            ]
        },
        {
            "commonness": 1,
            "combat_strength": 1,
            "attack_when_provoked": true,
            "sight": 0.5,
            "hearing": 0.5,
            "targeting": [
                { "tag": "human", "state": "idle", "priority": 10 }
            ]
        }
    ]
}"#;

const TICKS: u64 = 300;
const DT: f32 = 1.0 / 30.0;

struct Ocean {
    targets: Vec<Target>,
}

impl EnemyWorld for Ocean {
    fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn structure(&self, _id: EntityId) -> Option<&Structure> {
        None
    }

    fn raycast_structures(&self, _from: Vec2, _to: Vec2) -> Option<RayHit> {
        None
    }

    fn exits(&self) -> &[Exit] {
        &[]
    }

    fn navigator(&self) -> &dyn Navigator {
        &OpenWater
    }

    fn apply_attack(&mut self, request: &AttackRequest) -> Option<AttackOutcome> {
        let target = self.targets.iter_mut().find(|t| t.id == request.target)?;
        let health = target.health.as_mut()?;
        *health -= request.damage;
        let target_health = *health;
        if target_health <= 0.0 {
            if let TargetKind::Creature(creature) = &mut target.kind {
                creature.dead = true;
            }
        }
        Some(AttackOutcome {
            result: AttackResult {
                damage: request.damage,
            },
            target_health,
        })
    }
}

struct Crawler {
    position: Vec2,
    health: f32,
    limbs: Vec<Limb>,
}

impl Crawler {
    const JAW: LimbId = LimbId(1);
    const BODY: LimbId = LimbId(2);

    fn new(position: Vec2) -> Self {
        let mut jaw = Limb::new(Self::JAW, LimbKind::Head, position + Vec2::new(1.0, 0.0))
            .with_attack(Attack::new(2.0, 15.0, 1.5));
        jaw.mouth = Some(jaw.position);
        Self {
            position,
            health: 100.0,
            limbs: vec![jaw, Limb::new(Self::BODY, LimbKind::Torso, position)],
        }
    }

    /// Moves the whole body, keeping the jaw ahead of the torso along `heading`.
    fn move_to(&mut self, position: Vec2, heading: Vec2) {
        self.position = position;
        let forward = heading.normalize_or(Vec2::UNIT_X);
        for limb in &mut self.limbs {
            limb.position = match limb.kind {
                LimbKind::Head => position + forward,
                _ => position,
            };
            if limb.mouth.is_some() {
                limb.mouth = Some(limb.position);
            }
        }
    }

    fn tick_cooldowns(&mut self, dt: f32) {
        for attack in self.limbs.iter_mut().filter_map(|l| l.attack.as_mut()) {
            attack.tick(dt);
        }
    }
}

impl Body for Crawler {
    fn id(&self) -> EntityId {
        EntityId(1)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn vitality(&self) -> f32 {
        100.0
    }

    fn collider_size(&self) -> f32 {
        1.0
    }

    fn crush_depth(&self) -> f32 {
        -5000.0
    }

    fn submarine(&self) -> Option<EntityId> {
        None
    }

    fn hull(&self) -> Option<HullInfo> {
        None
    }

    fn attack_context(&self) -> AttackContext {
        AttackContext::Water
    }

    fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    fn limbs_mut(&mut self) -> &mut [Limb] {
        &mut self.limbs
    }

    fn movement_speed(&self, run: bool) -> f32 {
        if run {
            6.0
        } else {
            3.0
        }
    }

    fn release_stuck_limbs(&mut self) {
        for limb in &mut self.limbs {
            limb.stuck = false;
        }
    }

    fn set_reverse(&mut self, _reverse: bool) {}

    fn grab(&mut self, target: EntityId) {
        tracing::trace!(%target, "grabbed");
    }

    fn apply_force(&mut self, _force: Vec2, _at: Vec2) {}
}

fn diver(id: u64, position: Vec2) -> Target {
    Target::creature(
        EntityId(id),
        position,
        CreatureInfo::new("human", ControllerKind::Player),
    )
    .with_ranges(60.0, 40.0)
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = EnemyAiConfig::from_definition_json(DEFINITION, "crawler-7")?;
    tracing::info!(
        strength = config.combat_strength,
        rules = config.targeting.len(),
        "crawler variant loaded"
    );

    let mut world = Ocean {
        targets: vec![diver(2, Vec2::new(20.0, 4.0)), diver(3, Vec2::new(-35.0, -10.0))],
    };
    let mut body = Crawler::new(Vec2::ZERO);
    let mut steering = SteeringAccumulator::new(body.position).with_seed(7);
    let trace = TraceLog::new();
    let mut ai = EnemyAiController::new(config, &body).with_trace_sink(Box::new(trace.clone()));

    let mut ctx = TickContext::new(0, DT, 7);
    for _ in 0..TICKS {
        ai.update(&ctx, &mut world, &mut body, &mut steering);

        steering.integrate(ctx.dt());
        body.move_to(steering.position, steering.velocity);
        body.tick_cooldowns(ctx.dt());

        if ctx.tick == 150 {
            // Second diver fires a harpoon at the crawler.
            let shooter = world.targets[1].clone();
            let damage = 20.0;
            body.health -= damage;
            ai.on_attacked(Some(&shooter), &AttackResult { damage }, &mut body);
        }
        ctx = ctx.next();
    }

    for event in trace.snapshot() {
        tracing::info!(
            tick = event.tick,
            tag = %event.tag,
            subject = ?event.subject,
            detail = ?event.detail,
            "decision"
        );
    }
    tracing::info!(
        state = %ai.state(),
        target = ?ai.selected_target(),
        x = body.position.x,
        y = body.position.y,
        "final"
    );
    Ok(())
}
