//! The per-agent behavior state machine.

mod attack;
mod behaviors;

use std::collections::BTreeMap;

use ai_core::{Countdown, EntityId, TickContext, Vec2};
use ai_nav::Steering;
use ai_tools::{NullTraceSink, TraceEvent, TraceSink};

use crate::{
    Attachment, AttackResult, AttackTarget, BehaviorState, Body, ControllerKind, EnemyAiConfig,
    EnemyWorld, LimbId, Target, TargetEvaluator, TargetMemoryStore, TargetingRule,
    WallBreachLocator, WallTarget,
};

/// Decision core of one hostile agent.
///
/// Owns everything the agent remembers between ticks: the memory store, the selected target,
/// the wall target, the active attack limb and the two interval timers. The world, the body
/// and steering are borrowed for the duration of a call.
pub struct EnemyAiController {
    id: EntityId,
    config: EnemyAiConfig,
    rules: BTreeMap<String, TargetingRule>,
    state: BehaviorState,
    memory: TargetMemoryStore,
    selected: Option<EntityId>,
    previous: Option<EntityId>,
    target_value: f32,
    wall_target: Option<WallTarget>,
    attack_limb: Option<LimbId>,
    reversed: bool,
    escape_point: Option<Vec2>,
    retarget_timer: Countdown,
    raycast_timer: Countdown,
    indoors: bool,
    can_break_doors: bool,
    collider_size: f32,
    locator: WallBreachLocator,
    attachment: Option<Box<dyn Attachment>>,
    trace: Box<dyn TraceSink>,
    tick: u64,
}

impl core::fmt::Debug for EnemyAiController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EnemyAiController")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("selected", &self.selected)
            .field("wall_target", &self.wall_target)
            .field("attack_limb", &self.attack_limb)
            .finish_non_exhaustive()
    }
}

impl EnemyAiController {
    pub fn new<B: Body + ?Sized>(config: EnemyAiConfig, body: &B) -> Self {
        let config = config.normalized();
        let rules = config.rule_map();
        let collider_size = body.collider_size();
        let locator = WallBreachLocator::new(collider_size, config.aggressive_boarding);

        let can_break_doors = rules.get("room").is_some_and(|rule| rule.priority > 0.0) && {
            let context = body.attack_context();
            body.limbs().iter().filter_map(|l| l.attack.as_ref()).any(|attack| {
                attack.is_valid_target(AttackTarget::Structure)
                    && attack.is_valid_context(context)
                    && attack.structure_damage > 0.0
            })
        };

        Self {
            id: body.id(),
            memory: TargetMemoryStore::new(config.memory),
            rules,
            state: BehaviorState::Idle,
            selected: None,
            previous: None,
            target_value: 0.0,
            wall_target: None,
            attack_limb: None,
            reversed: false,
            escape_point: None,
            retarget_timer: Countdown::ready(),
            raycast_timer: Countdown::ready(),
            indoors: false,
            can_break_doors,
            collider_size,
            locator,
            attachment: None,
            trace: Box::new(NullTraceSink),
            tick: 0,
            config,
        }
    }

    pub fn with_attachment(mut self, attachment: Box<dyn Attachment>) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = sink;
        self
    }

    /// Runs one simulation tick.
    pub fn update<W, B, S>(&mut self, ctx: &TickContext, world: &mut W, body: &mut B, steering: &mut S)
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        let dt = ctx.dt();
        self.tick = ctx.tick;

        self.memory.age(dt, |id| world.target(id).is_some());

        if self.retarget_timer.tick(dt) {
            let rule = self.update_targets(&*world, &*body);
            self.retarget_timer
                .reset(self.config.timing.update_targets_interval);

            if self.selected.is_none() {
                self.set_state(BehaviorState::Idle, body);
            } else if body.health() < self.config.flee_health_threshold {
                self.set_state(BehaviorState::Escape, body);
            } else if let Some(rule) = rule {
                self.set_state(rule.state, body);
            }
        }

        if self.selected.is_some_and(|id| world.target(id).is_none()) {
            self.set_state(BehaviorState::Idle, body);
            return;
        }

        let indoors = body.submarine().is_some();
        if indoors != self.indoors {
            steering.reset();
            self.indoors = indoors;
        }
        steering.set_indoors(indoors);

        let run = match self.state {
            BehaviorState::Idle => {
                self.update_idle(dt, &*world, &*body, steering);
                false
            }
            BehaviorState::Attack => {
                let run = !self.is_cooldown_running(&*body);
                self.update_attack(dt, world, body, steering);
                run
            }
            BehaviorState::Eat => {
                self.update_eat(dt, &*world, body, steering);
                false
            }
            BehaviorState::Escape => {
                self.update_escape(dt, &*world, body, steering);
                true
            }
        };

        steering.update(body.movement_speed(run));
    }

    /// Re-scores every target. Returns the winning rule, or `None` when the target was kept
    /// because the agent is latched onto it.
    fn update_targets<W, B>(&mut self, world: &W, body: &B) -> Option<TargetingRule>
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
    {
        if self.is_properly_latched() {
            return None;
        }

        let evaluator = TargetEvaluator {
            agent: self.id,
            position: body.position(),
            submarine: body.submarine(),
            hull: body.hull(),
            state: self.state,
            combat_strength: self.config.combat_strength,
            sight: self.config.sight,
            hearing: self.config.hearing,
            aggressive_boarding: self.config.aggressive_boarding,
            rules: &self.rules,
            locator: &self.locator,
        };
        let evaluation = evaluator.evaluate(world, &mut self.memory);

        self.target_value = evaluation.score;
        self.assign_target(evaluation.target);
        if self.selected != self.previous {
            self.wall_target = None;
            tracing::debug!(
                agent = %self.id,
                target = ?self.selected,
                score = evaluation.score,
                "target changed"
            );
            let mut event = TraceEvent::new(self.tick, self.id.stable_id(), "target")
                .with_value(evaluation.score);
            if let Some(target) = self.selected {
                event = event.with_subject(target.stable_id());
            }
            if let Some(rule) = &evaluation.rule {
                event = event.with_detail(rule.tag.clone());
            }
            self.trace.emit(event);
        }
        evaluation.rule
    }

    /// Forces `target` as the current target, creating its memory.
    pub fn select_target(&mut self, target: EntityId) {
        self.assign_target(Some(target));
        self.memory.get_or_create(target);
        self.target_value = 100.0;
    }

    fn assign_target(&mut self, target: Option<EntityId>) {
        self.previous = self.selected;
        self.selected = target;
    }

    /// The last assignment replaced one target with another.
    fn target_changed(&self) -> bool {
        self.previous.is_some() && self.selected != self.previous
    }

    /// Reaction to being hit, whether or not damage was dealt.
    pub fn on_attacked<B: Body + ?Sized>(
        &mut self,
        attacker: Option<&Target>,
        result: &AttackResult,
        body: &mut B,
    ) {
        self.retarget_timer
            .expire_within(self.config.timing.provoked_retarget_delay);

        let provoking = match attacker {
            None => true,
            Some(target) => target.as_creature().is_some_and(|creature| {
                matches!(
                    creature.controller,
                    ControllerKind::Player | ControllerKind::HumanAi
                )
            }),
        };
        if result.damage > 0.0 && self.config.attack_when_provoked && provoking {
            for tag in ["human", "room"] {
                self.set_targeting_rule(TargetingRule::new(tag, BehaviorState::Attack, 100.0));
            }
            tracing::debug!(agent = %self.id, "provoked");
            self.trace.emit(
                TraceEvent::new(self.tick, self.id.stable_id(), "provoked")
                    .with_value(result.damage),
            );
        }

        self.detach();
        body.release_stuck_limbs();

        let Some(attacker) = attacker else {
            return;
        };
        let relative = result.damage / body.vitality().max(1.0);
        self.memory
            .get_or_create(attacker.id)
            .add(relative * self.config.aggression_hurt);

        if self.selected != Some(attacker.id) {
            for attack in body.limbs_mut().iter_mut().filter_map(|l| l.attack.as_mut()) {
                attack.cooldown_timer *= 0.1;
            }
        }
    }

    /// Switches behavior, running the cleanup hook when the state actually changes.
    pub fn set_state<B: Body + ?Sized>(&mut self, state: BehaviorState, body: &mut B) {
        if state == self.state {
            return;
        }
        let from = self.state;
        self.state = state;

        self.detach();
        body.release_stuck_limbs();
        self.escape_point = None;
        self.wall_target = None;
        self.set_attack_limb(None, body);

        tracing::debug!(agent = %self.id, %from, to = %state, "state changed");
        self.trace.emit(
            TraceEvent::new(self.tick, self.id.stable_id(), "state").with_detail(state.as_str()),
        );
    }

    /// Makes `limb` the active attack limb and syncs the body's reverse flag with it.
    pub fn set_attack_limb<B: Body + ?Sized>(&mut self, limb: Option<LimbId>, body: &mut B) {
        self.attack_limb = limb;
        self.reversed = limb
            .and_then(|id| body.limb(id))
            .and_then(|l| l.attack.as_ref())
            .is_some_and(|attack| attack.reverse);
        body.set_reverse(self.reversed);
    }

    /// Adds or replaces the rule for `rule.tag`.
    pub fn set_targeting_rule(&mut self, rule: TargetingRule) {
        let tag = rule.tag.to_lowercase();
        self.rules.insert(tag.clone(), TargetingRule { tag, ..rule });
    }

    fn detach(&mut self) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.detach();
        }
    }

    fn is_attached(&self) -> bool {
        self.attachment.as_ref().is_some_and(|a| a.is_attached())
    }

    /// Attached, and to the wall of the selected target.
    fn is_properly_latched(&self) -> bool {
        self.is_attached()
            && self
                .wall_target
                .is_some_and(|wall| Some(wall.structure) == self.selected)
    }

    fn is_cooldown_running<B: Body + ?Sized>(&self, body: &B) -> bool {
        self.attack_limb
            .and_then(|id| body.limb(id))
            .and_then(|limb| limb.attack.as_ref())
            .is_some_and(|attack| attack.is_cooling_down())
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn config(&self) -> &EnemyAiConfig {
        &self.config
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn selected_target(&self) -> Option<EntityId> {
        self.selected
    }

    /// Score of the current target at its last evaluation.
    pub fn target_value(&self) -> f32 {
        self.target_value
    }

    pub fn combat_strength(&self) -> f32 {
        self.config.combat_strength
    }

    pub fn wall_target(&self) -> Option<&WallTarget> {
        self.wall_target.as_ref()
    }

    pub fn attack_limb(&self) -> Option<LimbId> {
        self.attack_limb
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn escape_point(&self) -> Option<Vec2> {
        self.escape_point
    }

    pub fn memory(&self) -> &TargetMemoryStore {
        &self.memory
    }

    pub fn targeting_rule(&self, tag: &str) -> Option<&TargetingRule> {
        self.rules.get(&tag.to_lowercase())
    }

    fn attacks_tag(&self, tag: &str) -> bool {
        self.targeting_rule(tag)
            .is_some_and(|rule| rule.state == BehaviorState::Attack && rule.priority > 0.0)
    }

    pub fn attack_humans(&self) -> bool {
        self.attacks_tag("human")
    }

    pub fn attack_rooms(&self) -> bool {
        self.attacks_tag("room")
    }

    pub fn can_enter_submarine(&self) -> bool {
        !self.is_attached()
    }

    pub fn can_flip(&self) -> bool {
        !self.reversed && !self.is_attached()
    }

    pub fn can_break_doors(&self) -> bool {
        self.can_break_doors
    }
}
