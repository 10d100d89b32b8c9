//! The attack state: aiming, breaching, cooldown policies and landing hits.

use ai_core::{EntityId, Vec2};
use ai_nav::Steering;
use ai_tools::TraceEvent;

use super::EnemyAiController;
use crate::{
    AfterAttack, AttackLimbSelector, AttackRequest, AttackTarget, BehaviorState, Body, EnemyWorld,
    Gap, LimbId, LimbKind, Structure, TargetKind,
};

/// Distance falloff of the fallback retreat strength.
const FALLBACK_FALLOFF: f32 = 500.0;
/// Seek weight toward the aim point.
const ATTACK_SEEK_WEIGHT: f32 = 10.0;

/// What indoor path following asks of the attack this tick.
enum PathStep {
    Unreachable,
    Finished,
    Door(EntityId),
    Follow,
}

impl EnemyAiController {
    pub(super) fn update_attack<W, B, S>(
        &mut self,
        dt: f32,
        world: &mut W,
        body: &mut B,
        steering: &mut S,
    ) where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        let Some(mut target_id) = self.selected else {
            self.set_state(BehaviorState::Idle, body);
            return;
        };

        // Attacking a carried item means attacking its carrier.
        let holder = world.target(target_id).and_then(|target| match &target.kind {
            TargetKind::Item(item) => item.holder,
            _ => None,
        });
        if let Some(holder) = holder.filter(|id| world.target(*id).is_some()) {
            tracing::debug!(agent = %self.id, item = %target_id, %holder, "retarget to holder");
            self.assign_target(Some(holder));
            self.memory.get_or_create(holder);
            target_id = holder;
        }

        if self.raycast_timer.tick(dt) {
            if !self.is_properly_latched() {
                self.update_wall_target(&*world, &*body, target_id);
            }
            self.raycast_timer.reset(self.config.timing.raycast_interval);
        }

        let Some(target) = world.target(target_id) else {
            self.set_state(BehaviorState::Idle, body);
            return;
        };
        let position = body.position();

        let mut aim = target.position;
        if let Some(creature) = target.as_creature() {
            let mut closest = target.position.distance_squared(position) * 10.0;
            for limb in &creature.limbs {
                let weighted =
                    limb.position.distance_squared(position) / limb.attack_priority.max(0.1);
                if weighted < closest {
                    closest = weighted;
                    aim = limb.position;
                }
            }
        }
        if let Some(wall) = &self.wall_target {
            aim = wall.position;
        }

        if self.config.aggressive_boarding && self.steer_through_opening(dt, &*world, body, steering)
        {
            return;
        }

        let mut can_attack = true;
        let changed = self.target_changed();
        let cooling = self
            .attack_limb
            .and_then(|id| body.limb(id))
            .and_then(|limb| limb.attack.as_ref().map(|attack| (limb.id, attack)))
            .filter(|(_, attack)| attack.is_cooling_down())
            .map(|(id, attack)| {
                (
                    id,
                    attack.after_attack,
                    attack.secondary_cooldown,
                    attack.secondary_cooldown_timer,
                )
            });

        if let Some((limb_id, policy, secondary, secondary_timer)) = cooling {
            match policy {
                AfterAttack::Pursue | AfterAttack::PursueIfCanAttack => {
                    let pursue = policy == AfterAttack::Pursue;
                    if secondary <= 0.0 {
                        if pursue {
                            can_attack = false;
                        } else {
                            self.update_fallback(dt, &*body, steering, aim);
                            return;
                        }
                    } else if secondary_timer <= 0.0 {
                        if changed {
                            // Never strike right after switching targets mid-cooldown.
                            can_attack = false;
                            if !pursue {
                                self.update_fallback(dt, &*body, steering, aim);
                                return;
                            }
                            self.set_attack_limb(None, body);
                        } else if let Some(next) =
                            self.select_attack_limb(&*world, &*body, aim, Some(limb_id))
                        {
                            self.switch_attack_limb(next, body);
                        } else if pursue {
                            can_attack = false;
                        } else {
                            self.update_fallback(dt, &*body, steering, aim);
                            return;
                        }
                    } else {
                        can_attack = false;
                    }
                }
                AfterAttack::FallBackUntilCanAttack => {
                    if secondary <= 0.0 || secondary_timer > 0.0 || changed {
                        self.update_fallback(dt, &*body, steering, aim);
                        return;
                    }
                    match self.select_attack_limb(&*world, &*body, aim, Some(limb_id)) {
                        Some(next) => self.switch_attack_limb(next, body),
                        None => {
                            self.update_fallback(dt, &*body, steering, aim);
                            return;
                        }
                    }
                }
                AfterAttack::FallBack => {
                    self.update_fallback(dt, &*body, steering, aim);
                    return;
                }
            }
        }

        if self.attack_limb.is_none() || self.previous != self.selected {
            let limb = self.select_attack_limb(&*world, &*body, aim, None);
            if limb != self.attack_limb {
                tracing::debug!(agent = %self.id, limb = ?limb, "attack limb selected");
            }
            self.set_attack_limb(limb, body);
        }

        let mut distance = 0.0;
        let attack_limb = self
            .attack_limb
            .and_then(|id| body.limb(id))
            .and_then(|limb| limb.attack.as_ref().map(|attack| (limb, attack)));
        if can_attack {
            can_attack = match attack_limb {
                Some((limb, attack)) if !attack.is_cooling_down() => {
                    distance = limb.position.distance(aim);
                    distance < attack.range
                }
                _ => false,
            };
        }

        let head = body.limb_of_kind(LimbKind::Head).map(|l| l.position);
        let torso = body.limb_of_kind(LimbKind::Torso).map(|l| l.position);
        let steering_limb = match (attack_limb, head, torso) {
            (Some((limb, _)), Some(head), Some(torso)) => {
                if limb.position.distance_squared(head) < limb.position.distance_squared(torso) {
                    Some(head)
                } else {
                    Some(torso)
                }
            }
            _ => head.or(torso),
        };

        if let Some(reference) = steering_limb {
            steering.seek(aim + (position - reference), ATTACK_SEEK_WEIGHT);

            if self.indoors {
                let step = if steering.is_path_dirty() {
                    None
                } else {
                    steering.path().map(|path| {
                        if path.is_unreachable() {
                            PathStep::Unreachable
                        } else if path.is_finished() {
                            PathStep::Finished
                        } else if let Some(door) = path
                            .current_node()
                            .and_then(|node| node.door)
                            .or_else(|| path.next_node().and_then(|node| node.door))
                        {
                            PathStep::Door(door)
                        } else {
                            PathStep::Follow
                        }
                    })
                };
                match step {
                    Some(PathStep::Unreachable) => {
                        // A forgotten target stays forgotten.
                        let penalty = dt * self.config.memory.fade_rate * 10.0;
                        if let Some(memory) = self.memory.get_mut(target_id) {
                            memory.add(-penalty);
                        }
                        steering.wander(1.0);
                    }
                    Some(PathStep::Finished) => {
                        steering.manual(dt, (aim - reference).normalize_or(Vec2::UNIT_Y));
                    }
                    Some(PathStep::Door(door)) => {
                        tracing::debug!(agent = %self.id, %door, "door blocks the path");
                        self.wall_target = None;
                        self.assign_target(Some(door));
                        self.memory.get_or_create(door);
                    }
                    Some(PathStep::Follow) | None => {}
                }
            } else if body.hull().is_none() {
                steering.avoid(dt, self.collider_size * 1.5);
            }
        }

        if can_attack {
            if let Some(limb) = self.attack_limb {
                self.perform_attack(world, body, limb, aim, distance);
            }
        }
    }

    /// Refreshes the wall between the agent and `target`, handing the attach point to the
    /// attachment.
    fn update_wall_target<W, B>(&mut self, world: &W, body: &B, target: EntityId)
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
    {
        self.wall_target = None;
        let Some(target) = world.target(target) else {
            return;
        };
        let Some(wall) = self.locator.locate(world, body.position(), target.position) else {
            return;
        };
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.set_attach_target(wall.structure, wall.position, wall.normal);
        }
        tracing::debug!(
            agent = %self.id,
            structure = %wall.structure,
            section = wall.section_index,
            "wall target"
        );
        self.trace.emit(
            TraceEvent::new(self.tick, self.id.stable_id(), "wall")
                .with_subject(wall.structure.stable_id())
                .with_value(wall.section_index as f32),
        );
        self.wall_target = Some(wall);
    }

    fn select_attack_limb<W, B>(
        &self,
        world: &W,
        body: &B,
        aim: Vec2,
        ignored: Option<LimbId>,
    ) -> Option<LimbId>
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
    {
        let target = self.selected.and_then(|id| world.target(id));
        let target_type = if self.wall_target.is_some() {
            AttackTarget::Structure
        } else {
            target.map_or(AttackTarget::Structure, |t| t.attack_target())
        };
        let mut selector =
            AttackLimbSelector::new(aim, body.attack_context(), target_type).ignoring(ignored);
        if self.wall_target.is_none() {
            if let Some(target) = target {
                selector = selector.against_creature(target);
            }
        }
        selector.select(body.limbs())
    }

    fn switch_attack_limb<B: Body + ?Sized>(&mut self, limb: LimbId, body: &mut B) {
        tracing::debug!(agent = %self.id, from = ?self.attack_limb, to = ?limb, "attack limb switched");
        self.trace.emit(
            TraceEvent::new(self.tick, self.id.stable_id(), "limb").with_value(limb.0 as f32),
        );
        self.set_attack_limb(Some(limb), body);
    }

    /// Backs off from `aim` when too close, always avoiding obstacles.
    fn update_fallback<B, S>(&self, dt: f32, body: &B, steering: &mut S, aim: Vec2)
    where
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        let to_aim = aim - body.position();
        let dist = to_aim.length();
        if dist < self.collider_size * 2.0 {
            let away = (-to_aim).normalize_or(Vec2::UNIT_Y);
            steering.manual(dt, away * (1.0 - dist / FALLBACK_FALLOFF));
        }
        steering.avoid(dt, self.collider_size * 3.0);
    }

    /// Steers through a passable hole or an open outer door; `true` if it took over steering.
    fn steer_through_opening<W, B, S>(
        &mut self,
        dt: f32,
        world: &W,
        body: &mut B,
        steering: &mut S,
    ) -> bool
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        if let Some(wall) = self.wall_target {
            if let Some(structure) = world.structure(wall.structure) {
                if self.locator.is_passable(structure, wall.section_index) {
                    let gap = structure
                        .sections
                        .get(wall.section_index)
                        .and_then(|section| section.gap);
                    let through = structure.section_position(wall.section_index);
                    return gap.is_some_and(|gap| {
                        self.steer_through_gap(dt, body, steering, structure, gap, through)
                    });
                }
            }
        }

        let Some(target) = self.selected.and_then(|id| world.target(id)) else {
            return false;
        };
        match &target.kind {
            TargetKind::Structure => {
                let Some(structure) = world.structure(target.id) else {
                    return false;
                };
                for (i, section) in structure.sections.iter().enumerate() {
                    let Some(gap) = section.gap else {
                        continue;
                    };
                    if self.locator.is_passable(structure, i)
                        && self.steer_through_gap(dt, body, steering, structure, gap, gap.position)
                    {
                        return true;
                    }
                }
                false
            }
            TargetKind::Door(door) => {
                if !door.outdoor || !(door.open || target.is_destroyed()) {
                    return false;
                }
                let Some(inside) = door.flow_target else {
                    return false;
                };
                let position = body.position();
                let mut velocity = (inside - position).normalize_or(Vec2::UNIT_Y);
                let aligned = if door.horizontal {
                    let aligned = (position.y - target.position.y).abs() < door.span;
                    velocity.y = 0.0;
                    aligned
                } else {
                    let aligned = (position.x - target.position.x).abs() < door.span;
                    velocity.x = 0.0;
                    aligned
                };
                if !aligned {
                    return false;
                }
                self.detach();
                body.release_stuck_limbs();
                steering.manual(dt, velocity);
                true
            }
            _ => false,
        }
    }

    fn steer_through_gap<B, S>(
        &mut self,
        dt: f32,
        body: &mut B,
        steering: &mut S,
        structure: &Structure,
        gap: Gap,
        mut through: Vec2,
    ) -> bool
    where
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        let Some(inside) = gap.flow_target else {
            return false;
        };
        if structure.horizontal {
            through.y = inside.y;
        } else {
            through.x = inside.x;
        }
        self.detach();
        body.release_stuck_limbs();
        if self.indoors {
            steering.manual(dt, (through - body.position()).normalize_or(Vec2::UNIT_Y));
        } else {
            steering.seek(through, 1.0);
        }
        true
    }

    /// Lands an attack through the world and reinforces memory with the outcome.
    fn perform_attack<W, B>(&mut self, world: &mut W, body: &mut B, limb: LimbId, aim: Vec2, distance: f32)
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
    {
        if let Some(wall) = self.wall_target {
            if self.selected != Some(wall.structure) && world.target(wall.structure).is_some() {
                self.select_target(wall.structure);
            }
        }
        let Some(target_id) = self.selected else {
            return;
        };
        if world.target(target_id).and_then(|t| t.health).is_none() {
            return;
        }
        let Some(attack) = body.limb(limb).and_then(|l| l.attack.as_ref()) else {
            return;
        };
        let request = AttackRequest {
            attacker: self.id,
            limb,
            target: target_id,
            aim,
            distance,
            damage: attack.damage,
            structure_damage: attack.structure_damage,
        };

        let Some(outcome) = world.apply_attack(&request) else {
            return;
        };
        if let Some(attack) = body.limb_mut(limb).and_then(|l| l.attack.as_mut()) {
            attack.start_cooldown();
        }

        let memory = self.memory.get_or_create(target_id);
        if outcome.target_health > 0.0 {
            let relative = outcome.result.damage / outcome.target_health.max(1.0);
            memory.add(relative * self.config.aggression_greed);
        } else {
            memory.set_priority(0.0);
        }

        tracing::debug!(
            agent = %self.id,
            target = %target_id,
            damage = outcome.result.damage,
            health = outcome.target_health,
            "attack landed"
        );
        self.trace.emit(
            TraceEvent::new(self.tick, self.id.stable_id(), "attack")
                .with_subject(target_id.stable_id())
                .with_value(outcome.result.damage),
        );
    }
}
