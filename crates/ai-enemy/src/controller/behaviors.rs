use ai_core::Vec2;
use ai_nav::Steering;
use ai_tools::TraceEvent;

use super::EnemyAiController;
use crate::{BehaviorState, Body, EnemyWorld};

/// Capture radius of the mouth while eating.
const EAT_DISTANCE: f32 = 2.0;
const EAT_FORCE: f32 = 50.0;

impl EnemyAiController {
    pub(super) fn update_idle<W, B, S>(&mut self, dt: f32, world: &W, body: &B, steering: &mut S)
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        if body.submarine().is_none() && body.position().y < body.crush_depth() * 0.75 {
            steering.manual(dt, Vec2::UNIT_Y);
            return;
        }

        if self.wall_target.is_some() {
            return;
        }

        match self.selected.and_then(|id| world.target(id)) {
            Some(target) => {
                steering.avoid(dt, self.collider_size * 3.0);
                steering.seek(target.position, 1.0);
            }
            None => {
                if body.submarine().is_none() {
                    steering.avoid(dt, self.collider_size * 5.0);
                }
                steering.wander(0.5);
            }
        }
    }

    pub(super) fn update_escape<W, B, S>(
        &mut self,
        dt: f32,
        world: &W,
        body: &mut B,
        steering: &mut S,
    ) where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        let Some(threat) = self.selected.and_then(|id| world.target(id)) else {
            self.set_state(BehaviorState::Idle, body);
            return;
        };
        self.memory
            .get_or_create(threat.id)
            .add(dt * self.config.memory.fear_increase);

        let position = body.position();
        if body.hull().is_some() && self.indoors && self.escape_point.is_none() {
            let submarine = body.submarine();
            let navigator = world.navigator();
            for exit in world.exits() {
                if exit.submarine != submarine || exit.open < 1.0 || exit.room_to_room {
                    continue;
                }
                if navigator.find_path(position, exit.position).is_unreachable() {
                    continue;
                }
                if let Some(current) = self.escape_point {
                    if position.distance_squared(exit.position) > position.distance_squared(current)
                    {
                        continue;
                    }
                }
                self.escape_point = Some(exit.position);
            }
            if let Some(exit) = self.escape_point {
                tracing::debug!(agent = %self.id, x = exit.x, y = exit.y, "escape exit chosen");
            }
        }

        match self.escape_point {
            Some(exit) if position.distance_squared(exit) > 1.0 => steering.seek(exit, 1.0),
            _ => {
                self.escape_point = None;
                let away = (position - threat.position).normalize_or(Vec2::UNIT_Y);
                steering.manual(dt, away);
                steering.wander(1.0);
                steering.avoid(dt, self.collider_size * 3.0);
            }
        }
    }

    pub(super) fn update_eat<W, B, S>(&mut self, dt: f32, world: &W, body: &mut B, steering: &mut S)
    where
        W: EnemyWorld + ?Sized,
        B: Body + ?Sized,
        S: Steering + ?Sized,
    {
        let Some(target) = self.selected.and_then(|id| world.target(id)) else {
            self.set_state(BehaviorState::Idle, body);
            return;
        };
        let Some((mouth, mass)) = body
            .mouth_limb()
            .map(|limb| (limb.mouth.unwrap_or(limb.position), limb.mass))
        else {
            tracing::warn!(agent = %self.id, "cannot eat without a mouth or a head");
            self.set_state(BehaviorState::Idle, body);
            return;
        };

        let diff = target.position - mouth;
        if diff.length() < EAT_DISTANCE {
            body.grab(target.id);
            steering.manual(dt, diff.normalize_or(Vec2::UNIT_Y));
            body.apply_force(diff * mass * EAT_FORCE, mouth);
            self.trace.emit(
                TraceEvent::new(self.tick, self.id.stable_id(), "eat")
                    .with_subject(target.id.stable_id()),
            );
        } else {
            steering.seek(target.position - (mouth - body.position()), 1.0);
        }
    }
}
