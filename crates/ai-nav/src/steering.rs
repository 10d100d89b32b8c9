//! Steering: how an agent expresses movement intent.
//!
//! Controllers talk to a [`Steering`] implementation; locomotion turns the accumulated steering
//! vector into limb motion elsewhere. The force helpers (seek, wander, avoid) are classic
//! steering behaviors and are shared by [`SteeringAccumulator`], the reference implementation
//! used by tests and headless simulations.

use crate::{NavPath, Vec2};

/// Movement-intent sink for one agent.
///
/// Calls made during a tick accumulate; [`Steering::update`] applies them and starts the
/// next accumulation.
pub trait Steering {
    /// Steer toward `target`. `weight` scales the contribution relative to other behaviors.
    fn seek(&mut self, target: Vec2, weight: f32);

    /// Steer away from obstacles within `look_ahead` units.
    fn avoid(&mut self, dt: f32, look_ahead: f32);

    fn wander(&mut self, weight: f32);

    /// Add a raw steering direction, bypassing pathing.
    fn manual(&mut self, dt: f32, direction: Vec2);

    /// Drop accumulated steering and any cached path.
    fn reset(&mut self);

    /// Switch between open-space and indoor (path-following) steering.
    fn set_indoors(&mut self, _indoors: bool) {}

    /// Path currently followed by indoor steering.
    fn path(&self) -> Option<&NavPath> {
        None
    }

    /// `true` while the current path is stale and about to be recomputed.
    fn is_path_dirty(&self) -> bool {
        false
    }

    /// Apply the accumulated steering at `speed`.
    fn update(&mut self, speed: f32);
}

/// A single steering call, recorded for inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteeringCommand {
    Seek { target: Vec2, weight: f32 },
    Avoid { look_ahead: f32 },
    Wander { weight: f32 },
    Manual { direction: Vec2 },
}

/// Reference [`Steering`] implementation.
///
/// Sums behavior forces into a steering vector, converts it to a velocity on `update`, and
/// keeps the commands of the last completed tick in [`SteeringAccumulator::last_commands`].
#[derive(Debug, Clone)]
pub struct SteeringAccumulator {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Circular obstacles `(center, radius)` considered by `avoid`.
    pub obstacles: Vec<(Vec2, f32)>,
    /// Waypoint arrival radius used while following a path.
    pub arrival_distance: f32,
    pub wander_distance: f32,
    pub wander_radius: f32,
    pub wander_angle: f32,
    pub wander_jitter: f32,
    steering: Vec2,
    seed: u64,
    indoors: bool,
    path: Option<NavPath>,
    path_dirty: bool,
    pending: Vec<SteeringCommand>,
    last: Vec<SteeringCommand>,
}

impl Default for SteeringAccumulator {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            obstacles: Vec::new(),
            arrival_distance: 0.5,
            wander_distance: 2.0,
            wander_radius: 1.0,
            wander_angle: 0.0,
            wander_jitter: 0.3,
            steering: Vec2::ZERO,
            seed: 0,
            indoors: false,
            path: None,
            path_dirty: false,
            pending: Vec::new(),
            last: Vec::new(),
        }
    }
}

impl SteeringAccumulator {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_indoors(&self) -> bool {
        self.indoors
    }

    pub fn set_path(&mut self, path: NavPath) {
        self.path = Some(path);
        self.path_dirty = false;
    }

    pub fn clear_path(&mut self) {
        self.path = None;
    }

    pub fn mark_path_dirty(&mut self) {
        self.path_dirty = true;
    }

    /// Steering vector accumulated so far in the current tick.
    pub fn steering(&self) -> Vec2 {
        self.steering
    }

    /// Commands issued during the last tick that reached `update`.
    pub fn last_commands(&self) -> &[SteeringCommand] {
        &self.last
    }

    /// Commands issued since the last `update`.
    pub fn pending_commands(&self) -> &[SteeringCommand] {
        &self.pending
    }

    /// Move along the current velocity.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt.max(0.0);
        if let Some(path) = self.path.as_mut() {
            path.advance_reached(self.position, self.arrival_distance);
        }
    }
}

impl Steering for SteeringAccumulator {
    fn seek(&mut self, target: Vec2, weight: f32) {
        self.pending.push(SteeringCommand::Seek { target, weight });
        self.steering += seek(self.position, target, weight, Vec2::ZERO);
    }

    fn avoid(&mut self, _dt: f32, look_ahead: f32) {
        self.pending.push(SteeringCommand::Avoid { look_ahead });
        self.steering += avoid(self.position, &self.obstacles, look_ahead);
    }

    fn wander(&mut self, weight: f32) {
        self.pending.push(SteeringCommand::Wander { weight });
        self.seed = self.seed.wrapping_add(1);
        let force = wander(
            self.velocity,
            self.wander_distance,
            self.wander_radius,
            &mut self.wander_angle,
            self.wander_jitter,
            1.0,
            self.seed,
        );
        self.steering += force * weight;
    }

    fn manual(&mut self, _dt: f32, direction: Vec2) {
        self.pending.push(SteeringCommand::Manual { direction });
        if direction.is_finite() {
            self.steering += direction;
        }
    }

    fn reset(&mut self) {
        self.steering = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.pending.clear();
        self.path = None;
        self.path_dirty = false;
    }

    fn set_indoors(&mut self, indoors: bool) {
        self.indoors = indoors;
    }

    fn path(&self) -> Option<&NavPath> {
        if self.indoors {
            self.path.as_ref()
        } else {
            None
        }
    }

    fn is_path_dirty(&self) -> bool {
        self.path_dirty
    }

    fn update(&mut self, speed: f32) {
        self.velocity = truncate(self.steering, 1.0) * speed.max(0.0);
        self.steering = Vec2::ZERO;
        self.last = std::mem::take(&mut self.pending);
    }
}

/// Seek force: full speed toward `target`, minus the current velocity.
pub fn seek(position: Vec2, target: Vec2, max_speed: f32, current_velocity: Vec2) -> Vec2 {
    let desired = (target - position).normalize_or_zero() * max_speed;
    desired - current_velocity
}

/// Wander force with deterministic jitter derived from `seed`.
pub fn wander(
    velocity: Vec2,
    wander_distance: f32,
    wander_radius: f32,
    wander_angle: &mut f32,
    wander_jitter: f32,
    max_speed: f32,
    seed: u64,
) -> Vec2 {
    let jitter = ((seed as f32 * 0.618_034) % 1.0 - 0.5) * 2.0 * wander_jitter;
    *wander_angle += jitter;

    let heading = velocity.normalize_or(Vec2::UNIT_X);
    let circle_center = heading * wander_distance;
    let displacement = Vec2::new(
        wander_angle.cos() * wander_radius,
        wander_angle.sin() * wander_radius,
    );

    (circle_center + displacement).normalize_or_zero() * max_speed - velocity
}

/// Push away from every obstacle whose surface is within `look_ahead`, stronger when closer.
pub fn avoid(position: Vec2, obstacles: &[(Vec2, f32)], look_ahead: f32) -> Vec2 {
    if look_ahead <= 0.0 {
        return Vec2::ZERO;
    }
    let mut force = Vec2::ZERO;
    for &(center, radius) in obstacles {
        let away = position - center;
        let gap = away.length() - radius.max(0.0);
        if gap >= look_ahead {
            continue;
        }
        let strength = 1.0 - (gap.max(0.0) / look_ahead);
        force += away.normalize_or(Vec2::UNIT_Y) * strength;
    }
    force
}

fn truncate(v: Vec2, max_length: f32) -> Vec2 {
    let len = v.length();
    if len > max_length && len > 0.001 {
        v * (max_length / len)
    } else {
        v
    }
}
