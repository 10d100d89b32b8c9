//! Finding the spot in a wall worth chewing through.

use ai_core::math::sign;
use ai_core::{EntityId, Vec2};

use crate::{EnemyWorld, Structure};

/// Sections inspected on either side of the one the ray hit.
pub const SECTION_SCAN_RADIUS: isize = 2;

/// Point on a wall the agent is breaching, with the outward normal to latch along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallTarget {
    pub position: Vec2,
    pub structure: EntityId,
    pub section_index: usize,
    pub normal: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBreachLocator {
    /// Smallest dimension of the agent's collider.
    pub agent_size: f32,
    pub aggressive_boarding: bool,
}

impl WallBreachLocator {
    pub fn new(agent_size: f32, aggressive_boarding: bool) -> Self {
        Self {
            agent_size,
            aggressive_boarding,
        }
    }

    /// Number of contiguous destroyed sections the agent needs to fit through.
    pub fn min_passable_run(&self, section_width: f32) -> usize {
        if section_width <= 0.0 || !self.agent_size.is_finite() {
            return 1;
        }
        ((self.agent_size / section_width).ceil() as usize).max(1)
    }

    /// `true` if section `index` is destroyed and part of a hole wide enough for the agent.
    pub fn is_passable(&self, structure: &Structure, index: usize) -> bool {
        let index = index as isize;
        if !structure.section_disabled(index) {
            return false;
        }
        let required = self.min_passable_run(structure.section_width) as isize;

        let mut run = 1;
        let mut i = index - 1;
        while i > index - required && structure.section_disabled(i) {
            run += 1;
            i -= 1;
        }
        let mut i = index + 1;
        while i < index + required && structure.section_disabled(i) {
            run += 1;
            i += 1;
        }
        run >= required
    }

    /// Wall target between `agent` and `target`, if a submarine wall blocks the way.
    pub fn locate<W: EnemyWorld + ?Sized>(
        &self,
        world: &W,
        agent: Vec2,
        target: Vec2,
    ) -> Option<WallTarget> {
        let hit = world.raycast_structures(agent, target)?;
        if hit.fraction >= 1.0 {
            return None;
        }
        let structure = world.structure(hit.structure?)?;
        structure.submarine?;

        let hit_index = structure.nearest_section(hit.position)?;
        let section_index = self.select_section(structure, hit_index);
        Some(self.wall_target(structure, section_index, agent))
    }

    /// Most damaged section within [`SECTION_SCAN_RADIUS`] of `hit_index`.
    ///
    /// Destroyed sections are skipped, except that an aggressive boarder takes the first
    /// passable hole it sees.
    pub fn select_section(&self, structure: &Structure, hit_index: usize) -> usize {
        let last = structure.sections.len().saturating_sub(1) as isize;
        let center = hit_index as isize;
        let from = (center - SECTION_SCAN_RADIUS).max(0);
        let to = (center + SECTION_SCAN_RADIUS).min(last);

        let mut best = hit_index;
        let mut best_damage = structure.section_damage(center);
        for i in from..=to {
            if structure.section_disabled(i) {
                if self.aggressive_boarding && self.is_passable(structure, i as usize) {
                    return i as usize;
                }
                continue;
            }
            let damage = structure.section_damage(i);
            if damage > best_damage {
                best = i as usize;
                best_damage = damage;
            }
        }
        best
    }

    /// Attach point for section `index`: its center pushed half the wall thickness toward
    /// the agent's side.
    pub fn wall_target(&self, structure: &Structure, index: usize, agent: Vec2) -> WallTarget {
        let mut position = structure.section_position(index);
        let half_thickness = structure.thickness * 0.5;
        let normal = if structure.horizontal {
            Vec2::new(0.0, sign(agent.y - structure.position.y))
        } else {
            Vec2::new(sign(agent.x - structure.position.x), 0.0)
        };
        position += normal * half_thickness;
        WallTarget {
            position,
            structure: structure.id,
            section_index: index,
            normal,
        }
    }
}
