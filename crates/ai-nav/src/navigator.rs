use crate::{NavPath, Vec2};

/// Pathfinder contract.
///
/// Implementations own the navigation graph; callers only consume the resulting path. A failed
/// query is expressed as [`NavPath::unreachable`] rather than an error, since "no route" is a
/// normal condition for agents.
pub trait Navigator {
    fn find_path(&self, start: Vec2, goal: Vec2) -> NavPath;

    fn is_reachable(&self, start: Vec2, goal: Vec2) -> bool {
        !self.find_path(start, goal).is_unreachable()
    }
}

/// Navigator for open space: every goal is a straight line away.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWater;

impl Navigator for OpenWater {
    fn find_path(&self, start: Vec2, goal: Vec2) -> NavPath {
        NavPath::from_points([start, goal])
    }
}
