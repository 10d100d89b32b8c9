use ai_core::{EntityId, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A waypoint of an indoor path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathNode {
    pub position: Vec2,
    /// Door that has to be passed to reach this node, if any.
    pub door: Option<EntityId>,
}

impl PathNode {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            door: None,
        }
    }

    pub fn through_door(position: Vec2, door: EntityId) -> Self {
        Self {
            position,
            door: Some(door),
        }
    }
}

/// Path result with a follow cursor.
///
/// An unreachable path has no nodes. A reachable path is finished once its cursor moved past
/// the final node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavPath {
    nodes: Vec<PathNode>,
    current: usize,
    unreachable: bool,
}

impl NavPath {
    pub fn new(nodes: Vec<PathNode>) -> Self {
        Self {
            nodes,
            current: 0,
            unreachable: false,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self::new(points.into_iter().map(PathNode::new).collect())
    }

    pub fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            current: 0,
            unreachable: true,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.unreachable
    }

    pub fn is_finished(&self) -> bool {
        !self.unreachable && self.current >= self.nodes.len()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_node(&self) -> Option<&PathNode> {
        self.nodes.get(self.current)
    }

    pub fn next_node(&self) -> Option<&PathNode> {
        self.nodes.get(self.current + 1)
    }

    pub fn advance(&mut self) {
        if self.current < self.nodes.len() {
            self.current += 1;
        }
    }

    /// Advances past every node within `arrival_distance` of `position`, in order.
    pub fn advance_reached(&mut self, position: Vec2, arrival_distance: f32) {
        let arrival2 = arrival_distance * arrival_distance;
        while let Some(node) = self.current_node() {
            if node.position.distance_squared(position) > arrival2 {
                break;
            }
            self.current += 1;
        }
    }

    /// Total length from the first node to the last.
    pub fn length(&self) -> f32 {
        self.nodes
            .windows(2)
            .map(|w| w[0].position.distance(w[1].position))
            .sum()
    }
}
