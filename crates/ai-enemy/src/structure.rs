use ai_core::{EntityId, Vec2};

/// Opening in a wall section that water (and agents) can flow through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub position: Vec2,
    /// `0` closed, `1` fully open.
    pub open: f32,
    /// Connects two compartments rather than a compartment and open water.
    pub room_to_room: bool,
    /// Center of the compartment the gap leads into.
    pub flow_target: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WallSection {
    pub damage: f32,
    /// The section's body is destroyed.
    pub body_disabled: bool,
    pub gap: Option<Gap>,
}

/// A wall made of equal-width sections laid along its axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub id: EntityId,
    /// Center of the wall.
    pub position: Vec2,
    /// Sections run along x; otherwise along y.
    pub horizontal: bool,
    pub section_width: f32,
    pub thickness: f32,
    pub submarine: Option<EntityId>,
    pub has_body: bool,
    pub sections: Vec<WallSection>,
}

impl Structure {
    pub fn new(
        id: EntityId,
        position: Vec2,
        horizontal: bool,
        section_count: usize,
        section_width: f32,
    ) -> Self {
        Self {
            id,
            position,
            horizontal,
            section_width,
            thickness: 0.0,
            submarine: None,
            has_body: true,
            sections: vec![WallSection::default(); section_count],
        }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn in_submarine(mut self, submarine: EntityId) -> Self {
        self.submarine = Some(submarine);
        self
    }

    pub fn length(&self) -> f32 {
        self.sections.len() as f32 * self.section_width
    }

    fn axis(&self) -> Vec2 {
        if self.horizontal {
            Vec2::UNIT_X
        } else {
            Vec2::UNIT_Y
        }
    }

    fn start(&self) -> Vec2 {
        self.position - self.axis() * (self.length() * 0.5)
    }

    pub fn section(&self, index: isize) -> Option<&WallSection> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.sections.get(index))
    }

    /// Out-of-range indices count as intact.
    pub fn section_disabled(&self, index: isize) -> bool {
        self.section(index).is_some_and(|s| s.body_disabled)
    }

    pub fn section_damage(&self, index: isize) -> f32 {
        self.section(index).map_or(0.0, |s| s.damage)
    }

    /// Center of section `index` on the wall's axis.
    pub fn section_position(&self, index: usize) -> Vec2 {
        self.start() + self.axis() * ((index as f32 + 0.5) * self.section_width)
    }

    /// Section closest to `point`, or `None` for a wall without sections.
    pub fn nearest_section(&self, point: Vec2) -> Option<usize> {
        let last = self.sections.len().checked_sub(1)?;
        if self.section_width <= 0.0 {
            return Some(0);
        }
        let along = (point - self.start()).dot(self.axis()) / self.section_width;
        Some((along.floor().max(0.0) as usize).min(last))
    }
}
