use ai_core::{EntityId, Vec2};

/// Optional "latch onto" capability: a body that can hold on to a wall while it chews.
pub trait Attachment {
    fn is_attached(&self) -> bool;
    fn detach(&mut self);
    /// Point and outward normal the body should latch onto next.
    fn set_attach_target(&mut self, structure: EntityId, point: Vec2, normal: Vec2);
}

/// For bodies that cannot latch.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAttachment;

impl Attachment for NoAttachment {
    fn is_attached(&self) -> bool {
        false
    }

    fn detach(&mut self) {}

    fn set_attach_target(&mut self, _structure: EntityId, _point: Vec2, _normal: Vec2) {}
}
