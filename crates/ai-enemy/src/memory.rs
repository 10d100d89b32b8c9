//! Per-target memory: how much an agent currently wants a target.
//!
//! Memories are created the first time a target is scored, reinforced by damage dealt and
//! taken, and fade every tick until they hit the floor and are forgotten.

use std::collections::BTreeMap;

use ai_core::EntityId;

use crate::MemoryConfig;

pub const MIN_PRIORITY: f32 = 1.0;
pub const MAX_PRIORITY: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetMemory {
    priority: f32,
}

impl TargetMemory {
    pub fn new(priority: f32) -> Self {
        let mut memory = Self {
            priority: MIN_PRIORITY,
        };
        memory.set_priority(priority);
        memory
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    /// Clamped to `[MIN_PRIORITY, MAX_PRIORITY]`; NaN is ignored.
    pub fn set_priority(&mut self, priority: f32) {
        if priority.is_nan() {
            return;
        }
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
    }

    pub fn add(&mut self, delta: f32) {
        self.set_priority(self.priority + delta);
    }

    pub fn is_forgotten(&self) -> bool {
        self.priority <= MIN_PRIORITY
    }
}

#[derive(Debug, Clone)]
pub struct TargetMemoryStore {
    entries: BTreeMap<EntityId, TargetMemory>,
    seed_priority: f32,
    fade_rate: f32,
}

impl Default for TargetMemoryStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl TargetMemoryStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            seed_priority: config.seed_priority,
            fade_rate: config.fade_rate,
        }
    }

    /// Existing memory of `target`, or a fresh one at the seed priority.
    pub fn get_or_create(&mut self, target: EntityId) -> &mut TargetMemory {
        let seed = self.seed_priority;
        self.entries
            .entry(target)
            .or_insert_with(|| TargetMemory::new(seed))
    }

    pub fn contains(&self, target: EntityId) -> bool {
        self.entries.contains_key(&target)
    }

    pub fn get(&self, target: EntityId) -> Option<&TargetMemory> {
        self.entries.get(&target)
    }

    pub fn get_mut(&mut self, target: EntityId) -> Option<&mut TargetMemory> {
        self.entries.get_mut(&target)
    }

    pub fn priority(&self, target: EntityId) -> Option<f32> {
        self.get(target).map(TargetMemory::priority)
    }

    pub fn remove(&mut self, target: EntityId) -> Option<TargetMemory> {
        self.entries.remove(&target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &TargetMemory)> + '_ {
        self.entries.iter().map(|(id, memory)| (*id, memory))
    }

    /// Fades every memory by `fade_rate * dt` and forgets those at the floor or whose target
    /// is gone.
    pub fn age(&mut self, dt: f32, exists: impl Fn(EntityId) -> bool) {
        let fade = self.fade_rate * dt.max(0.0);
        self.entries.retain(|id, memory| {
            memory.add(-fade);
            !memory.is_forgotten() && exists(*id)
        });
    }
}
