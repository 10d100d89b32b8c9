use crate::{rng, EntityId, SplitMix64};

/// Per-frame context handed to every controller by the external scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32, seed: u64) -> Self {
        Self {
            tick,
            dt_seconds,
            seed,
        }
    }

    /// Delta time with negative and non-finite values flattened to zero.
    pub fn dt(&self) -> f32 {
        if self.dt_seconds.is_finite() {
            self.dt_seconds.max(0.0)
        } else {
            0.0
        }
    }

    /// The context for the following frame with the same step length.
    pub fn next(&self) -> Self {
        Self {
            tick: self.tick + 1,
            ..*self
        }
    }

    pub fn rng_for(&self, entity: EntityId, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed ^ self.tick, entity.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
