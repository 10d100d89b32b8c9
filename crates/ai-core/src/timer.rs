/// Countdown used for fixed-interval work (re-evaluation, raycasts).
///
/// The timer fires on the first tick it is observed at or below zero; the caller then
/// re-arms it with [`Countdown::reset`]. This mirrors "if the timer is running, decrement it,
/// otherwise do the work" loops without accumulating drift.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// A countdown that fires on the next tick.
    pub fn ready() -> Self {
        Self { remaining: 0.0 }
    }

    pub fn new(remaining: f32) -> Self {
        Self { remaining }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Returns `true` when the countdown has expired; otherwise consumes `dt`.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining > 0.0 {
            self.remaining -= dt;
            false
        } else {
            true
        }
    }

    pub fn reset(&mut self, interval: f32) {
        self.remaining = interval;
    }

    /// Shortens the countdown so it fires within `max_remaining` seconds.
    pub fn expire_within(&mut self, max_remaining: f32) {
        self.remaining = self.remaining.min(max_remaining);
    }
}
