//! Deterministic, engine-agnostic primitives for tick-driven agent AI.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod math;
pub mod rng;
pub mod tick;
pub mod timer;

pub use agent::EntityId;
pub use math::Vec2;
pub use rng::{DeterministicRng, SplitMix64};
pub use tick::TickContext;
pub use timer::Countdown;
