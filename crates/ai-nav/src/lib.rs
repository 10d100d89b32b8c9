//! Navigation contracts consumed by agent AI.
//!
//! Pathfinding graph construction lives outside this crate; here we only describe what a path
//! result looks like, how it is requested, and how an agent expresses movement intent.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod navigator;
pub mod path;
pub mod steering;

pub use ai_core::Vec2;
pub use navigator::{Navigator, OpenWater};
pub use path::{NavPath, PathNode};
pub use steering::{Steering, SteeringAccumulator, SteeringCommand};
