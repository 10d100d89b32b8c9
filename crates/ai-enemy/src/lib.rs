//! Decision core for hostile, tick-driven agents.
//!
//! An [`EnemyAiController`] owns one agent's targeting memory, behavior state, wall target and
//! active attack limb. Everything else (the world registry, the body, steering, latching) is
//! reached through collaborator traits, so the core runs headless in tests and benches.
//!
//! Per tick the controller:
//! - ages its [`TargetMemoryStore`],
//! - periodically re-scores every visible target with the [`TargetEvaluator`],
//! - dispatches the active [`BehaviorState`] (idle, attack, escape, eat),
//! - hands the accumulated movement intent to [`ai_nav::Steering`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod attachment;
pub mod body;
pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod limbs;
pub mod memory;
pub mod state;
pub mod structure;
pub mod target;
pub mod wall;
pub mod world;

pub use attachment::{Attachment, NoAttachment};
pub use body::{
    AfterAttack, Attack, AttackCondition, AttackContext, AttackTarget, Body, HullInfo, Limb,
    LimbId, LimbKind,
};
pub use config::{
    AiVariant, CreatureAiDefinition, EnemyAiConfig, MemoryConfig, TargetingRule, TimingConfig,
};
pub use controller::EnemyAiController;
pub use error::ConfigError;
pub use evaluator::{Classification, Evaluation, TargetEvaluator};
pub use limbs::AttackLimbSelector;
pub use memory::{TargetMemory, TargetMemoryStore};
pub use state::BehaviorState;
pub use structure::{Gap, Structure, WallSection};
pub use target::{
    ControllerKind, CreatureInfo, DoorInfo, ItemInfo, Sector, Target, TargetKind, TargetLimb,
};
pub use wall::{WallBreachLocator, WallTarget};
pub use world::{AttackOutcome, AttackRequest, AttackResult, EnemyWorld, Exit, RayHit};
