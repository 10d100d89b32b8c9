use core::fmt;

use serde::{Deserialize, Serialize};

/// Top-level behavior of a hostile agent. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorState {
    #[default]
    #[serde(alias = "Idle")]
    Idle,
    #[serde(alias = "Attack")]
    Attack,
    #[serde(alias = "Escape")]
    Escape,
    #[serde(alias = "Eat")]
    Eat,
}

impl BehaviorState {
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorState::Idle => "idle",
            BehaviorState::Attack => "attack",
            BehaviorState::Escape => "escape",
            BehaviorState::Eat => "eat",
        }
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
