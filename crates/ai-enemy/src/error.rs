use thiserror::Error;

/// Errors raised while loading an AI definition.
///
/// None of these are fatal for a running simulation: see
/// [`EnemyAiConfig::load_or_default`](crate::EnemyAiConfig::load_or_default).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("definition has no ai variants")]
    NoVariants,
    #[error("invalid targeting rule for tag {tag:?}: {reason}")]
    InvalidRule { tag: String, reason: &'static str },
    #[error("duplicate targeting rule for tag {0:?}")]
    DuplicateRule(String),
    #[error("invalid tuning value for {field}: {value}")]
    InvalidTuning { field: &'static str, value: f32 },
}
