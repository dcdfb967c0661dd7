//! Error types
//!
//! Gameplay never fails: hitting a pipe is a phase change, not an error.
//! Only bad configuration and unavailable storage are reported here.

use thiserror::Error;

/// Invalid game configuration, detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be a finite number")]
    NonFinite { field: &'static str },
    #[error("jump impulse must point upward (negative), got {0}")]
    JumpNotUpward(f32),
    #[error("gravity must not be negative, got {0}")]
    NegativeGravity(f32),
    #[error("bonus chance must be within [0, 1], got {0}")]
    BonusChanceOutOfRange(f64),
    #[error("high score storage key must not be empty")]
    EmptyStorageKey,
    #[error("world height {height} is too small for the pipe layout (needs at least {required})")]
    DegenerateSpawnRange { height: f32, required: f32 },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Durable storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value for `{key}` is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
