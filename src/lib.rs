//! Flappy Gold - fly through the pipes, grab the gold
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, pipe generation, collisions, scoring)
//! - `session`: Game lifecycle and UI actions around the simulation
//! - `highscores`: Persisted best score with graceful degradation
//! - `persistence`: Key-value storage backends (LocalStorage / file / memory)
//! - `config`: Data-driven game tuning
//! - `renderer`: WebGPU rendering pipeline

pub mod config;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, StorageError};
pub use highscores::HighScore;
pub use session::{Hud, Session};

/// Default tuning constants (per-frame units: pixels, pixels/frame, pixels/frame²)
pub mod consts {
    /// Player physics
    pub const GRAVITY: f32 = 0.20;
    pub const JUMP_IMPULSE: f32 = -5.0;
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_X: f32 = 50.0;

    /// Pipe layout
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_SPACING: f32 = 250.0;
    pub const PIPE_SPEED: f32 = 2.0;
    pub const MIN_PIPE_HEIGHT: f32 = 50.0;

    /// Bonus gold
    pub const BONUS_SPEED: f32 = 2.0;
    pub const BONUS_RADIUS: f32 = 10.0;
    pub const BONUS_OFFSET: f32 = 25.0;
    pub const BONUS_CHANCE: f64 = 0.3;

    /// Score awarded per pipe pair passed
    pub const PASS_POINTS: u64 = 1;
    /// Score awarded per gold collected
    pub const BONUS_POINTS: u64 = 5;

    /// Storage key of the persisted high score
    pub const HIGH_SCORE_KEY: &str = "flappyHighScore";
}
