//! Game tuning configuration
//!
//! Every gameplay constant lives here so a host can override it from JSON
//! (LocalStorage on web, a file on native). Defaults come from `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::persistence::KeyValueStore;

/// Tuning values for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Player ===
    /// Downward acceleration added to velocity each tick
    pub gravity: f32,
    /// Velocity set by a jump (negative = up)
    pub jump_impulse: f32,
    pub player_radius: f32,
    /// Fixed horizontal position of the player
    pub player_x: f32,

    // === Pipes ===
    /// Vertical clearance between the top and bottom segment
    pub pipe_gap: f32,
    pub pipe_width: f32,
    /// Horizontal distance travelled before the next pair spawns
    pub pipe_spacing: f32,
    /// Leftward pipe movement per tick
    pub pipe_speed: f32,
    /// Smallest height either segment of a pair may have
    pub min_pipe_height: f32,

    // === Bonus gold ===
    /// Leftward bonus movement per tick (tuned independently of pipes)
    pub bonus_speed: f32,
    pub bonus_radius: f32,
    /// Horizontal offset of a bonus from its pair's spawn x
    pub bonus_offset: f32,
    /// Probability a pair carries a bonus
    pub bonus_chance: f64,

    // === Persistence / RNG ===
    /// Storage key of the persisted high score
    pub high_score_key: String,
    /// Fixed RNG seed (random per session when absent)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            player_radius: PLAYER_RADIUS,
            player_x: PLAYER_X,

            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            pipe_spacing: PIPE_SPACING,
            pipe_speed: PIPE_SPEED,
            min_pipe_height: MIN_PIPE_HEIGHT,

            bonus_speed: BONUS_SPEED,
            bonus_radius: BONUS_RADIUS,
            bonus_offset: BONUS_OFFSET,
            bonus_chance: BONUS_CHANCE,

            high_score_key: HIGH_SCORE_KEY.to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Storage key for a config override
    pub const STORAGE_KEY: &'static str = "flappy_config";

    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an override from storage, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config override from storage");
                    return config;
                }
                Err(e) => log::warn!("Ignoring stored config: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Config storage unavailable: {}", e),
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("player_radius", self.player_radius),
            ("player_x", self.player_x),
            ("pipe_gap", self.pipe_gap),
            ("pipe_width", self.pipe_width),
            ("pipe_spacing", self.pipe_spacing),
            ("pipe_speed", self.pipe_speed),
            ("min_pipe_height", self.min_pipe_height),
            ("bonus_speed", self.bonus_speed),
            ("bonus_radius", self.bonus_radius),
        ];
        for (field, value) in positive {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !self.gravity.is_finite() {
            return Err(ConfigError::NonFinite { field: "gravity" });
        }
        if self.gravity < 0.0 {
            return Err(ConfigError::NegativeGravity(self.gravity));
        }
        if !self.jump_impulse.is_finite() {
            return Err(ConfigError::NonFinite { field: "jump_impulse" });
        }
        if self.jump_impulse >= 0.0 {
            return Err(ConfigError::JumpNotUpward(self.jump_impulse));
        }
        if !self.bonus_offset.is_finite() {
            return Err(ConfigError::NonFinite { field: "bonus_offset" });
        }
        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(ConfigError::BonusChanceOutOfRange(self.bonus_chance));
        }
        if self.high_score_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(())
    }

    /// Smallest world height with a non-empty gap placement range
    pub fn min_world_height(&self) -> f32 {
        self.pipe_gap + 2.0 * self.min_pipe_height
    }

    /// Check a world height against the pipe layout
    pub fn check_viewport(&self, height: f32) -> Result<(), ConfigError> {
        let required = self.min_world_height();
        if height < required {
            return Err(ConfigError::DegenerateSpawnRange { height, required });
        }
        Ok(())
    }
}
