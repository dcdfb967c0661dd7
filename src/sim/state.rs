//! Game state and core simulation types
//!
//! Everything the per-frame stages read or mutate lives in `GameState`;
//! there is no ambient global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Lifecycle phase of one play-through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing started yet, menu showing
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Run ended by a collision or leaving the screen
    Ended,
}

/// Current size of the drawing surface, in world units (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Center position (x stays fixed)
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub velocity: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub radius: f32,
}

impl Player {
    /// Player at rest, vertically centered in a world of the given height
    pub fn new(config: &GameConfig, world_height: f32) -> Self {
        Self {
            pos: Vec2::new(config.player_x, world_height / 2.0),
            velocity: 0.0,
            gravity: config.gravity,
            jump_impulse: config.jump_impulse,
            radius: config.player_radius,
        }
    }

    /// One tick of constant-gravity integration
    #[inline]
    pub fn integrate(&mut self) {
        self.velocity += self.gravity;
        self.pos.y += self.velocity;
    }

    /// Override velocity with the jump impulse
    #[inline]
    pub fn jump(&mut self) {
        self.velocity = self.jump_impulse;
    }
}

/// Which half of a pipe pair an obstacle is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Hangs from y = 0 down to the gap
    Top,
    /// Stands from the end of the gap to the bottom edge
    Bottom,
}

/// One pipe segment (axis-aligned box, `pos` is its top-left corner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub segment: Segment,
    /// Set once the player is fully past it (scores at most once)
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32, segment: Segment) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
            segment,
            passed: false,
        }
    }

    /// X coordinate of the right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Only the top segment scores, so a pair counts once
    #[inline]
    pub fn is_top(&self) -> bool {
        self.segment == Segment::Top
    }
}

/// A collectible gold coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

impl Bonus {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            collected: false,
        }
    }
}

/// Things that happened during a tick, for the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A coin was picked up
    BonusCollected { score: u64, currency: u64 },
    /// A pipe pair was passed
    ObstaclePassed { score: u64 },
    /// The best score improved
    NewHighScore(u64),
    /// The run ended this tick
    GameOver,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tuning values (validated before a state is built)
    pub config: GameConfig,
    /// Surface size, re-read by every stage each tick
    pub viewport: Viewport,
    /// Current phase
    pub phase: GamePhase,
    pub player: Player,
    /// Pipe segments in spawn order, top before bottom within a pair
    pub obstacles: Vec<Obstacle>,
    /// Coins in spawn order
    pub bonuses: Vec<Bonus>,
    /// Score of the current run
    pub score: u64,
    /// Gold collected (kept across restarts)
    pub currency: u64,
    /// Best score known to the simulation
    pub high_score: u64,
    /// Current x of the most recent spawn (moves left with the pipes)
    pub last_spawn_x: f32,
    /// Pipe pairs spawned this run
    pub pairs_spawned: u64,
    /// Simulation tick counter for this run
    pub time_ticks: u64,
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(config: GameConfig, viewport: Viewport, seed: u64) -> Self {
        let player = Player::new(&config, viewport.height);
        Self {
            config,
            viewport,
            phase: GamePhase::Idle,
            player,
            obstacles: Vec::new(),
            bonuses: Vec::new(),
            score: 0,
            currency: 0,
            high_score: 0,
            last_spawn_x: 0.0,
            pairs_spawned: 0,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Clear the run: player recentered, no entities, score and spawn tracker zeroed
    ///
    /// Currency and the high score are kept. The phase is left to the caller.
    pub fn reset(&mut self) {
        self.player = Player::new(&self.config, self.viewport.height);
        self.obstacles.clear();
        self.bonuses.clear();
        self.score = 0;
        self.last_spawn_x = 0.0;
        self.pairs_spawned = 0;
        self.time_ticks = 0;
    }

    /// RNG used for pipe heights and coin rolls
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}
