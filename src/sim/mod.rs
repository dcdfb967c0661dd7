//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed increment per tick (no wall-clock time)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, storage or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{circle_hits_box, circles_overlap, out_of_bounds};
pub use state::{Bonus, GameEvent, GamePhase, GameState, Obstacle, Player, Segment, Viewport};
pub use tick::{
    TickInput, advance_world, integrate, resolve_collisions, spawn_obstacles, spawn_pair, tick,
};
