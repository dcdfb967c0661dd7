//! Per-frame simulation tick
//!
//! One tick runs four stages in a fixed order:
//! 1. `integrate`: gravity on the player
//! 2. `spawn_obstacles`: new pipe pair (and maybe a coin) when due
//! 3. `advance_world`: scroll pipes and coins left, prune what left the screen
//! 4. `resolve_collisions`: boundary, pipes, coins, then pass scoring
//!
//! Collisions are always evaluated against already-moved positions.

use glam::Vec2;
use rand::Rng;

use super::autopilot;
use super::collision::{circle_hits_box, circles_overlap, out_of_bounds};
use super::state::{Bonus, GameEvent, GamePhase, GameState, Obstacle, Segment};
use crate::consts::{BONUS_POINTS, PASS_POINTS};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Let the autopilot decide whether to jump
    pub autopilot: bool,
}

/// Advance the game state by one frame
///
/// Does nothing unless the game is running. Returns the events raised by
/// collisions and scoring.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    if state.phase != GamePhase::Running {
        return Vec::new();
    }

    if input.autopilot && autopilot::wants_jump(state) {
        state.player.jump();
    }

    state.time_ticks += 1;

    integrate(state);
    spawn_obstacles(state);
    advance_world(state);
    resolve_collisions(state)
}

/// Apply one tick of gravity to the player
pub fn integrate(state: &mut GameState) {
    state.player.integrate();
}

/// Spawn a pipe pair when the last one has scrolled far enough, or none exist
///
/// Returns true if a pair was spawned.
pub fn spawn_obstacles(state: &mut GameState) -> bool {
    let travelled = state.viewport.width - state.last_spawn_x;
    if travelled > state.config.pipe_spacing || state.obstacles.is_empty() {
        spawn_pair(state);
        true
    } else {
        false
    }
}

/// Spawn one pipe pair at the right edge, with a coin in the gap 30% of the time
pub fn spawn_pair(state: &mut GameState) {
    let world = state.viewport;
    let gap = state.config.pipe_gap;
    let width = state.config.pipe_width;
    let min_height = state.config.min_pipe_height;
    let bonus_chance = state.config.bonus_chance;

    let mut max_height = world.height - gap - min_height;
    if max_height < min_height {
        log::warn!(
            "World height {} too small for gap {} + 2x{}; clamping pipe height",
            world.height,
            gap,
            min_height
        );
        max_height = min_height;
    }

    let rng = state.rng_mut();
    let top_height = min_height + rng.random::<f32>() * (max_height - min_height);
    let has_bonus = rng.random::<f64>() < bonus_chance;

    let x = world.width;
    let bottom_y = top_height + gap;
    state
        .obstacles
        .push(Obstacle::new(x, 0.0, width, top_height, Segment::Top));
    state.obstacles.push(Obstacle::new(
        x,
        bottom_y,
        width,
        (world.height - bottom_y).max(0.0),
        Segment::Bottom,
    ));

    if has_bonus {
        let pos = Vec2::new(x + state.config.bonus_offset, top_height + gap / 2.0);
        state
            .bonuses
            .push(Bonus::new(pos, state.config.bonus_radius));
    }

    state.last_spawn_x = x;
    state.pairs_spawned += 1;
    log::debug!(
        "Spawned pair #{} at x={} (gap top {:.1}, bonus: {})",
        state.pairs_spawned,
        x,
        top_height,
        has_bonus
    );
}

/// Scroll pipes and coins left and drop those that are gone
pub fn advance_world(state: &mut GameState) {
    let pipe_speed = state.config.pipe_speed;
    let bonus_speed = state.config.bonus_speed;

    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= pipe_speed;
    }
    state.obstacles.retain(|o| o.right() > 0.0);

    for bonus in &mut state.bonuses {
        bonus.pos.x -= bonus_speed;
    }
    state
        .bonuses
        .retain(|b| !b.collected && b.pos.x + b.radius > 0.0);

    // The tracker is the position of the newest pair, so it scrolls with the pipes
    state.last_spawn_x -= pipe_speed;
}

/// Evaluate collisions and scoring for the current positions
///
/// Order: boundary, pipes, coins, pass scoring. Ending the game is idempotent
/// and the remaining checks still run for this tick.
pub fn resolve_collisions(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let player = state.player;

    // Boundary
    if out_of_bounds(player.pos.y, state.viewport.height) {
        end_game(state, &mut events);
    }

    // Pipes
    let hit_pipe = state
        .obstacles
        .iter()
        .any(|o| circle_hits_box(player.pos, player.radius, o.pos, o.size()));
    if hit_pipe {
        end_game(state, &mut events);
    }

    // Coins
    for bonus in state.bonuses.iter_mut().filter(|b| !b.collected) {
        if circles_overlap(player.pos, player.radius, bonus.pos, bonus.radius) {
            bonus.collected = true;
            state.currency += 1;
            state.score += BONUS_POINTS;
            events.push(GameEvent::BonusCollected {
                score: state.score,
                currency: state.currency,
            });
        }
    }
    update_high_score(state, &mut events);

    // Pass scoring
    for obstacle in state.obstacles.iter_mut().filter(|o| !o.passed) {
        if obstacle.right() < player.pos.x {
            obstacle.passed = true;
            if obstacle.is_top() {
                state.score += PASS_POINTS;
                events.push(GameEvent::ObstaclePassed { score: state.score });
            }
        }
    }
    update_high_score(state, &mut events);

    events
}

fn end_game(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Ended {
        state.phase = GamePhase::Ended;
        events.push(GameEvent::GameOver);
        log::info!("Game over (score {}, tick {})", state.score, state.time_ticks);
    }
}

fn update_high_score(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.score > state.high_score {
        state.high_score = state.score;
        events.push(GameEvent::NewHighScore(state.score));
    }
}
