//! Scene assembly: game state to pixel-space triangles

use super::shapes::{CIRCLE_SEGMENTS, circle, rect};
use super::vertex::{Vertex, colors};
use crate::sim::GameState;

/// Build this frame's vertices, back to front: pipes, gold, player
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        state.obstacles.len() * 6 + (state.bonuses.len() + 1) * CIRCLE_SEGMENTS as usize * 3,
    );

    for obstacle in &state.obstacles {
        vertices.extend(rect(obstacle.pos, obstacle.size(), colors::PIPE));
    }

    for bonus in state.bonuses.iter().filter(|b| !b.collected) {
        vertices.extend(circle(
            bonus.pos,
            bonus.radius,
            colors::GOLD,
            CIRCLE_SEGMENTS,
        ));
    }

    let player = &state.player;
    vertices.extend(circle(
        player.pos,
        player.radius,
        colors::PLAYER,
        CIRCLE_SEGMENTS,
    ));

    vertices
}
