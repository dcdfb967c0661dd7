//! Attract-mode autopilot
//!
//! Aims for the vertical center of the next gap: jumps whenever the player is
//! falling and has sunk below the target by more than `MARGIN`. A jump from
//! there peaks about `jump²/2g` (62.5px with default tuning) higher, which
//! keeps the player inside a default 150px gap.
//!
//! The target only moves on once the current pair is behind the player, so
//! in worlds much taller than ~500px a far-away next gap can be out of reach.

use super::state::GameState;

/// How far below the gap center the player may sink before jumping
pub const MARGIN: f32 = 20.0;

/// Vertical target: center of the next gap ahead, or mid-screen
pub fn target_y(state: &GameState) -> f32 {
    let player = &state.player;
    state
        .obstacles
        .iter()
        .filter(|o| o.is_top())
        .find(|o| o.right() >= player.pos.x - player.radius)
        .map(|o| o.height + state.config.pipe_gap / 2.0)
        .unwrap_or(state.viewport.height / 2.0)
}

/// Decide whether to jump this tick
pub fn wants_jump(state: &GameState) -> bool {
    let player = &state.player;
    player.velocity >= 0.0 && player.pos.y > target_y(state) + MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{GamePhase, Obstacle, Segment, Viewport};
    use crate::sim::tick::{TickInput, tick};

    fn state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), Viewport::new(480.0, 400.0), 9);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_target_without_pipes_is_mid_screen() {
        assert_eq!(target_y(&state()), 200.0);
    }

    #[test]
    fn test_target_skips_passed_pipes() {
        let mut state = state();
        state
            .obstacles
            .push(Obstacle::new(-20.0, 0.0, 50.0, 60.0, Segment::Top));
        state
            .obstacles
            .push(Obstacle::new(-20.0, 210.0, 50.0, 190.0, Segment::Bottom));
        state
            .obstacles
            .push(Obstacle::new(230.0, 0.0, 50.0, 120.0, Segment::Top));
        state
            .obstacles
            .push(Obstacle::new(230.0, 270.0, 50.0, 130.0, Segment::Bottom));
        assert_eq!(target_y(&state), 195.0);
    }

    #[test]
    fn test_jumps_only_when_falling_below_target() {
        let mut state = state();
        state.player.pos.y = 230.0;
        state.player.velocity = 1.0;
        assert!(wants_jump(&state));

        state.player.velocity = -1.0;
        assert!(!wants_jump(&state));

        state.player.velocity = 1.0;
        state.player.pos.y = 210.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_autopilot_keeps_flying() {
        let mut state = state();
        let input = TickInput {
            autopilot: true,
        };
        for _ in 0..2000 {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.score >= 5);
    }
}
