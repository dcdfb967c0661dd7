//! Game session: lifecycle state machine around the simulation
//!
//! The host owns the frame scheduling. It calls the UI actions (`start`,
//! `toggle_pause`, `restart`, `jump`, `resize`) from its event handlers and
//! `step()` once per display frame while `is_running()` holds. The session
//! itself never loops or sleeps.
//!
//! ```text
//! Idle --start--> Running <--toggle_pause--> Paused
//!                   |  ^
//!          collision|  |restart (from any phase)
//!                   v  |
//!                  Ended
//! ```

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::highscores::HighScore;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, Viewport, tick};

/// Values the UI displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    pub currency: u64,
    pub phase: GamePhase,
    /// Whether the start/restart menu should be shown
    pub menu_visible: bool,
}

/// One player's game: simulation state plus the persisted high score
#[derive(Debug)]
pub struct Session {
    state: GameState,
    high_score: HighScore,
    autopilot: bool,
}

impl Session {
    /// Validate the configuration against the initial surface and build an idle session
    pub fn new(
        config: GameConfig,
        viewport: Viewport,
        high_score: HighScore,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_viewport(viewport.height)?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(config, viewport, seed);
        state.high_score = high_score.best();
        log::info!(
            "Session ready ({}x{}, seed {}, high score {})",
            viewport.width,
            viewport.height,
            seed,
            state.high_score
        );

        Ok(Self {
            state,
            high_score,
            autopilot: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Whether the host should keep scheduling frames
    pub fn is_running(&self) -> bool {
        self.state.phase == GamePhase::Running
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Start a fresh run from Idle, or resume from Paused
    ///
    /// Returns true if the phase changed. An ended run needs `restart`.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Idle => {
                self.state.reset();
                self.state.phase = GamePhase::Running;
                log::info!("Game started");
                true
            }
            GamePhase::Paused => {
                self.state.phase = GamePhase::Running;
                log::info!("Game resumed");
                true
            }
            GamePhase::Running | GamePhase::Ended => false,
        }
    }

    /// Toggle between Running and Paused; ignored in other phases
    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Running => {
                self.state.phase = GamePhase::Paused;
                log::info!("Game paused");
                true
            }
            GamePhase::Paused => {
                self.state.phase = GamePhase::Running;
                log::info!("Game resumed");
                true
            }
            GamePhase::Idle | GamePhase::Ended => false,
        }
    }

    /// Play/pause button: starts a new run when nothing is playing, toggles pause otherwise
    pub fn play_pause(&mut self) {
        match self.state.phase {
            GamePhase::Idle => {
                self.start();
            }
            GamePhase::Ended => self.restart(),
            GamePhase::Running | GamePhase::Paused => {
                self.toggle_pause();
            }
        }
    }

    /// Throw away the current run and start a new one
    ///
    /// Score, entities and the spawn tracker reset; currency and the high
    /// score are kept.
    pub fn restart(&mut self) {
        self.state.reset();
        self.state.phase = GamePhase::Running;
        log::info!("Game restarted (high score {})", self.high_score.best());
    }

    /// Jump impulse, honored only while running
    pub fn jump(&mut self) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.state.player.jump();
        true
    }

    /// New surface size, used from the next step on
    pub fn resize(&mut self, viewport: Viewport) {
        if let Err(e) = self.state.config.check_viewport(viewport.height) {
            log::warn!("Resized below the pipe layout, heights will be clamped: {}", e);
        }
        self.state.viewport = viewport;
    }

    /// Advance one frame; no-op unless running
    ///
    /// New high scores are written through to storage before returning.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let input = TickInput {
            autopilot: self.autopilot,
        };
        let events = tick(&mut self.state, &input);

        for event in &events {
            if let GameEvent::NewHighScore(score) = *event {
                self.high_score.record(score);
            }
        }
        events
    }

    pub fn hud(&self) -> Hud {
        let phase = self.state.phase;
        Hud {
            score: self.state.score,
            high_score: self.high_score.best(),
            currency: self.state.currency,
            phase,
            menu_visible: matches!(phase, GamePhase::Idle | GamePhase::Ended),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::error::StorageError;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::sim::{Bonus, Obstacle, Segment};

    const KEY: &str = "flappyHighScore";
    const VIEWPORT: Viewport = Viewport::new(480.0, 400.0);

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.borrow().get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().set_item(key, value)
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(1234),
            ..Default::default()
        }
    }

    fn session() -> Session {
        Session::new(config(), VIEWPORT, HighScore::in_memory()).unwrap()
    }

    fn stored(store: &SharedStore) -> Option<u64> {
        store
            .get_item(KEY)
            .unwrap()
            .and_then(|s| s.parse().ok())
    }

    /// Put a passed-ready pipe pair and a coin right on the player
    fn stage_pair_and_coin(session: &mut Session) {
        let state = &mut session.state;
        let y = state.player.pos.y;
        state.last_spawn_x = f32::INFINITY;
        state
            .obstacles
            .push(Obstacle::new(-9.0, 0.0, 50.0, y - 75.0, Segment::Top));
        state.obstacles.push(Obstacle::new(
            -9.0,
            y + 75.0,
            50.0,
            VIEWPORT.height - y - 75.0,
            Segment::Bottom,
        ));
        state.bonuses.push(Bonus::new(Vec2::new(55.0, y), 10.0));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = GameConfig {
            pipe_gap: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(bad, VIEWPORT, HighScore::in_memory()),
            Err(ConfigError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_new_rejects_degenerate_viewport() {
        assert!(matches!(
            Session::new(config(), Viewport::new(480.0, 200.0), HighScore::in_memory()),
            Err(ConfigError::DegenerateSpawnRange { .. })
        ));
    }

    #[test]
    fn test_idle_until_started() {
        let mut session = session();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(session.hud().menu_visible);
        assert!(!session.jump());
        assert!(session.step().is_empty());
        assert!(session.state().obstacles.is_empty());

        assert!(session.start());
        assert!(session.is_running());
        assert!(!session.hud().menu_visible);
        assert!(!session.start());
    }

    #[test]
    fn test_pause_toggle() {
        let mut session = session();
        assert!(!session.toggle_pause());

        session.start();
        session.step();
        assert!(session.toggle_pause());
        assert_eq!(session.phase(), GamePhase::Paused);

        // Frozen: no physics, no jumps
        let before = session.state().player;
        assert!(!session.jump());
        assert!(session.step().is_empty());
        assert_eq!(session.state().player, before);

        assert!(session.toggle_pause());
        assert!(session.is_running());

        session.toggle_pause();
        assert!(session.start());
        assert!(session.is_running());
    }

    #[test]
    fn test_jump_sets_exact_impulse() {
        let mut session = session();
        session.start();
        for _ in 0..10 {
            session.step();
        }
        assert!(session.jump());
        assert_eq!(session.state().player.velocity, -5.0);
        assert!(session.jump());
        assert_eq!(session.state().player.velocity, -5.0);
    }

    #[test]
    fn test_falling_ends_game_and_shows_menu() {
        let mut session = session();
        session.start();

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(session.step());
            if !session.is_running() {
                break;
            }
        }
        assert_eq!(session.phase(), GamePhase::Ended);
        assert!(events.contains(&GameEvent::GameOver));
        assert!(session.hud().menu_visible);

        // Only restart leaves Ended
        assert!(!session.start());
        assert!(!session.toggle_pause());
        assert!(!session.jump());
        session.restart();
        assert!(session.is_running());
    }

    #[test]
    fn test_scoring_writes_high_score_through() {
        let store = SharedStore::default();
        let hs = HighScore::load(Box::new(store.clone()), KEY);
        let mut session = Session::new(config(), VIEWPORT, hs).unwrap();
        session.start();
        stage_pair_and_coin(&mut session);

        let events = session.step();
        assert!(events.contains(&GameEvent::BonusCollected { score: 5, currency: 1 }));
        assert!(events.contains(&GameEvent::ObstaclePassed { score: 6 }));

        let hud = session.hud();
        assert_eq!(hud.score, 6);
        assert_eq!(hud.currency, 1);
        assert_eq!(hud.high_score, 6);
        assert_eq!(stored(&store), Some(6));
    }

    #[test]
    fn test_restart_resets_run_but_keeps_records() {
        let store = SharedStore::default();
        let hs = HighScore::load(Box::new(store.clone()), KEY);
        let mut session = Session::new(config(), VIEWPORT, hs).unwrap();
        session.start();
        stage_pair_and_coin(&mut session);
        session.step();
        session.step();
        assert!(session.state().time_ticks > 0);

        session.restart();
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.bonuses.is_empty());
        assert_eq!(state.last_spawn_x, 0.0);
        assert_eq!(state.player.pos.y, 200.0);
        assert_eq!(state.player.velocity, 0.0);
        assert_eq!(state.currency, 1);
        assert_eq!(session.hud().high_score, 6);
        assert_eq!(stored(&store), Some(6));
    }

    #[test]
    fn test_high_score_loaded_from_storage() {
        let mut store = MemoryStore::new();
        store.set_item(KEY, "31").unwrap();
        let hs = HighScore::load(Box::new(store), KEY);
        let mut session = Session::new(config(), VIEWPORT, hs).unwrap();
        assert_eq!(session.hud().high_score, 31);
        assert_eq!(session.state().high_score, 31);

        // A lower score does not replace it
        session.start();
        stage_pair_and_coin(&mut session);
        session.step();
        assert_eq!(session.hud().score, 6);
        assert_eq!(session.hud().high_score, 31);
    }

    #[test]
    fn test_resize_applies_next_step() {
        let mut session = session();
        session.start();
        session.resize(Viewport::new(800.0, 600.0));
        session.step();
        // First pair spawns at the new right edge
        assert_eq!(session.state().obstacles[0].pos.x, 798.0);

        // Shrinking below the layout is tolerated
        session.resize(Viewport::new(800.0, 100.0));
        assert_eq!(session.state().viewport.height, 100.0);
    }

    #[test]
    fn test_play_pause_button() {
        let mut session = session();
        session.play_pause();
        assert_eq!(session.phase(), GamePhase::Running);
        session.play_pause();
        assert_eq!(session.phase(), GamePhase::Paused);
        session.play_pause();
        assert_eq!(session.phase(), GamePhase::Running);

        session.state.player.pos.y = -1.0;
        session.step();
        assert_eq!(session.phase(), GamePhase::Ended);
        session.play_pause();
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_autopilot_session() {
        let mut session = session();
        session.set_autopilot(true);
        session.start();
        for _ in 0..1000 {
            session.step();
        }
        assert!(session.is_running());
        assert!(session.hud().score > 0);
        assert_eq!(session.hud().high_score, session.hud().score);
    }

    proptest! {
        #[test]
        fn prop_high_score_never_decreases(seed in any::<u64>(), runs in 1usize..4) {
            let store = SharedStore::default();
            let hs = HighScore::load(Box::new(store.clone()), KEY);
            let config = GameConfig { seed: Some(seed), ..Default::default() };
            let mut session = Session::new(config, VIEWPORT, hs).unwrap();
            session.set_autopilot(true);

            let mut best_seen = 0;
            let mut last_high = 0;
            for run in 0..runs {
                session.restart();
                for _ in 0..(300 * (run + 1)) {
                    session.step();
                    let hud = session.hud();
                    best_seen = best_seen.max(hud.score);
                    prop_assert!(hud.high_score >= last_high);
                    last_high = hud.high_score;
                }
            }
            prop_assert_eq!(session.hud().high_score, best_seen);
            let persisted = stored(&store).unwrap_or(0);
            prop_assert_eq!(persisted, best_seen);
        }
    }
}
