use crate::*;

/// Owns the current game snapshot and the random source driving it.
///
/// Each operation replaces the snapshot with the next one and returns it.
#[derive(Clone, Debug)]
pub struct Minesweeper<R = GameRng> {
    state: GameState,
    rng: R,
}

impl Minesweeper<GameRng> {
    /// Idle session with a clock-seeded random source.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, GameRng::default())
    }
}

impl<R: RandomSource> Minesweeper<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            state: GameState::idle(config),
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        self.state.grid()
    }

    pub fn config(&self) -> &GameConfig {
        self.state.config()
    }

    pub fn stats(&self) -> GameStats {
        self.state.stats()
    }

    pub fn dispatch(&mut self, intent: Intent) -> &GameState {
        self.state = self.state.apply(intent, &mut self.rng);
        &self.state
    }

    pub fn reset(&mut self, config: GameConfig) -> &GameState {
        self.dispatch(Intent::Reset(config))
    }

    /// New game with the current configuration.
    pub fn restart(&mut self) -> &GameState {
        let config = *self.config();
        self.reset(config)
    }

    pub fn reveal(&mut self, coords: Coord2, now: Millis) -> &GameState {
        self.dispatch(Intent::Reveal { coords, now })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> &GameState {
        self.dispatch(Intent::ToggleFlag { coords })
    }

    pub fn chord(&mut self, coords: Coord2, now: Millis) -> &GameState {
        self.dispatch(Intent::Chord { coords, now })
    }

    pub fn hint(&mut self, now: Millis) -> &GameState {
        self.dispatch(Intent::Hint { now })
    }

    pub fn tick(&mut self, now: Millis) -> &GameState {
        self.dispatch(Intent::Tick { now })
    }

    pub fn cheat_prime(&mut self) -> &GameState {
        self.dispatch(Intent::CheatPrime)
    }
}
