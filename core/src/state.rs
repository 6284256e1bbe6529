use serde::{Deserialize, Serialize};

use crate::*;

/// Hints granted at the start of every game.
pub const INITIAL_HINTS: u8 = 3;

/// Valid transitions:
/// - any -> Ready (reset)
/// - Ready -> Playing
/// - Ready -> Won
/// - Ready -> Lost
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No grid allocated yet
    #[default]
    Idle,
    /// Grid allocated, mines are placed by the first reveal
    Ready,
    /// Mines placed, game in progress
    Playing,
    /// Game ended and player won
    Won,
    /// Game ended and player lost
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Whether board-changing moves are accepted
    pub const fn accepts_moves(self) -> bool {
        matches!(self, Self::Ready | Self::Playing)
    }
}

/// Discrete player or presentation request, `now` is a monotonic timestamp.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Reset(GameConfig),
    Reveal { coords: Coord2, now: Millis },
    ToggleFlag { coords: Coord2 },
    Chord { coords: Coord2, now: Millis },
    Hint { now: Millis },
    Tick { now: Millis },
    CheatPrime,
}

/// Immutable snapshot of a game.
///
/// Every transition returns a new snapshot and leaves the previous one intact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    grid: Grid,
    status: GameStatus,
    flags_left: CellCount,
    revealed_cells: CellCount,
    mistakes: u32,
    hints_available: u8,
    config: GameConfig,
    start_timestamp: Option<Millis>,
    time_ms: Millis,
}

impl GameState {
    /// Placeholder before the first reset, no grid is allocated.
    pub fn idle(config: GameConfig) -> Self {
        Self {
            grid: Grid::default(),
            status: GameStatus::Idle,
            ..Self::new(config)
        }
    }

    /// Fresh game waiting for its first move.
    pub fn new(config: GameConfig) -> Self {
        Self {
            grid: Grid::empty(config.rows, config.columns),
            status: GameStatus::Ready,
            flags_left: config.mines,
            revealed_cells: 0,
            mistakes: 0,
            hints_available: INITIAL_HINTS,
            config,
            start_timestamp: None,
            time_ms: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn flags_left(&self) -> CellCount {
        self.flags_left
    }

    pub fn revealed_cells(&self) -> CellCount {
        self.revealed_cells
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn hints_available(&self) -> u8 {
        self.hints_available
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn start_timestamp(&self) -> Option<Millis> {
        self.start_timestamp
    }

    pub fn time_ms(&self) -> Millis {
        self.time_ms
    }

    pub fn cell_at(&self, coords: Coord2) -> &Cell {
        &self.grid[coords]
    }

    pub fn stats(&self) -> GameStats {
        GameStats::from(self)
    }

    /// Next snapshot after `intent`. Intents that do not apply to the current
    /// status return an unchanged copy.
    ///
    /// # Panics
    ///
    /// When an intent carries coordinates outside the grid.
    pub fn apply(&self, intent: Intent, rng: &mut impl RandomSource) -> Self {
        use Intent::*;

        let next = match intent {
            Reset(config) => Self::new(config),
            Reveal { coords, now } => self.reveal(coords, now, rng),
            ToggleFlag { coords } => self.toggle_flag(coords),
            Chord { coords, now } => self.chord(coords, now),
            Hint { now } => self.hint(now, rng),
            Tick { now } => self.tick(now),
            CheatPrime => self.cheat_prime(rng),
        };

        if next.status != self.status {
            log::debug!("{:?} -> {:?} after {:?}", self.status, next.status, intent);
        }
        next
    }

    fn reveal(&self, coords: Coord2, now: Millis, rng: &mut impl RandomSource) -> Self {
        if !self.status.accepts_moves() {
            return self.clone();
        }
        self.grid.assert_in_bounds(coords);
        if !self.grid[coords].is_hidden() {
            return self.clone();
        }

        let mut next = self.clone();
        if self.status.is_ready() {
            next.grid = self.materialize_mines(coords, rng);
        }

        let outcome = engine::reveal_cell(&mut next.grid, coords);
        next.settle(outcome, now);

        if next.start_timestamp.is_none() && next.status.is_playing() {
            next.start_timestamp = Some(now);
        }
        next
    }

    /// Places mines for the first reveal at `target`.
    ///
    /// A layout already primed for peeking is kept; markers placed while
    /// ready carry over to the new grid.
    fn materialize_mines(&self, target: Coord2, rng: &mut impl RandomSource) -> Grid {
        let mut protected = ProtectedCells::new();
        if self.config.safe_start {
            protected.insert(target);
        }

        let balancer = FairnessBalancer::default();
        let mut grid = if self.grid.has_mines() {
            balancer.adopt_layout(&self.grid, &self.config, &protected, rng)
        } else {
            balancer.generate(&self.config, &protected, rng)
        };

        for cell in grid.cells_mut() {
            cell.flags |= self.grid[cell.coords()].markers();
        }
        grid
    }

    fn toggle_flag(&self, coords: Coord2) -> Self {
        if !self.status.accepts_moves() {
            return self.clone();
        }
        self.grid.assert_in_bounds(coords);

        let mut next = self.clone();
        let cell = &mut next.grid[coords];

        if cell.is_revealed() {
            return next;
        } else if cell.is_flagged() {
            cell.flags.remove(CellFlags::FLAGGED);
            if self.config.allow_question_mark {
                cell.flags.insert(CellFlags::QUESTIONED);
            }
            next.flags_left += 1;
        } else if cell.is_questioned() {
            cell.flags.remove(CellFlags::QUESTIONED);
        } else if next.flags_left == 0 {
            return next;
        } else {
            cell.mark_flagged();
            next.flags_left -= 1;
        }
        next
    }

    fn chord(&self, coords: Coord2, now: Millis) -> Self {
        if !self.status.is_playing() || !self.config.allow_chord {
            return self.clone();
        }
        self.grid.assert_in_bounds(coords);

        let mut next = self.clone();
        let outcome = engine::chord_reveal(&mut next.grid, coords);
        next.settle(outcome, now);
        next
    }

    fn hint(&self, now: Millis, rng: &mut impl RandomSource) -> Self {
        if !self.status.is_playing() || self.hints_available == 0 {
            return self.clone();
        }

        let candidates = engine::hint_candidates(&self.grid);
        if candidates.is_empty() {
            return self.clone();
        }
        let target = candidates[rng.next_int(candidates.len())];
        log::debug!("hint opens {:?}", target);

        let mut next = self.clone();
        next.hints_available -= 1;
        let outcome = engine::reveal_cell(&mut next.grid, target);
        next.grid[target].flags.insert(CellFlags::HINTED);
        next.settle(outcome, now);
        next
    }

    fn tick(&self, now: Millis) -> Self {
        let mut next = self.clone();
        if let (GameStatus::Playing, Some(start)) = (self.status, self.start_timestamp) {
            next.time_ms = now.saturating_sub(start);
        }
        next
    }

    fn cheat_prime(&self, rng: &mut impl RandomSource) -> Self {
        if !self.status.is_ready() || self.grid.has_mines() {
            return self.clone();
        }

        Self {
            grid: FairnessBalancer::default().generate(&self.config, &ProtectedCells::new(), rng),
            ..self.clone()
        }
    }

    /// Folds a reveal outcome into the counters and status.
    fn settle(&mut self, outcome: RevealOutcome, now: Millis) {
        match outcome {
            RevealOutcome::NoChange => {}
            RevealOutcome::HitMine { revealed } => {
                self.revealed_cells += revealed;
                self.mistakes += 1;
                self.status = GameStatus::Lost;
                self.freeze_timer(now);
            }
            RevealOutcome::Revealed(revealed) => {
                self.revealed_cells += revealed;
                if self.revealed_cells == self.config.safe_cells() {
                    engine::auto_flag_mines(&mut self.grid);
                    self.flags_left = 0;
                    self.status = GameStatus::Won;
                    self.freeze_timer(now);
                } else {
                    self.status = GameStatus::Playing;
                }
            }
        }
    }

    fn freeze_timer(&mut self, now: Millis) {
        if let Some(start) = self.start_timestamp {
            self.time_ms = now.saturating_sub(start);
        }
    }
}
