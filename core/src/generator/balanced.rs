use alloc::collections::VecDeque;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::*;

/// Upper bound for [`largest_zero_cluster_ratio`] on an accepted board.
///
/// The ratio is a fraction of the safe cells, so any value of 1.0 or more
/// accepts every board and rebalancing never swaps anything.
pub const ZERO_CLUSTER_THRESHOLD: f64 = 23.0;

/// Scatter attempts before the unconditional fallback pass.
pub const MAX_GENERATION_ATTEMPTS: u32 = 40;

/// Size of the zero-adjacency regions of a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ZeroClusters {
    pub largest: CellCount,
    pub total: CellCount,
}

impl ZeroClusters {
    /// Connected-component search over non-mine cells with no adjacent mines.
    pub fn measure(grid: &Grid) -> Self {
        let is_zero = |cell: &Cell| !cell.is_mine() && cell.adjacent_mines == 0;
        let mut visited = HashSet::new();
        let mut clusters = Self::default();

        for cell in grid.cells().filter(|&cell| is_zero(cell)) {
            clusters.total += 1;
            if !visited.insert(cell.coords()) {
                continue;
            }

            let mut size: CellCount = 0;
            let mut to_visit = VecDeque::from([cell.coords()]);
            while let Some(coords) = to_visit.pop_front() {
                size += 1;
                for pos in grid.neighbors(coords) {
                    if is_zero(&grid[pos]) && visited.insert(pos) {
                        to_visit.push_back(pos);
                    }
                }
            }

            clusters.largest = clusters.largest.max(size);
        }

        clusters
    }
}

/// Share of the safe cells covered by zero cells, taking the larger of the
/// total zero count and the biggest single cluster. `0.0` without safe cells.
pub fn largest_zero_cluster_ratio(grid: &Grid, mines: CellCount) -> f64 {
    let safe_cells = grid.total_cells().saturating_sub(mines);
    if safe_cells == 0 {
        return 0.0;
    }

    let clusters = ZeroClusters::measure(grid);
    let zero_ratio = f64::from(clusters.total) / f64::from(safe_cells);
    let cluster_ratio = f64::from(clusters.largest) / f64::from(safe_cells);

    if zero_ratio > cluster_ratio {
        zero_ratio
    } else {
        cluster_ratio
    }
}

/// Mine placement that bounds how much of the board a single flood reveal can open.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FairnessBalancer {
    pub threshold: f64,
    pub max_attempts: u32,
}

impl Default for FairnessBalancer {
    fn default() -> Self {
        Self::new(ZERO_CLUSTER_THRESHOLD, MAX_GENERATION_ATTEMPTS)
    }
}

impl FairnessBalancer {
    pub const fn new(threshold: f64, max_attempts: u32) -> Self {
        Self {
            threshold,
            max_attempts,
        }
    }

    pub fn is_balanced(&self, grid: &Grid, mines: CellCount) -> bool {
        largest_zero_cluster_ratio(grid, mines) <= self.threshold
    }

    /// Swaps random zero cells with random mines, re-annotating after each
    /// swap, until the grid is balanced or no unprotected candidates remain.
    pub fn rebalance(
        &self,
        grid: &mut Grid,
        mines: CellCount,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) {
        let max_iterations = usize::from(grid.total_cells()) * 2;

        for iteration in 0..max_iterations {
            if self.is_balanced(grid, mines) {
                break;
            }

            let zero_candidates = grid.coords_where(|cell| {
                !cell.is_mine() && cell.adjacent_mines == 0 && !protected.contains(&cell.coords())
            });
            let mine_candidates =
                grid.coords_where(|cell| cell.is_mine() && !protected.contains(&cell.coords()));

            if zero_candidates.is_empty() || mine_candidates.is_empty() {
                log::debug!("rebalance out of candidates after {} swaps", iteration);
                break;
            }

            let target_zero = zero_candidates[rng.next_int(zero_candidates.len())];
            let mine_to_move = mine_candidates[rng.next_int(mine_candidates.len())];
            log::trace!("swap mine {:?} into zero cell {:?}", mine_to_move, target_zero);

            grid[target_zero].set_mine(true);
            grid[mine_to_move].set_mine(false);
            grid.annotate();
        }
    }

    /// Scatter, annotate and rebalance once on an empty grid.
    fn attempt(
        &self,
        config: &GameConfig,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) -> Grid {
        let mut grid = Grid::empty(config.rows, config.columns);
        grid.scatter_mines(config.mines, protected, rng);
        grid.annotate();
        self.rebalance(&mut grid, config.mines, protected, rng);
        grid
    }

    /// First balanced attempt, or an unconditional extra attempt once
    /// `max_attempts` have failed.
    pub fn generate_balanced_grid(
        &self,
        config: &GameConfig,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) -> Grid {
        for attempt in 0..self.max_attempts {
            let candidate = self.attempt(config, protected, rng);
            if self.is_balanced(&candidate, config.mines) {
                log::debug!(
                    "generated {}x{} grid with {} mines after {} attempt(s)",
                    config.rows,
                    config.columns,
                    config.mines,
                    attempt + 1
                );
                return candidate;
            }
        }

        log::warn!(
            "no balanced layout after {} attempts, accepting best effort",
            self.max_attempts
        );
        self.attempt(config, protected, rng)
    }

    /// Keeps the mines of an already materialised `grid`, moving any that sit
    /// on a `protected` cell to a random free cell.
    ///
    /// Falls back to a fresh layout when there is nowhere to move a mine, or
    /// the result lost mines or ended up unbalanced.
    pub fn adopt_layout(
        &self,
        grid: &Grid,
        config: &GameConfig,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) -> Grid {
        let mut adjusted = Grid::empty(config.rows, config.columns);
        for cell in grid.cells().filter(|cell| cell.is_mine()) {
            adjusted[cell.coords()].set_mine(true);
        }

        let mut relocated = 0;
        for &coords in protected {
            if adjusted[coords].is_mine() {
                adjusted[coords].set_mine(false);
                relocated += 1;
            }
        }

        if relocated > 0 {
            let mut free =
                adjusted.coords_where(|cell| !cell.is_mine() && !protected.contains(&cell.coords()));
            for _ in 0..relocated {
                if free.is_empty() {
                    log::debug!("no free cell to relocate a protected mine, regenerating");
                    return self.generate_balanced_grid(config, protected, rng);
                }
                let place = free.swap_remove(rng.next_int(free.len()));
                log::debug!("relocated protected mine to {:?}", place);
                adjusted[place].set_mine(true);
            }
        }

        adjusted.annotate();
        self.rebalance(&mut adjusted, config.mines, protected, rng);

        if adjusted.mine_count() != config.mines || !self.is_balanced(&adjusted, config.mines) {
            log::debug!("adopted layout rejected, regenerating");
            return self.generate_balanced_grid(config, protected, rng);
        }

        adjusted
    }
}

impl GridGenerator for FairnessBalancer {
    fn generate(
        &self,
        config: &GameConfig,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) -> Grid {
        self.generate_balanced_grid(config, protected, rng)
    }
}

/// [`FairnessBalancer::rebalance`] with the default threshold.
pub fn rebalance(
    grid: &mut Grid,
    mines: CellCount,
    protected: &ProtectedCells,
    rng: &mut impl RandomSource,
) {
    FairnessBalancer::default().rebalance(grid, mines, protected, rng)
}

/// [`FairnessBalancer::generate_balanced_grid`] with the default threshold and attempt budget.
pub fn generate_balanced_grid(
    config: &GameConfig,
    protected: &ProtectedCells,
    rng: &mut impl RandomSource,
) -> Grid {
    FairnessBalancer::default().generate_balanced_grid(config, protected, rng)
}
