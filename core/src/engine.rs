use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::BitOr;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of opening one or more cells on a grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    /// Safe cells were opened.
    Revealed(CellCount),
    /// At least one mine was opened, `revealed` safe cells were opened alongside it.
    HitMine { revealed: CellCount },
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn revealed(self) -> CellCount {
        match self {
            Self::NoChange => 0,
            Self::Revealed(count) => count,
            Self::HitMine { revealed } => revealed,
        }
    }
}

/// Used to merge outcomes when opening several cells at once.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        let revealed = self.revealed() + rhs.revealed();
        match (self, rhs) {
            // a mine anywhere loses
            (HitMine { .. }, _) | (_, HitMine { .. }) => HitMine { revealed },
            (NoChange, NoChange) => NoChange,
            _ => Revealed(revealed),
        }
    }
}

/// Breadth-first reveal from `origin`, returning how many cells were opened.
///
/// Flagged and already revealed cells are skipped, zero cells spread to their
/// unrevealed safe neighbours. Mines are never queued.
pub fn flood_reveal(grid: &mut Grid, origin: Coord2) -> CellCount {
    let mut visited = HashSet::new();
    let mut to_visit = VecDeque::from([origin]);
    let mut revealed: CellCount = 0;

    while let Some(coords) = to_visit.pop_front() {
        if !visited.insert(coords) {
            continue;
        }

        let cell = &mut grid[coords];
        if cell.is_revealed() || cell.is_flagged() {
            continue;
        }

        cell.reveal();
        revealed += 1;
        log::trace!("flood opened {:?}, adjacent mines: {}", coords, cell.adjacent_mines);

        if cell.adjacent_mines == 0 && !cell.is_mine() {
            to_visit.extend(grid.neighbors(coords).into_iter().filter(|&pos| {
                let neighbor = &grid[pos];
                !neighbor.is_revealed() && !neighbor.is_mine() && !visited.contains(&pos)
            }));
        }
    }

    revealed
}

/// Shows every mine, dropping any flag or question mark on it. Safe cells are untouched.
pub fn expose_all_mines(grid: &mut Grid) {
    for cell in grid.cells_mut().filter(|cell| cell.is_mine()) {
        cell.reveal();
    }
}

/// Flags every mine, used once the board is cleared.
pub fn auto_flag_mines(grid: &mut Grid) {
    for cell in grid.cells_mut().filter(|cell| cell.is_mine()) {
        cell.mark_flagged();
    }
}

pub fn count_flagged_neighbors(grid: &Grid, coords: Coord2) -> u8 {
    grid.neighbors(coords)
        .into_iter()
        .filter(|&pos| grid[pos].is_flagged())
        .count() as u8
}

/// Hidden safe cells a hint may open, row-major.
pub fn hint_candidates(grid: &Grid) -> Vec<Coord2> {
    grid.coords_where(|cell| !cell.is_mine() && cell.is_hidden())
}

/// Opens a single hidden cell, marking it exploded when it holds a mine.
/// Mines are not exposed here.
fn open_cell(grid: &mut Grid, coords: Coord2) -> RevealOutcome {
    let cell = &mut grid[coords];
    if !cell.is_hidden() {
        return RevealOutcome::NoChange;
    }

    if cell.is_mine() {
        log::debug!("mine hit at {:?}", coords);
        cell.flags.insert(CellFlags::EXPLODED);
        RevealOutcome::HitMine { revealed: 0 }
    } else {
        RevealOutcome::Revealed(flood_reveal(grid, coords))
    }
}

/// Reveals the cell at `coords`, exposing the whole minefield if it was a mine.
pub fn reveal_cell(grid: &mut Grid, coords: Coord2) -> RevealOutcome {
    let outcome = open_cell(grid, coords);
    if let RevealOutcome::HitMine { .. } = outcome {
        expose_all_mines(grid);
    }
    outcome
}

/// Whether `coords` is a revealed number whose flagged neighbours match it.
pub fn can_chord_at(grid: &Grid, coords: Coord2) -> bool {
    let cell = &grid[coords];
    cell.is_revealed()
        && !cell.is_mine()
        && count_flagged_neighbors(grid, coords) == cell.adjacent_mines
}

/// Opens every hidden neighbour of a satisfied number.
///
/// All neighbouring mines that get opened are marked exploded before the
/// minefield is exposed.
pub fn chord_reveal(grid: &mut Grid, coords: Coord2) -> RevealOutcome {
    if !can_chord_at(grid, coords) {
        return RevealOutcome::NoChange;
    }

    let outcome = grid
        .neighbors(coords)
        .into_iter()
        .map(|pos| open_cell(grid, pos))
        .fold(RevealOutcome::NoChange, BitOr::bitor);

    if let RevealOutcome::HitMine { .. } = outcome {
        expose_all_mines(grid);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: Coord2, mines: &[Coord2]) -> Grid {
        Grid::from_mine_coords(size, mines).unwrap()
    }

    fn revealed(grid: &Grid) -> usize {
        grid.cells().filter(|cell| cell.is_revealed()).count()
    }

    #[test]
    fn outcomes_merge_with_mine_priority() {
        use RevealOutcome::*;

        assert_eq!(NoChange | NoChange, NoChange);
        assert_eq!(Revealed(2) | NoChange, Revealed(2));
        assert_eq!(Revealed(2) | Revealed(3), Revealed(5));
        assert_eq!(Revealed(4) | HitMine { revealed: 0 }, HitMine { revealed: 4 });
        assert!(!NoChange.has_update());
    }

    #[test]
    fn flood_opens_zero_region_and_its_border() {
        let mut grid = grid((4, 4), &[(3, 3)]);

        let count = flood_reveal(&mut grid, (0, 0));

        assert_eq!(count, 15);
        assert!(!grid[(3, 3)].is_revealed());
        assert_eq!(grid[(2, 2)].adjacent_mines, 1);
        assert!(grid[(2, 2)].is_revealed());
    }

    #[test]
    fn flood_stops_at_numbered_cells() {
        let mut grid = grid((4, 4), &[(0, 2), (1, 2), (2, 2), (3, 2)]);

        let count = flood_reveal(&mut grid, (0, 0));

        assert_eq!(count, 8);
        assert!((0..4).all(|row| grid[(row, 0)].is_revealed() && grid[(row, 1)].is_revealed()));
        assert!((0..4).all(|row| !grid[(row, 2)].is_revealed() && !grid[(row, 3)].is_revealed()));
    }

    #[test]
    fn flood_from_number_opens_one_cell() {
        let mut grid = grid((4, 4), &[(0, 0)]);

        assert_eq!(flood_reveal(&mut grid, (1, 1)), 1);
        assert_eq!(revealed(&grid), 1);
    }

    #[test]
    fn flood_skips_flags_and_clears_question_marks() {
        let mut grid = grid((4, 4), &[(3, 3)]);
        grid[(0, 3)].mark_flagged();
        grid[(1, 1)].flags.insert(CellFlags::QUESTIONED);

        let count = flood_reveal(&mut grid, (0, 0));

        assert_eq!(count, 14);
        assert!(grid[(0, 3)].is_flagged());
        assert!(!grid[(0, 3)].is_revealed());
        assert!(grid[(1, 1)].is_revealed());
        assert!(!grid[(1, 1)].is_questioned());
    }

    #[test]
    fn expose_marks_only_mines() {
        let mut grid = grid((4, 4), &[(0, 0), (2, 2)]);
        grid[(0, 0)].mark_flagged();
        grid[(1, 3)].mark_flagged();

        expose_all_mines(&mut grid);

        assert!(grid[(0, 0)].is_revealed());
        assert!(!grid[(0, 0)].is_flagged());
        assert!(grid[(2, 2)].is_revealed());
        assert!(grid[(1, 3)].is_flagged());
        assert_eq!(revealed(&grid), 2);
    }

    #[test]
    fn reveal_mine_explodes_and_exposes() {
        let mut grid = grid((4, 4), &[(0, 0), (3, 3)]);

        let outcome = reveal_cell(&mut grid, (0, 0));

        assert_eq!(outcome, RevealOutcome::HitMine { revealed: 0 });
        assert!(grid[(0, 0)].is_exploded());
        assert!(!grid[(3, 3)].is_exploded());
        assert!(grid[(3, 3)].is_revealed());
    }

    #[test]
    fn reveal_flagged_cell_is_no_change() {
        let mut grid = grid((4, 4), &[(0, 0)]);
        grid[(0, 0)].mark_flagged();
        let before = grid.clone();

        assert_eq!(reveal_cell(&mut grid, (0, 0)), RevealOutcome::NoChange);
        assert_eq!(grid, before);
    }

    #[test]
    fn chord_requires_matching_flags() {
        let mut grid = grid((5, 5), &[(1, 1), (1, 3)]);
        flood_reveal(&mut grid, (2, 2));
        grid[(1, 1)].mark_flagged();
        let before = grid.clone();

        assert!(!can_chord_at(&grid, (2, 2)));
        assert_eq!(chord_reveal(&mut grid, (2, 2)), RevealOutcome::NoChange);
        assert_eq!(grid, before);
    }

    #[test]
    fn chord_opens_unflagged_neighbors() {
        let mut grid = grid((5, 5), &[(1, 1), (1, 3)]);
        flood_reveal(&mut grid, (2, 2));
        grid[(1, 1)].mark_flagged();
        grid[(1, 3)].mark_flagged();

        let outcome = chord_reveal(&mut grid, (2, 2));

        assert!(matches!(outcome, RevealOutcome::Revealed(count) if count >= 6));
        for pos in grid.neighbors((2, 2)) {
            let cell = grid[pos];
            assert!(cell.is_flagged() || cell.is_revealed(), "{:?} still hidden", pos);
        }
        assert!(!grid.cells().any(|cell| cell.is_exploded()));
    }

    #[test]
    fn chord_with_wrong_flag_explodes_every_opened_mine() {
        let mut grid = grid((5, 5), &[(1, 1), (1, 3)]);
        flood_reveal(&mut grid, (2, 2));
        grid[(2, 1)].mark_flagged();
        grid[(2, 3)].mark_flagged();

        let outcome = chord_reveal(&mut grid, (2, 2));

        assert!(matches!(outcome, RevealOutcome::HitMine { .. }));
        assert!(grid[(1, 1)].is_exploded());
        assert!(grid[(1, 3)].is_exploded());
        assert!(grid[(1, 1)].is_revealed());
        assert!(!grid[(2, 1)].is_exploded());
    }

    #[test]
    fn chord_on_hidden_or_zero_cells_is_no_change() {
        let mut grid = grid((4, 4), &[(0, 0)]);

        assert_eq!(chord_reveal(&mut grid, (1, 1)), RevealOutcome::NoChange);

        flood_reveal(&mut grid, (3, 3));
        assert_eq!(chord_reveal(&mut grid, (3, 3)), RevealOutcome::NoChange);
    }

    #[test]
    fn hint_candidates_skip_mines_flags_and_revealed() {
        let mut grid = grid((4, 4), &[(0, 0)]);
        flood_reveal(&mut grid, (3, 3));
        grid[(0, 0)].mark_flagged();

        assert!(hint_candidates(&grid).is_empty());

        let mut grid = self::grid((4, 4), &[(0, 0)]);
        grid[(0, 1)].mark_flagged();
        let candidates = hint_candidates(&grid);

        assert_eq!(candidates.len(), 14);
        assert!(!candidates.contains(&(0, 0)));
        assert!(!candidates.contains(&(0, 1)));
    }

    #[test]
    fn auto_flag_marks_every_mine() {
        let mut grid = grid((4, 4), &[(0, 0), (2, 3)]);
        grid[(2, 3)].flags.insert(CellFlags::QUESTIONED);

        auto_flag_mines(&mut grid);

        assert!(grid[(0, 0)].is_flagged());
        assert!(grid[(2, 3)].is_flagged());
        assert!(!grid[(2, 3)].is_questioned());
        assert_eq!(grid.cells().filter(|cell| cell.is_flagged()).count(), 2);
    }
}
