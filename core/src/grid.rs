use core::ops::{Index, IndexMut};

use alloc::vec::Vec;
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cells that mine placement must leave empty.
pub type ProtectedCells = HashSet<Coord2>;

/// Rectangular snapshot of the board.
///
/// Cloning produces an independent deep copy, so a mutated clone never alters
/// the snapshot it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Grid of default cells with no mines.
    pub fn empty(rows: Coord, columns: Coord) -> Self {
        let cells = Array2::from_shape_fn((usize::from(rows), usize::from(columns)), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });
        Self { cells }
    }

    /// Annotated grid with mines at exactly `mine_coords`.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut grid = Self::empty(size.0, size.1);

        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid[coords].set_mine(true);
        }

        grid.annotate();
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn columns(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, columns) = self.size();
        mult(rows, columns)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        let (rows, columns) = self.size();
        row < rows && col < columns
    }

    pub fn cell(&self, coords: Coord2) -> &Cell {
        &self[coords]
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = ndarray::ArrayView1<'_, Cell>> {
        self.cells.rows().into_iter()
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        neighbors(coords, self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells().filter(|cell| cell.is_mine()).count() as CellCount
    }

    pub fn has_mines(&self) -> bool {
        self.cells().any(Cell::is_mine)
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .into_iter()
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    /// Coordinates of every cell matching `predicate`, row-major.
    pub(crate) fn coords_where(&self, predicate: impl Fn(&Cell) -> bool) -> Vec<Coord2> {
        self.cells()
            .filter(|&cell| predicate(cell))
            .map(Cell::coords)
            .collect()
    }

    /// Places `mine_count` mines uniformly among cells that are neither mined
    /// already nor `protected`.
    ///
    /// Requests beyond the number of free cells are clamped.
    pub fn scatter_mines(
        &mut self,
        mine_count: CellCount,
        protected: &ProtectedCells,
        rng: &mut impl RandomSource,
    ) {
        let mut free = self.coords_where(|cell| {
            !cell.is_mine() && !protected.contains(&cell.coords())
        });

        let requested = usize::from(mine_count);
        if requested > free.len() {
            log::warn!(
                "Grid too full, requested {} mines but only {} free cells",
                requested,
                free.len()
            );
        }

        for _ in 0..requested.min(free.len()) {
            let place = free.swap_remove(rng.next_int(free.len()));
            self[place].set_mine(true);
        }
    }

    /// Recomputes `adjacent_mines` for every non-mine cell from the current mine placement.
    pub fn annotate(&mut self) {
        let size = self.size();
        let mines = self.cells.map(Cell::is_mine);

        for cell in self.cells.iter_mut() {
            if cell.is_mine() {
                continue;
            }
            cell.adjacent_mines = neighbors(cell.coords(), size)
                .into_iter()
                .filter(|&pos| mines[pos.to_nd_index()])
                .count() as u8;
        }
    }

    #[track_caller]
    pub(crate) fn assert_in_bounds(&self, coords: Coord2) {
        assert!(
            self.contains(coords),
            "coordinates {:?} outside of {:?} grid",
            coords,
            self.size()
        );
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty(0, 0)
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
