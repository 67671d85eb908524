use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::cell::Cell;
use crate::raycast::neighbors;

/// What currently sits on a cell, from the point of view of path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Outside the playable mask but empty. Rays pass through, snakes do not.
    Void,
    Free,
    Obstacle,
    Snake,
}

/// The mutable view of one generation attempt: a dense per-cell state grid
/// plus a free-cell set, kept in sync. The dense grid answers raycast and
/// neighbor queries in O(1); the set answers "how much is left".
#[derive(Debug, Clone)]
pub struct Occupancy {
    rows: i32,
    cols: i32,
    states: Vec<CellState>,
    free: FxHashSet<Cell>,
}

impl Occupancy {
    pub fn for_board(board: &Board) -> Occupancy {
        let rows = board.rows();
        let cols = board.cols();
        let mut states = Vec::with_capacity((rows * cols) as usize);
        let mut free = FxHashSet::default();
        for row in 0..rows {
            for col in 0..cols {
                let cell = Cell::new(row, col);
                let state = if board.is_obstacle(cell) {
                    CellState::Obstacle
                } else if board.is_playable(cell) {
                    free.insert(cell);
                    CellState::Free
                } else {
                    CellState::Void
                };
                states.push(state);
            }
        }
        Occupancy {
            rows,
            cols,
            states,
            free,
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    pub fn state(&self, cell: Cell) -> CellState {
        if !self.in_bounds(cell) {
            return CellState::Void;
        }
        self.states[(cell.row * self.cols + cell.col) as usize]
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.state(cell) == CellState::Free
    }

    /// Whether a ray stops on this cell. Voids are traversed.
    pub fn blocks_ray(&self, cell: Cell) -> bool {
        matches!(self.state(cell), CellState::Obstacle | CellState::Snake)
    }

    /// Mark a placed snake cell. The cell must currently be free; anything
    /// else means two snakes were laid on top of each other.
    pub fn occupy(&mut self, cell: Cell) {
        assert!(
            self.is_free(cell),
            "cell {cell} occupied twice during generation"
        );
        self.states[(cell.row * self.cols + cell.col) as usize] = CellState::Snake;
        self.free.remove(&cell);
    }

    pub fn occupy_path(&mut self, path: &[Cell]) {
        for &cell in path {
            self.occupy(cell);
        }
    }

    /// Mark a cell as snake without the freshness assertion. Caller-supplied
    /// levels (the fill-gaps entry point) are adopted as-is, overlaps and
    /// all; out-of-bounds cells are ignored.
    pub fn block(&mut self, cell: Cell) {
        if !self.in_bounds(cell) {
            return;
        }
        let idx = (cell.row * self.cols + cell.col) as usize;
        if self.states[idx] != CellState::Obstacle {
            self.states[idx] = CellState::Snake;
        }
        self.free.remove(&cell);
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Remaining free cells in row-major order.
    pub fn free_cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.free.len());
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = Cell::new(row, col);
                if self.is_free(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    pub fn free_neighbor_count(&self, cell: Cell) -> usize {
        neighbors(cell, self.rows, self.cols)
            .iter()
            .filter(|&&n| self.is_free(n))
            .count()
    }

    /// Free-neighbor count with some cells (typically the path being grown)
    /// treated as occupied.
    pub fn free_neighbor_count_excluding(&self, cell: Cell, excluded: &[Cell]) -> usize {
        neighbors(cell, self.rows, self.cols)
            .iter()
            .filter(|&&n| self.is_free(n) && !excluded.contains(&n))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::ObstacleRecord;

    #[test]
    fn board_states_are_reflected() {
        let mask = vec![vec![true, false], vec![true, true]];
        let wall = ObstacleRecord {
            kind: "wall".to_owned(),
            row: Some(1),
            col: Some(0),
            ..Default::default()
        };
        let board = Board::from_parts(2, 2, Some(&mask), &[wall]).unwrap();
        let occ = Occupancy::for_board(&board);
        assert_eq!(occ.state(Cell::new(0, 0)), CellState::Free);
        assert_eq!(occ.state(Cell::new(0, 1)), CellState::Void);
        assert_eq!(occ.state(Cell::new(1, 0)), CellState::Obstacle);
        assert_eq!(occ.free_count(), 2);
    }

    #[test]
    fn occupy_keeps_both_views_in_sync() {
        let board = Board::from_parts(3, 3, None, &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        occ.occupy_path(&[Cell::new(1, 1), Cell::new(1, 2)]);
        assert_eq!(occ.free_count(), 7);
        assert_eq!(occ.state(Cell::new(1, 1)), CellState::Snake);
        assert!(!occ.free_cells().contains(&Cell::new(1, 2)));
        assert_eq!(occ.free_neighbor_count(Cell::new(0, 1)), 2);
    }

    #[test]
    #[should_panic(expected = "occupied twice")]
    fn double_occupy_is_an_invariant_violation() {
        let board = Board::from_parts(2, 2, None, &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        occ.occupy(Cell::new(0, 0));
        occ.occupy(Cell::new(0, 0));
    }
}
