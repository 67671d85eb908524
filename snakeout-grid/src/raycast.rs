use tinyvec::TinyVec;

use crate::cell::{Cell, Delta};
use crate::occupancy::Occupancy;

/// Candidate step order shared by the path search and the fill passes.
pub const STEP_DELTAS: [Delta; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// The up-to-four in-bounds orthogonal neighbors of a cell.
pub fn neighbors(cell: Cell, rows: i32, cols: i32) -> TinyVec<[Cell; 4]> {
    let mut out: TinyVec<[Cell; 4]> = TinyVec::new();
    for delta in STEP_DELTAS {
        let n = cell.step(delta);
        if n.row >= 0 && n.row < rows && n.col >= 0 && n.col < cols {
            out.push(n);
        }
    }
    out
}

/// Walk from `origin + delta` in steps of `delta` and report whether the ray
/// falls off the grid edge without hitting a blocker.
///
/// Obstacles and placed snakes block; void cells are traversed. `extra` adds
/// transient blockers, used to forbid a growing path's own body along the
/// ray of its head.
pub fn ray_exits(occ: &Occupancy, origin: Cell, delta: Delta, extra: &[Cell]) -> bool {
    if delta == (0, 0) {
        return false;
    }
    let mut cur = origin.step(delta);
    while occ.in_bounds(cur) {
        if occ.blocks_ray(cur) || extra.contains(&cur) {
            return false;
        }
        cur = cur.step(delta);
    }
    true
}

/// Whether any of the four directions gives the cell a clear shot off the
/// grid. The fill passes use this to put likely-solvable starts first.
pub fn has_any_exit(occ: &Occupancy, cell: Cell) -> bool {
    STEP_DELTAS
        .iter()
        .any(|&delta| ray_exits(occ, cell, delta, &[]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn neighbors_clip_at_the_boundary() {
        let ns = neighbors(Cell::new(0, 0), 3, 3);
        assert_eq!(ns.len(), 2);
        assert!(ns.contains(&Cell::new(0, 1)));
        assert!(ns.contains(&Cell::new(1, 0)));
    }

    #[test]
    fn ray_traverses_void_to_the_edge() {
        // Playable 3x3 island centered in a 10x10 grid of void.
        let mut mask = vec![vec![false; 10]; 10];
        for row in 4..7 {
            for col in 4..7 {
                mask[row][col] = true;
            }
        }
        let board = Board::from_parts(10, 10, Some(&mask), &[]).unwrap();
        let occ = Occupancy::for_board(&board);
        assert!(ray_exits(&occ, Cell::new(5, 5), (0, 1), &[]));
    }

    #[test]
    fn ray_is_blocked_by_a_snake_inside_void() {
        let mut mask = vec![vec![false; 10]; 10];
        for row in 4..7 {
            for col in 4..7 {
                mask[row][col] = true;
            }
        }
        let board = Board::from_parts(10, 10, Some(&mask), &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        occ.occupy(Cell::new(5, 6));
        assert!(!ray_exits(&occ, Cell::new(5, 5), (0, 1), &[]));
        // Other directions cross pure void and still exit.
        assert!(ray_exits(&occ, Cell::new(5, 5), (0, -1), &[]));
    }

    #[test]
    fn extra_blockers_stop_the_ray() {
        let board = Board::from_parts(5, 5, None, &[]).unwrap();
        let occ = Occupancy::for_board(&board);
        assert!(ray_exits(&occ, Cell::new(2, 2), (0, 1), &[]));
        assert!(!ray_exits(&occ, Cell::new(2, 2), (0, 1), &[Cell::new(2, 4)]));
    }

    #[test]
    fn zero_delta_never_exits() {
        let board = Board::from_parts(2, 2, None, &[]).unwrap();
        let occ = Occupancy::for_board(&board);
        assert!(!ray_exits(&occ, Cell::new(0, 0), (0, 0), &[]));
    }

    #[test]
    fn any_exit_reports_boxed_in_cells() {
        let board = Board::from_parts(3, 3, None, &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        assert!(has_any_exit(&occ, Cell::new(1, 1)));
        for cell in [
            Cell::new(0, 1),
            Cell::new(2, 1),
            Cell::new(1, 0),
            Cell::new(1, 2),
        ] {
            occ.occupy(cell);
        }
        assert!(!has_any_exit(&occ, Cell::new(1, 1)));
    }
}
