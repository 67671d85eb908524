//! Fill-gaps mode: add snakes to an existing level without breaking it.
//! Candidate paths are grown without the per-placement exit raycast; instead
//! every candidate is gated on a full solvability re-simulation of the whole
//! level, so an accepted addition can never make the level unsolvable.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use snakeout_grid::{Board, Cell};

use crate::driver::Constraints;
use crate::layout::Layout;
use crate::pathfinder::{
    find_unchecked_path, shuffled_order, SearchLimits, DEFAULT_STOP_CHANCE, UNCHECKED_MAX_NODES,
};
use crate::snake::Snake;
use crate::validator::{validate_paths, ValidationReport};

const MAX_SNAKES_TO_ADD: usize = 200;
const MAX_ATTEMPTS_PER_SNAKE: usize = 50;

/// Result of one fill-gaps run.
#[derive(Debug)]
pub struct FillOutcome {
    pub snakes: Vec<Snake>,
    pub logs: Vec<String>,
    pub report: ValidationReport,
    pub snakes_added: usize,
}

pub fn fill_gaps(
    board: &Board,
    existing: Vec<Snake>,
    constraints: &Constraints,
    palette_len: usize,
    rng: &mut ChaCha8Rng,
) -> FillOutcome {
    let mut layout = Layout::new(board, palette_len);
    for snake in existing {
        layout.adopt(snake);
    }

    let original_count = layout.snakes.len();
    layout.log(format!("Existing snakes: {original_count}"));
    layout.log(format!("Remaining cells: {}", layout.occ.free_count()));
    layout.log(format!(
        "Constraints: len={}-{}, bends={}-{}",
        constraints.min_len, constraints.max_len, constraints.min_bends, constraints.max_bends
    ));

    let limits = SearchLimits {
        min_len: constraints.min_len,
        max_len: constraints.max_len,
        min_bends: constraints.min_bends,
        max_bends: constraints.max_bends,
        max_nodes: UNCHECKED_MAX_NODES,
        stop_chance: DEFAULT_STOP_CHANCE,
    };

    let mut snakes_added = 0usize;
    while snakes_added < MAX_SNAKES_TO_ADD {
        let mut remaining = layout.occ.free_cells();
        if remaining.len() < constraints.min_len {
            layout.log(format!(
                "Not enough cells remaining ({} < {})",
                remaining.len(),
                constraints.min_len
            ));
            break;
        }

        let mut found = false;
        for _ in 0..MAX_ATTEMPTS_PER_SNAKE {
            remaining.shuffle(rng);
            let start = remaining[0];

            let Some(path) =
                find_unchecked_path(&layout.occ, start, &limits, rng, &mut shuffled_order)
            else {
                continue;
            };

            if level_stays_solvable(&layout, &path, board) {
                let color = layout.pick_color(rng);
                layout.place(path, color);
                snakes_added += 1;
                found = true;
                break;
            }
        }

        if !found {
            layout.log(format!(
                "No more valid snakes found after {MAX_ATTEMPTS_PER_SNAKE} attempts"
            ));
            break;
        }
    }

    layout.log(format!("Smart Fill Complete: Added {snakes_added} snakes"));

    let report = validate_paths(
        layout.snakes.iter().map(|s| s.path.as_slice()),
        board.obstacles().keys().copied(),
        board.rows(),
        board.cols(),
    );

    FillOutcome {
        snakes: layout.snakes,
        logs: layout.logs,
        report,
        snakes_added,
    }
}

fn level_stays_solvable(layout: &Layout, candidate: &[Cell], board: &Board) -> bool {
    let paths = layout
        .snakes
        .iter()
        .map(|s| s.path.as_slice())
        .chain(std::iter::once(candidate));
    validate_paths(
        paths,
        board.obstacles().keys().copied(),
        board.rows(),
        board.cols(),
    )
    .is_solvable
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn cells(points: &[(i32, i32)]) -> Vec<Cell> {
        points.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    fn constraints() -> Constraints {
        Constraints {
            arrow_count: 0,
            min_len: 2,
            max_len: 4,
            min_bends: 0,
            max_bends: 2,
        }
    }

    #[test]
    fn filling_preserves_solvability() {
        let board = Board::from_parts(7, 7, None, &[]).unwrap();
        let existing = vec![Snake::new(cells(&[(3, 3), (3, 4)]), Some(0))];
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        let outcome = fill_gaps(&board, existing, &constraints(), 1, &mut rng);
        assert!(outcome.report.is_solvable);
        assert_eq!(outcome.report.remained_count, 0);
        assert!(outcome.snakes_added > 0, "an open 7x7 board must accept snakes");
        assert_eq!(outcome.snakes.len(), 1 + outcome.snakes_added);
    }

    #[test]
    fn full_board_adds_nothing() {
        let mask = vec![vec![true, true]];
        let board = Board::from_parts(1, 2, Some(&mask), &[]).unwrap();
        let existing = vec![Snake::new(cells(&[(0, 0), (0, 1)]), None)];
        let mut rng = ChaCha8Rng::seed_from_u64(52);
        let outcome = fill_gaps(&board, existing, &constraints(), 0, &mut rng);
        assert_eq!(outcome.snakes_added, 0);
        assert!(outcome.report.is_solvable);
        assert!(outcome
            .logs
            .iter()
            .any(|l| l.starts_with("Not enough cells remaining")));
    }

    #[test]
    fn unsolvable_input_is_never_made_worse() {
        // Two head-to-head snakes: stuck before filling, and the fill only
        // adds snakes that keep whatever solvability the level has.
        let board = Board::from_parts(1, 4, None, &[]).unwrap();
        let existing = vec![
            Snake::new(cells(&[(0, 0), (0, 1)]), None),
            Snake::new(cells(&[(0, 3), (0, 2)]), None),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(53);
        let outcome = fill_gaps(&board, existing, &constraints(), 0, &mut rng);
        assert_eq!(outcome.snakes_added, 0);
        assert!(!outcome.report.is_solvable);
        assert_eq!(outcome.report.remained_count, 2);
    }
}
