//! Solvability simulation: repeatedly remove every snake whose head can
//! shoot straight off the grid, until nothing moves. Removal is batched per
//! step, so the step count is the depth of the dependency chain, not the
//! snake count.

use rustc_hash::FxHashMap;

use snakeout_grid::{Cell, Delta};

/// Result of one solvability simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_solvable: bool,
    pub remained_count: usize,
    pub total_snakes: usize,
    pub steps: usize,
    /// Mean over evaluated steps of `stuck / active` before that step's
    /// removals; feeds the difficulty scorer.
    pub avg_stuck_ratio: f64,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Snake,
    Obstacle,
}

struct ActiveSnake {
    id: usize,
    cells: Vec<Cell>,
    head: Cell,
    facing: Delta,
}

/// Simulate removal over raw paths plus static blocker cells. Paths shorter
/// than two cells have no facing direction and are skipped, as the wire
/// format allows callers to send them.
pub fn validate_paths<'a>(
    paths: impl IntoIterator<Item = &'a [Cell]>,
    obstacle_cells: impl IntoIterator<Item = Cell>,
    rows: i32,
    cols: i32,
) -> ValidationReport {
    let mut grid: FxHashMap<Cell, Tag> = FxHashMap::default();
    let mut active: Vec<ActiveSnake> = Vec::new();

    for (id, path) in paths.into_iter().enumerate() {
        if path.len() < 2 {
            continue;
        }
        let head = path[path.len() - 1];
        let neck = path[path.len() - 2];
        active.push(ActiveSnake {
            id,
            cells: path.to_vec(),
            head,
            facing: head.delta_from(neck),
        });
        for &cell in path {
            grid.insert(cell, Tag::Snake);
        }
    }
    for cell in obstacle_cells {
        grid.insert(cell, Tag::Obstacle);
    }

    let total_snakes = active.len();
    let mut logs = Vec::new();
    let mut steps = 0usize;
    let mut stuck_ratios: Vec<f64> = Vec::new();

    loop {
        if active.is_empty() {
            break;
        }

        let movable: Vec<usize> = active
            .iter()
            .enumerate()
            .filter(|(_, snake)| {
                let mut cur = snake.head.step(snake.facing);
                loop {
                    if cur.row < 0 || cur.row >= rows || cur.col < 0 || cur.col >= cols {
                        return true;
                    }
                    if grid.contains_key(&cur) {
                        return false;
                    }
                    cur = cur.step(snake.facing);
                }
            })
            .map(|(idx, _)| idx)
            .collect();

        stuck_ratios.push((active.len() - movable.len()) as f64 / active.len() as f64);

        if movable.is_empty() {
            break;
        }
        steps += 1;

        let mut removed_ids = Vec::with_capacity(movable.len());
        for &idx in movable.iter().rev() {
            let snake = active.remove(idx);
            removed_ids.push(snake.id);
            for cell in snake.cells {
                if grid.get(&cell) == Some(&Tag::Snake) {
                    grid.remove(&cell);
                }
            }
        }
        logs.push(format!(
            "Step {steps}: removed {} snakes (IDs: {removed_ids:?})",
            removed_ids.len()
        ));
    }

    let is_solvable = active.is_empty();
    if is_solvable {
        logs.push(format!(
            "SUCCESS: All {total_snakes} snakes solved in {steps} steps."
        ));
    } else {
        logs.push(format!("FAILED: {} snakes stuck.", active.len()));
    }

    let avg_stuck_ratio = if stuck_ratios.is_empty() {
        0.0
    } else {
        stuck_ratios.iter().sum::<f64>() / stuck_ratios.len() as f64
    };

    ValidationReport {
        is_solvable,
        remained_count: active.len(),
        total_snakes,
        steps,
        avg_stuck_ratio,
        logs,
    }
}
