//! SpiralFill: snakes wrap around themselves by strongly preferring the next
//! direction in a cyclic order (clockwise or counter-clockwise), then going
//! straight, and only reluctantly unwinding.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tinyvec::TinyVec;

use snakeout_grid::{Cell, Delta, Occupancy};

use super::{order_by_score, SpiralDirection, SpiralStart, StrategyConfig};

/// Right, down, left, up.
pub const CLOCKWISE: [Delta; 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
/// Right, up, left, down.
pub const COUNTER_CLOCKWISE: [Delta; 4] = [(0, 1), (-1, 0), (0, -1), (1, 0)];

/// Resolve the `random` options once per generate call.
pub fn resolve(cfg: &StrategyConfig, rng: &mut ChaCha8Rng) -> ([Delta; 4], SpiralStart) {
    let cycle = match cfg.spiral_direction {
        SpiralDirection::Clockwise => CLOCKWISE,
        SpiralDirection::CounterClockwise => COUNTER_CLOCKWISE,
        SpiralDirection::Random => {
            if rng.gen::<bool>() {
                CLOCKWISE
            } else {
                COUNTER_CLOCKWISE
            }
        }
    };
    let start = match cfg.spiral_start {
        SpiralStart::Random => {
            if rng.gen::<bool>() {
                SpiralStart::Center
            } else {
                SpiralStart::Corner
            }
        }
        fixed => fixed,
    };
    (cycle, start)
}

pub fn pick_starts(start_from: SpiralStart, occ: &Occupancy, rng: &mut ChaCha8Rng) -> Vec<Cell> {
    let rows = occ.rows();
    let cols = occ.cols();
    let corners = [
        Cell::new(0, 0),
        Cell::new(0, cols - 1),
        Cell::new(rows - 1, 0),
        Cell::new(rows - 1, cols - 1),
    ];
    let center = Cell::new(rows / 2, cols / 2);

    let manhattan = |a: Cell, b: Cell| (a.row - b.row).abs() + (a.col - b.col).abs();
    let mut scored: Vec<(i32, Cell)> = occ
        .free_cells()
        .into_iter()
        .map(|cell| {
            let dist = match start_from {
                SpiralStart::Corner => corners
                    .iter()
                    .map(|&corner| manhattan(cell, corner))
                    .min()
                    .unwrap_or(0),
                _ => manhattan(cell, center),
            };
            (dist, cell)
        })
        .collect();
    scored.sort_by_key(|&(dist, _)| dist);

    let limit = ((scored.len() as f64) * 0.15) as usize;
    let limit = limit.max(5).min(scored.len());
    let mut pool: Vec<Cell> = scored.into_iter().take(limit).map(|(_, c)| c).collect();
    pool.shuffle(rng);
    pool
}

/// Score candidates against the spiral cycle: turning with the cycle wins,
/// straight is second, turning against it is penalized, reversing is worst.
pub fn order(
    cycle: [Delta; 4],
    tightness: f64,
    path: &[Cell],
    nbs: &mut TinyVec<[Cell; 4]>,
    rng: &mut ChaCha8Rng,
) {
    let head = match path.last() {
        Some(&head) => head,
        None => return,
    };

    if path.len() < 2 {
        // No direction yet: kick off heading right.
        order_by_score(nbs, |n| {
            if n.col > head.col {
                -100.0
            } else {
                rng.gen::<f64>()
            }
        });
        return;
    }

    let prev = path[path.len() - 2];
    let last_dir = head.delta_from(prev);
    let dir_idx = cycle.iter().position(|&d| d == last_dir).unwrap_or(0);
    let turn_dir = cycle[(dir_idx + 1) % 4];
    let opposite_dir = cycle[(dir_idx + 2) % 4];

    order_by_score(nbs, |n| {
        let new_dir = n.delta_from(head);
        let noise = rng.gen::<f64>() * (1.0 - tightness);
        if new_dir == turn_dir {
            -100.0 * tightness + noise
        } else if new_dir == last_dir {
            -50.0 * tightness + noise
        } else if new_dir == opposite_dir {
            100.0 + noise
        } else {
            200.0 + noise
        }
    });
}
