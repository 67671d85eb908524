//! EdgeHugger: start near the border, give corners a strong head start, and
//! keep extending along cells that stay close to an edge.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tinyvec::TinyVec;

use snakeout_grid::{Cell, Occupancy};

use super::{edge_distance, order_by_score, StrategyConfig};

const CORNER_BONUS: i32 = -10;

pub fn pick_starts(cfg: &StrategyConfig, occ: &Occupancy, rng: &mut ChaCha8Rng) -> Vec<Cell> {
    let rows = occ.rows();
    let cols = occ.cols();
    let max_dist = cfg.edge_distance_max;

    let mut scored: Vec<(i32, Cell)> = Vec::new();
    for cell in occ.free_cells() {
        let dist = edge_distance(cell, rows, cols);
        if dist > max_dist {
            continue;
        }
        let near_row_edge = cell.row <= max_dist || cell.row >= rows - 1 - max_dist;
        let near_col_edge = cell.col <= max_dist || cell.col >= cols - 1 - max_dist;
        let mut score = dist;
        if cfg.corner_priority && near_row_edge && near_col_edge {
            score += CORNER_BONUS;
        }
        scored.push((score, cell));
    }
    scored.sort_by_key(|&(score, _)| score);

    let limit = ((scored.len() as f64) * 0.3) as usize;
    let limit = limit.max(5).min(scored.len());
    let mut pool: Vec<Cell> = scored.into_iter().take(limit).map(|(_, c)| c).collect();
    pool.shuffle(rng);
    pool
}

/// Prefer neighbors close to an edge, so paths trace along walls.
pub fn order(
    cfg: &StrategyConfig,
    occ: &Occupancy,
    nbs: &mut TinyVec<[Cell; 4]>,
    rng: &mut ChaCha8Rng,
) {
    let rows = occ.rows();
    let cols = occ.cols();
    let strength = cfg.wall_follow_strength;
    order_by_score(nbs, |n| {
        edge_distance(n, rows, cols) as f64 * strength + rng.gen::<f64>() * (1.0 - strength)
    });
}
