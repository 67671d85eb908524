//! RandomAdaptive: shuffled starts, shuffled neighbors, strict solvability.
//! The fallback strategy; its value comes from the default multi-pass fill.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use snakeout_grid::{Cell, Occupancy};

use super::{edge_distance, StrategyConfig};

pub fn pick_starts(cfg: &StrategyConfig, occ: &Occupancy, rng: &mut ChaCha8Rng) -> Vec<Cell> {
    let rows = occ.rows();
    let cols = occ.cols();
    let mut pool = occ.free_cells();

    if cfg.avoid_corners {
        let corners = [
            Cell::new(0, 0),
            Cell::new(0, cols - 1),
            Cell::new(rows - 1, 0),
            Cell::new(rows - 1, cols - 1),
        ];
        pool.retain(|cell| !corners.contains(cell));
    }

    if cfg.prefer_edges {
        pool.sort_by_key(|&cell| edge_distance(cell, rows, cols));
        if pool.len() > 10 {
            pool[..10].shuffle(rng);
        }
    } else {
        pool.shuffle(rng);
    }

    pool
}
