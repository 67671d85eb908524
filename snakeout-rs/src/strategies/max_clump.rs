//! MaxClump: start in the biggest open areas and keep expanding into them,
//! producing long snakes that span voids.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tinyvec::TinyVec;

use snakeout_grid::{Cell, Occupancy};

use super::{edge_distance, order_by_score, StrategyConfig};

pub fn pick_starts(cfg: &StrategyConfig, occ: &Occupancy, rng: &mut ChaCha8Rng) -> Vec<Cell> {
    let rows = occ.rows();
    let cols = occ.cols();

    let mut scored: Vec<(usize, Cell)> = Vec::new();
    for cell in occ.free_cells() {
        let free_n = occ.free_neighbor_count(cell);
        if free_n < cfg.min_area_size {
            continue;
        }
        if cfg.avoid_edges && edge_distance(cell, rows, cols) <= 1 {
            continue;
        }
        scored.push((free_n, cell));
    }
    scored.sort_by_key(|&(free_n, _)| Reverse(free_n));

    let limit = ((scored.len() as f64) * 0.15) as usize;
    let limit = limit.max(5).min(scored.len());
    let mut pool: Vec<Cell> = scored.into_iter().take(limit).map(|(_, c)| c).collect();
    pool.shuffle(rng);
    pool
}

/// Prefer neighbors with more free neighbors: stay in the open.
pub fn order(
    cfg: &StrategyConfig,
    occ: &Occupancy,
    path: &[Cell],
    nbs: &mut TinyVec<[Cell; 4]>,
    rng: &mut ChaCha8Rng,
) {
    let rate = cfg.expansion_rate;
    order_by_score(nbs, |n| {
        -(occ.free_neighbor_count_excluding(n, path) as f64) * rate
            + rng.gen::<f64>() * (1.0 - rate)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use snakeout_grid::Board;

    #[test]
    fn starts_require_open_area() {
        let board = Board::from_parts(8, 8, None, &[]).unwrap();
        let occ = Occupancy::for_board(&board);
        let cfg = StrategyConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let pool = pick_starts(&cfg, &occ, &mut rng);
        // min_area_size 4 keeps only cells with all four neighbors free.
        assert!(!pool.is_empty());
        for cell in &pool {
            assert_eq!(occ.free_neighbor_count(*cell), 4);
        }
    }

    #[test]
    fn expansion_prefers_the_open_neighbor() {
        let board = Board::from_parts(8, 8, None, &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        occ.occupy(Cell::new(0, 0));
        occ.occupy(Cell::new(1, 1));
        let cfg = StrategyConfig {
            expansion_rate: 1.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut nbs: TinyVec<[Cell; 4]> = TinyVec::new();
        nbs.push(Cell::new(0, 1)); // boxed in by the two snake cells
        nbs.push(Cell::new(4, 4)); // wide open
        order(&cfg, &occ, &[], &mut nbs, &mut rng);
        assert_eq!(nbs[0], Cell::new(4, 4));
    }
}
