//! SmartDynamic: fill the deepest, most boxed-in cells first, guided by the
//! exit-depth BFS. Keeps a candidate cache between placements and filters
//! stale entries lazily instead of recomputing the map every time.

use std::cmp::Reverse;
use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tinyvec::TinyVec;

use snakeout_grid::{Cell, DistanceMap, Occupancy};

use super::{order_by_score, StrategyConfig};

/// Candidates handed to the placement loop per request.
const BATCH: usize = 50;
/// Upper bound on cached candidates per recompute.
const CACHE_CAPACITY: usize = 1000;

pub fn pick_starts(
    cfg: &StrategyConfig,
    cache: &mut VecDeque<Cell>,
    occ: &Occupancy,
    rng: &mut ChaCha8Rng,
) -> Vec<Cell> {
    // Drain the cache first, dropping entries occupied since the last
    // recompute.
    let mut batch = Vec::with_capacity(BATCH);
    while let Some(cell) = cache.pop_front() {
        if occ.is_free(cell) {
            batch.push(cell);
            if batch.len() >= BATCH {
                return batch;
            }
        }
    }

    // Cache exhausted: recompute the depth ordering and refill.
    let map = DistanceMap::compute(occ);
    let mut candidates = occ.free_cells();
    candidates.sort_by_key(|&cell| (Reverse(map.depth(cell)), occ.free_neighbor_count(cell)));

    let pool_len = ((candidates.len() as f64) * cfg.pool_fraction).ceil() as usize;
    let pool_len = pool_len
        .max(BATCH)
        .min(CACHE_CAPACITY)
        .min(candidates.len());
    candidates.truncate(pool_len);
    candidates.shuffle(rng);

    for cell in candidates {
        if batch.len() < BATCH {
            batch.push(cell);
        } else {
            cache.push_back(cell);
        }
    }
    batch
}

/// Prefer constrained neighbors: fewer free neighbors packs snakes tightly.
pub fn order(
    cfg: &StrategyConfig,
    occ: &Occupancy,
    nbs: &mut TinyVec<[Cell; 4]>,
    rng: &mut ChaCha8Rng,
) {
    let w = cfg.depth_priority;
    order_by_score(nbs, |n| {
        occ.free_neighbor_count(n) as f64 * w + rng.gen::<f64>() * (1.0 - w)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use snakeout_grid::Board;

    #[test]
    fn first_batch_comes_from_the_deep_pool() {
        let board = Board::from_parts(5, 5, None, &[]).unwrap();
        let occ = Occupancy::for_board(&board);
        let map = DistanceMap::compute(&occ);
        let cfg = StrategyConfig::default();
        let mut cache = VecDeque::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let batch = pick_starts(&cfg, &mut cache, &occ, &mut rng);
        assert!(!batch.is_empty());
        // 25 candidates, pool clamped to min(BATCH, 25): the whole grid is
        // returned, but the deepest cells must be present.
        assert!(batch.contains(&Cell::new(2, 2)));
        assert!(batch.iter().all(|&c| map.depth(c) >= 1));
    }

    #[test]
    fn stale_cache_entries_are_filtered() {
        let board = Board::from_parts(6, 6, None, &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        let cfg = StrategyConfig::default();
        let mut cache: VecDeque<Cell> = VecDeque::new();
        cache.push_back(Cell::new(0, 0));
        cache.push_back(Cell::new(0, 1));
        occ.occupy(Cell::new(0, 0));

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let batch = pick_starts(&cfg, &mut cache, &occ, &mut rng);
        assert!(!batch.contains(&Cell::new(0, 0)));
    }

    #[test]
    fn neighbor_order_puts_constrained_cells_first() {
        let board = Board::from_parts(5, 5, None, &[]).unwrap();
        let mut occ = Occupancy::for_board(&board);
        // Box in (0, 1) so it has a single free neighbor.
        occ.occupy(Cell::new(0, 2));
        occ.occupy(Cell::new(1, 1));

        let cfg = StrategyConfig {
            depth_priority: 1.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut nbs: TinyVec<[Cell; 4]> = TinyVec::new();
        nbs.push(Cell::new(2, 2));
        nbs.push(Cell::new(0, 1));
        order(&cfg, &occ, &mut nbs, &mut rng);
        assert_eq!(nbs[0], Cell::new(0, 1));
    }
}
