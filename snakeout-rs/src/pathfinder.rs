//! The shared path search kernel: an iterative depth-first search that grows
//! one snake at a time under length and bend constraints.
//!
//! Strategies only differ in how they order candidate neighbors, so the
//! kernel takes that ordering as a closure and owns everything else: the
//! explicit stack, bend accounting, pruning, the exit raycast, and the node
//! budget.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use tinyvec::TinyVec;

use snakeout_grid::{neighbors, ray_exits, Cell, Occupancy};

/// Constraints and budgets for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub min_len: usize,
    pub max_len: usize,
    pub min_bends: usize,
    pub max_bends: usize,
    pub max_nodes: usize,
    /// Chance of accepting an exitable path before it reaches `max_len`.
    pub stop_chance: f64,
}

/// Node budget for a standard per-snake search.
pub const DEFAULT_MAX_NODES: usize = 500;
/// Node budget for the exit-free search used by the fill-gaps entry point.
pub const UNCHECKED_MAX_NODES: usize = 2000;
/// Probability of stopping growth once a path becomes acceptable.
pub const DEFAULT_STOP_CHANCE: f64 = 0.3;

/// Ordering hook: reorder the admissible neighbors of the path's head, best
/// candidate first.
pub type NeighborOrder<'a> =
    dyn FnMut(&[Cell], &mut TinyVec<[Cell; 4]>, &mut ChaCha8Rng) + 'a;

#[derive(Debug, Default)]
struct Frame {
    nbs: TinyVec<[Cell; 4]>,
    next: usize,
    bends: usize,
}

fn admissible(
    occ: &Occupancy,
    path: &[Cell],
    head: Cell,
    order: &mut NeighborOrder,
    rng: &mut ChaCha8Rng,
) -> TinyVec<[Cell; 4]> {
    let mut nbs: TinyVec<[Cell; 4]> = neighbors(head, occ.rows(), occ.cols())
        .into_iter()
        .filter(|&n| occ.is_free(n) && !path.contains(&n))
        .collect();
    order(path, &mut nbs, rng);
    nbs
}

fn bend_step(path: &[Cell], next: Cell) -> usize {
    if path.len() < 2 {
        return 0;
    }
    let head = path[path.len() - 1];
    let prev = path[path.len() - 2];
    usize::from(next.delta_from(head) != head.delta_from(prev))
}

/// Grow a snake from `start` whose head can raycast off the grid.
///
/// The exit test treats the path's own body as blockers, so a snake can
/// never point through itself. Returns `None` when the budget runs out, when
/// no admissible extension remains, or when the accepted path falls short of
/// `min_bends`.
pub fn find_exitable_path(
    occ: &Occupancy,
    start: Cell,
    limits: &SearchLimits,
    rng: &mut ChaCha8Rng,
    order: &mut NeighborOrder,
) -> Option<Vec<Cell>> {
    if !occ.is_free(start) {
        return None;
    }
    let mut path = vec![start];
    let mut stack = vec![Frame {
        nbs: admissible(occ, &path, start, order, rng),
        next: 0,
        bends: 0,
    }];
    let mut nodes = 1usize;

    loop {
        let (candidate, bends) = match stack.last_mut() {
            None => return None,
            Some(frame) => {
                let candidate = frame.nbs.get(frame.next).copied();
                if candidate.is_some() {
                    frame.next += 1;
                }
                (candidate, frame.bends)
            }
        };

        let Some(next) = candidate else {
            stack.pop();
            path.pop();
            continue;
        };

        let new_bends = bends + bend_step(&path, next);
        if new_bends > limits.max_bends {
            continue;
        }

        nodes += 1;
        if nodes > limits.max_nodes {
            return None;
        }
        let head = *path.last().expect("path never empties mid-search");
        path.push(next);

        if path.len() >= limits.min_len {
            let facing = next.delta_from(head);
            if ray_exits(occ, next, facing, &path) {
                let stop = path.len() >= limits.max_len || rng.gen::<f64>() < limits.stop_chance;
                if stop {
                    if new_bends >= limits.min_bends {
                        return Some(path);
                    }
                    return None;
                }
            }
        }

        if path.len() >= limits.max_len {
            path.pop();
            continue;
        }

        let nbs = admissible(occ, &path, next, order, rng);
        stack.push(Frame {
            nbs,
            next: 0,
            bends: new_bends,
        });
    }
}

/// Grow a snake without the exit raycast. The fill-gaps entry point uses
/// this and gates acceptance on a whole-level solvability re-check instead.
pub fn find_unchecked_path(
    occ: &Occupancy,
    start: Cell,
    limits: &SearchLimits,
    rng: &mut ChaCha8Rng,
    order: &mut NeighborOrder,
) -> Option<Vec<Cell>> {
    if !occ.is_free(start) {
        return None;
    }
    let mut path = vec![start];
    let mut stack = vec![Frame {
        nbs: admissible(occ, &path, start, order, rng),
        next: 0,
        bends: 0,
    }];
    let mut visited: FxHashSet<(Cell, usize, usize)> = FxHashSet::default();
    let mut nodes = 1usize;

    loop {
        let (candidate, bends) = match stack.last_mut() {
            None => return None,
            Some(frame) => {
                let candidate = frame.nbs.get(frame.next).copied();
                if candidate.is_some() {
                    frame.next += 1;
                }
                (candidate, frame.bends)
            }
        };

        let Some(next) = candidate else {
            stack.pop();
            path.pop();
            continue;
        };

        let new_bends = bends + bend_step(&path, next);
        if new_bends > limits.max_bends {
            continue;
        }

        nodes += 1;
        if nodes > limits.max_nodes {
            return None;
        }
        path.push(next);

        if !visited.insert((next, path.len(), new_bends)) {
            path.pop();
            continue;
        }

        if path.len() >= limits.min_len && new_bends >= limits.min_bends {
            let stop = path.len() >= limits.max_len || rng.gen::<f64>() < limits.stop_chance;
            if stop {
                return Some(path);
            }
        }

        if path.len() >= limits.max_len {
            path.pop();
            continue;
        }

        let nbs = admissible(occ, &path, next, order, rng);
        stack.push(Frame {
            nbs,
            next: 0,
            bends: new_bends,
        });
    }
}

/// Neighbor ordering that just shuffles.
pub fn shuffled_order(path: &[Cell], nbs: &mut TinyVec<[Cell; 4]>, rng: &mut ChaCha8Rng) {
    let _ = path;
    use rand::seq::SliceRandom;
    nbs.shuffle(rng);
}
