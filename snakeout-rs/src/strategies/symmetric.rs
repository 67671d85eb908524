//! Symmetrical: grow a snake and its mirror images in lock-step. Each step
//! picks a move for the primary path, reflects it onto every mirror, and
//! falls back to any legal extension when the reflected cell is taken. A
//! group is accepted only when every head can raycast off the grid with all
//! sibling bodies counted as blockers.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;

use snakeout_grid::{neighbors, ray_exits, Cell, Delta, Occupancy};

use crate::driver::Constraints;
use crate::layout::Layout;

use super::{sorted_by_score, SymmetryChoice};

/// Node budget for the joint search; lock-step branching needs more room
/// than the single-path kernel.
const JOINT_MAX_NODES: usize = 3000;
const JOINT_STOP_CHANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetryKind {
    Horizontal,
    Vertical,
    Both,
    Radial,
}

impl SymmetryKind {
    pub fn name(self) -> &'static str {
        match self {
            SymmetryKind::Horizontal => "horizontal",
            SymmetryKind::Vertical => "vertical",
            SymmetryKind::Both => "both",
            SymmetryKind::Radial => "radial",
        }
    }
}

pub fn resolve(choice: SymmetryChoice, rng: &mut ChaCha8Rng) -> SymmetryKind {
    match choice {
        SymmetryChoice::Horizontal => SymmetryKind::Horizontal,
        SymmetryChoice::Vertical => SymmetryKind::Vertical,
        SymmetryChoice::Both => SymmetryKind::Both,
        SymmetryChoice::Radial => SymmetryKind::Radial,
        SymmetryChoice::Random => {
            let all = [
                SymmetryKind::Horizontal,
                SymmetryKind::Vertical,
                SymmetryKind::Both,
                SymmetryKind::Radial,
            ];
            all[rng.gen_range(0..all.len())]
        }
    }
}

/// One linear reflection of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorTransform {
    FlipRows,
    FlipCols,
    FlipBoth,
}

impl MirrorTransform {
    pub fn apply(self, rows: i32, cols: i32, cell: Cell) -> Cell {
        match self {
            MirrorTransform::FlipRows => Cell::new(rows - 1 - cell.row, cell.col),
            MirrorTransform::FlipCols => Cell::new(cell.row, cols - 1 - cell.col),
            MirrorTransform::FlipBoth => Cell::new(rows - 1 - cell.row, cols - 1 - cell.col),
        }
    }

    pub fn apply_delta(self, delta: Delta) -> Delta {
        match self {
            MirrorTransform::FlipRows => (-delta.0, delta.1),
            MirrorTransform::FlipCols => (delta.0, -delta.1),
            MirrorTransform::FlipBoth => (-delta.0, -delta.1),
        }
    }
}

/// The reflections a symmetry kind demands, in a fixed order.
pub fn transforms(kind: SymmetryKind) -> Vec<MirrorTransform> {
    match kind {
        SymmetryKind::Horizontal => vec![MirrorTransform::FlipRows],
        SymmetryKind::Vertical => vec![MirrorTransform::FlipCols],
        SymmetryKind::Both => vec![
            MirrorTransform::FlipRows,
            MirrorTransform::FlipCols,
            MirrorTransform::FlipBoth,
        ],
        SymmetryKind::Radial => vec![MirrorTransform::FlipBoth],
    }
}

/// Mirror starts for a primary start, dropping reflections that coincide
/// with the start itself or with an earlier reflection (cells on a symmetry
/// axis mirror onto themselves).
fn distinct_mirrors(
    kind: SymmetryKind,
    rows: i32,
    cols: i32,
    start: Cell,
) -> Vec<(MirrorTransform, Cell)> {
    let mut out: Vec<(MirrorTransform, Cell)> = Vec::new();
    for t in transforms(kind) {
        let mirrored = t.apply(rows, cols, start);
        if mirrored == start || out.iter().any(|&(_, c)| c == mirrored) {
            continue;
        }
        out.push((t, mirrored));
    }
    out
}

/// Starts whose every mirror lands on a free playable cell.
pub fn pick_starts(kind: SymmetryKind, occ: &Occupancy, rng: &mut ChaCha8Rng) -> Vec<Cell> {
    let rows = occ.rows();
    let cols = occ.cols();
    let mut pool: Vec<Cell> = occ
        .free_cells()
        .into_iter()
        .filter(|&start| {
            distinct_mirrors(kind, rows, cols, start)
                .iter()
                .all(|&(_, m)| occ.is_free(m))
        })
        .collect();
    pool.shuffle(rng);
    pool
}

struct JointFrame {
    path_a: Vec<Cell>,
    mirrors: Vec<Vec<Cell>>,
    bends_a: usize,
    mirror_bends: Vec<usize>,
}

fn path_facing(path: &[Cell]) -> Delta {
    path[path.len() - 1].delta_from(path[path.len() - 2])
}

fn step_bends(path: &[Cell], next: Cell, bends: usize) -> usize {
    if path.len() < 2 {
        return bends;
    }
    let head = path[path.len() - 1];
    let prev = path[path.len() - 2];
    bends + usize::from(next.delta_from(head) != head.delta_from(prev))
}

/// Grow the primary path and its mirrors together. Returns the primary path
/// and one path per mirror, all mutually disjoint and all exit-raycastable
/// against each other.
pub fn joint_growth(
    occ: &Occupancy,
    start: Cell,
    mirror_starts: &[(MirrorTransform, Cell)],
    c: &Constraints,
    rng: &mut ChaCha8Rng,
) -> Option<(Vec<Cell>, Vec<Vec<Cell>>)> {
    let rows = occ.rows();
    let cols = occ.cols();
    let mirror_count = mirror_starts.len();

    let mut stack = vec![JointFrame {
        path_a: vec![start],
        mirrors: mirror_starts.iter().map(|&(_, m)| vec![m]).collect(),
        bends_a: 0,
        mirror_bends: vec![0; mirror_count],
    }];
    let mut nodes = 0usize;

    while let Some(frame) = stack.pop() {
        nodes += 1;
        if nodes > JOINT_MAX_NODES {
            break;
        }
        let JointFrame {
            path_a,
            mirrors,
            bends_a,
            mirror_bends,
        } = frame;
        let head_a = *path_a.last().expect("primary path is never empty");
        let len = path_a.len();

        if len >= c.min_len {
            let group: Vec<Cell> = path_a
                .iter()
                .chain(mirrors.iter().flatten())
                .copied()
                .collect();
            let all_exit = ray_exits(occ, head_a, path_facing(&path_a), &group)
                && mirrors.iter().all(|m| {
                    ray_exits(occ, *m.last().expect("mirror path is never empty"),
                        path_facing(m), &group)
                });
            if all_exit {
                let stop = len >= c.max_len || rng.gen::<f64>() < JOINT_STOP_CHANCE;
                if stop {
                    if bends_a >= c.min_bends {
                        return Some((path_a, mirrors));
                    }
                    return None;
                }
            }
        }

        if len >= c.max_len {
            continue;
        }

        let mirror_body: FxHashSet<Cell> = mirrors.iter().flatten().copied().collect();
        let candidates: Vec<Cell> = neighbors(head_a, rows, cols)
            .into_iter()
            .filter(|&n| occ.is_free(n) && !path_a.contains(&n) && !mirror_body.contains(&n))
            .collect();
        // Prefer moves whose reflections are also free (the kernel is more
        // likely to keep perfect symmetry), with noise to break ties.
        let ordered = sorted_by_score(candidates, |n| {
            let mirrored_free = mirror_starts
                .iter()
                .filter(|&&(t, _)| occ.is_free(t.apply(rows, cols, n)))
                .count();
            -(mirrored_free as f64) + rng.gen::<f64>()
        });

        // Push worst-first so the best joint step is popped next.
        for &next_a in ordered.iter().rev() {
            let new_bends_a = step_bends(&path_a, next_a, bends_a);
            if new_bends_a > c.max_bends {
                continue;
            }

            let mut step_occupied: FxHashSet<Cell> = FxHashSet::default();
            step_occupied.insert(next_a);
            let mut new_mirrors: Vec<Vec<Cell>> = Vec::with_capacity(mirror_count);
            let mut new_mirror_bends: Vec<usize> = Vec::with_capacity(mirror_count);
            let mut possible = true;

            for (i, path_m) in mirrors.iter().enumerate() {
                let (transform, _) = mirror_starts[i];
                let head_m = *path_m.last().expect("mirror path is never empty");
                let ideal = head_m.step(transform.apply_delta(next_a.delta_from(head_a)));

                let mut legal: Vec<Cell> = neighbors(head_m, rows, cols)
                    .into_iter()
                    .filter(|&nm| {
                        occ.is_free(nm)
                            && !path_m.contains(&nm)
                            && !path_a.contains(&nm)
                            && !mirror_body.contains(&nm)
                            && !step_occupied.contains(&nm)
                    })
                    .collect();
                let mut ranked: Vec<Cell> = Vec::with_capacity(legal.len());
                if let Some(pos) = legal.iter().position(|&nm| nm == ideal) {
                    ranked.push(legal.remove(pos));
                }
                legal.shuffle(rng);
                ranked.extend(legal);

                let mut chosen: Option<(Cell, usize)> = None;
                for nm in ranked {
                    let nb = step_bends(path_m, nm, mirror_bends[i]);
                    if nb <= c.max_bends {
                        chosen = Some((nm, nb));
                        break;
                    }
                }

                match chosen {
                    Some((nm, nb)) => {
                        let mut extended = path_m.clone();
                        extended.push(nm);
                        new_mirrors.push(extended);
                        new_mirror_bends.push(nb);
                        step_occupied.insert(nm);
                    }
                    None => {
                        possible = false;
                        break;
                    }
                }
            }

            if possible {
                let mut extended_a = path_a.clone();
                extended_a.push(next_a);
                stack.push(JointFrame {
                    path_a: extended_a,
                    mirrors: new_mirrors,
                    bends_a: new_bends_a,
                    mirror_bends: new_mirror_bends,
                });
            }
        }
    }

    None
}

fn starts_valid(occ: &Occupancy, start: Cell, mirrors: &[(MirrorTransform, Cell)]) -> bool {
    if !occ.is_free(start) {
        return false;
    }
    mirrors.iter().all(|&(_, m)| occ.is_free(m))
}

fn same_cells(a: &[Cell], b: &[Cell]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let set: FxHashSet<Cell> = a.iter().copied().collect();
    b.iter().all(|cell| set.contains(cell))
}

/// The symmetric main phase: place mirror groups until the target count or
/// the attempt budget runs out.
pub fn generate(
    kind: SymmetryKind,
    layout: &mut Layout,
    c: &Constraints,
    rng: &mut ChaCha8Rng,
) {
    layout.log(format!("Symmetrical: type={}", kind.name()));

    let rows = layout.occ.rows();
    let cols = layout.occ.cols();
    let target = c.arrow_count;
    let mut placed = 0usize;
    let max_attempts = c.arrow_count * 5;
    let mut attempts = 0usize;

    while placed < target && attempts < max_attempts {
        attempts += 1;

        let candidates = pick_starts(kind, &layout.occ, rng);
        if candidates.is_empty() {
            break;
        }

        for &start in candidates.iter().take(5) {
            let mirrors = distinct_mirrors(kind, rows, cols, start);
            if !starts_valid(&layout.occ, start, &mirrors) {
                continue;
            }
            let grown = joint_growth(&layout.occ, start, &mirrors, c, rng);
            let Some((path_a, mirror_paths)) = grown else {
                continue;
            };

            let color = layout.pick_color(rng);
            let mut group: Vec<Vec<Cell>> = vec![path_a];
            for m_path in mirror_paths {
                if placed + group.len() >= target {
                    break;
                }
                if group.iter().any(|placed_path| same_cells(placed_path, &m_path)) {
                    continue;
                }
                group.push(m_path);
            }
            for path in group {
                layout.place(path, color);
                placed += 1;
            }
            break;
        }
    }

    layout.log(format!("Symmetrical: placed {placed} of {target} snakes"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use snakeout_grid::Board;

    #[test]
    fn transforms_match_their_definitions() {
        let cell = Cell::new(1, 2);
        assert_eq!(
            MirrorTransform::FlipRows.apply(6, 6, cell),
            Cell::new(4, 2)
        );
        assert_eq!(
            MirrorTransform::FlipCols.apply(6, 6, cell),
            Cell::new(1, 3)
        );
        assert_eq!(
            MirrorTransform::FlipBoth.apply(6, 6, cell),
            Cell::new(4, 3)
        );
        assert_eq!(MirrorTransform::FlipRows.apply_delta((1, 0)), (-1, 0));
        assert_eq!(MirrorTransform::FlipCols.apply_delta((0, 1)), (0, -1));
        assert_eq!(MirrorTransform::FlipBoth.apply_delta((1, -1)), (-1, 1));
    }

    #[test]
    fn both_symmetry_yields_three_mirrors_off_axis() {
        let mirrors = distinct_mirrors(SymmetryKind::Both, 6, 6, Cell::new(1, 1));
        assert_eq!(mirrors.len(), 3);
        let cells: Vec<Cell> = mirrors.iter().map(|&(_, c)| c).collect();
        assert!(cells.contains(&Cell::new(4, 1)));
        assert!(cells.contains(&Cell::new(1, 4)));
        assert!(cells.contains(&Cell::new(4, 4)));
    }

    #[test]
    fn axis_cells_drop_their_self_mirror() {
        // Center cell of an odd grid under radial symmetry maps to itself.
        let mirrors = distinct_mirrors(SymmetryKind::Radial, 5, 5, Cell::new(2, 2));
        assert!(mirrors.is_empty());
        // A vertical-axis cell under both-symmetry keeps only the row flip
        // (the column flip is the identity, the double flip repeats it).
        let mirrors = distinct_mirrors(SymmetryKind::Both, 5, 5, Cell::new(1, 2));
        assert_eq!(mirrors.len(), 1);
        assert_eq!(mirrors[0].1, Cell::new(3, 2));
    }

    #[test]
    fn joint_growth_produces_disjoint_exitable_pairs() {
        let board = Board::from_parts(6, 6, None, &[]).unwrap();
        let occ = Occupancy::for_board(&board);
        let c = Constraints {
            arrow_count: 1,
            min_len: 3,
            max_len: 5,
            min_bends: 0,
            max_bends: 3,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let mut produced = false;
        for _ in 0..10 {
            let start = Cell::new(1, 1);
            let mirrors = distinct_mirrors(SymmetryKind::Vertical, 6, 6, start);
            if let Some((path_a, mirror_paths)) = joint_growth(&occ, start, &mirrors, &c, &mut rng)
            {
                produced = true;
                assert_eq!(mirror_paths.len(), 1);
                let mirror = &mirror_paths[0];
                assert!(path_a.len() >= 3 && path_a.len() <= 5);
                assert_eq!(path_a.len(), mirror.len());
                let a_set: FxHashSet<Cell> = path_a.iter().copied().collect();
                assert!(mirror.iter().all(|cell| !a_set.contains(cell)));
                let group: Vec<Cell> =
                    path_a.iter().chain(mirror.iter()).copied().collect();
                assert!(ray_exits(&occ, *path_a.last().unwrap(), path_facing(&path_a), &group));
                assert!(ray_exits(&occ, *mirror.last().unwrap(), path_facing(mirror), &group));
            }
        }
        assert!(produced, "joint growth never succeeded on an empty grid");
    }

    #[test]
    fn generate_places_symmetric_groups() {
        let board = Board::from_parts(6, 6, None, &[]).unwrap();
        let mut layout = Layout::new(&board, 2);
        let c = Constraints {
            arrow_count: 3,
            min_len: 2,
            max_len: 4,
            min_bends: 0,
            max_bends: 2,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        generate(SymmetryKind::Vertical, &mut layout, &c, &mut rng);
        assert!(!layout.snakes.is_empty(), "no symmetric snakes placed");
        for snake in &layout.snakes {
            assert!(snake.len() >= 2 && snake.len() <= 4);
        }
    }
}
