//! Bonus fill passes: after a strategy's main phase, pack extra snakes into
//! the remaining gaps. Both variants run the same three-pass schedule,
//! standard lengths first, then progressively shorter snakes, and both keep
//! the exit raycast so every added snake preserves solvability.

use decorum::N64;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use snakeout_grid::{has_any_exit, Cell};

use crate::driver::Constraints;
use crate::layout::Layout;
use crate::pathfinder::{
    find_exitable_path, SearchLimits, DEFAULT_MAX_NODES, DEFAULT_STOP_CHANCE,
};

use super::sorted_by_score;

fn pass_schedule(c: &Constraints) -> [(usize, usize); 3] {
    [
        (c.min_len, c.max_len),
        (2, c.max_len),
        (2, c.max_len.min(4)),
    ]
}

fn pass_limits(c: &Constraints, pass: (usize, usize)) -> SearchLimits {
    SearchLimits {
        min_len: pass.0,
        max_len: pass.1,
        min_bends: c.min_bends,
        max_bends: c.max_bends,
        max_nodes: DEFAULT_MAX_NODES,
        stop_chance: DEFAULT_STOP_CHANCE,
    }
}

/// Try one start with the tight packing order (prefer the most constrained
/// neighbor) and place the result on success.
fn try_place(
    layout: &mut Layout,
    start: Cell,
    limits: &SearchLimits,
    noise: f64,
    rng: &mut ChaCha8Rng,
) -> bool {
    let occ = &layout.occ;
    let found = find_exitable_path(occ, start, limits, rng, &mut |path, nbs, rng| {
        let sorted = sorted_by_score(nbs.iter().copied(), |n| {
            occ.free_neighbor_count_excluding(n, path) as f64 + rng.gen::<f64>() * noise
        });
        nbs.clear();
        nbs.extend(sorted);
    });
    match found {
        Some(path) => {
            let color = layout.pick_color(rng);
            layout.place(path, color);
            true
        }
        None => false,
    }
}

/// The default multi-pass fill attached to RandomAdaptive: sample a batch of
/// the remainder, try starts with an immediate exit first.
pub fn multi_pass_fill(layout: &mut Layout, c: &Constraints, rng: &mut ChaCha8Rng) {
    const MAX_BONUS: usize = 100;
    const MAX_CONSECUTIVE_MISSES: usize = 20;
    const BATCH: usize = 50;
    const STARTS_PER_ROUND: usize = 10;

    let initial_remaining = layout.occ.free_count();
    if initial_remaining == 0 {
        return;
    }
    layout.log(format!(
        "Bonus Fill: {initial_remaining} cells remaining. Starting smart fill..."
    ));

    let mut bonus = 0usize;
    for pass in pass_schedule(c) {
        if bonus >= MAX_BONUS {
            break;
        }
        let limits = pass_limits(c, pass);
        let mut misses = 0usize;

        while misses < MAX_CONSECUTIVE_MISSES && bonus < MAX_BONUS {
            let mut remaining = layout.occ.free_cells();
            if remaining.is_empty() {
                break;
            }
            remaining.shuffle(rng);

            let mut with_exit = Vec::new();
            let mut without_exit = Vec::new();
            for &cell in remaining.iter().take(BATCH) {
                if has_any_exit(&layout.occ, cell) {
                    with_exit.push(cell);
                } else {
                    without_exit.push(cell);
                }
            }

            let mut found = false;
            for start in with_exit
                .into_iter()
                .chain(without_exit)
                .take(STARTS_PER_ROUND)
            {
                if try_place(layout, start, &limits, 1.0, rng) {
                    bonus += 1;
                    misses = 0;
                    found = true;
                    break;
                }
            }
            if !found {
                misses += 1;
            }
        }
    }

    if bonus > 0 {
        layout.log(format!("Bonus Fill Complete: Added {bonus} snakes."));
    }
}

/// The MinFragment fill shared by the non-default strategies: score every
/// remaining cell by how boxed-in it is, heavily penalize starts with no
/// immediate exit direction, and pack tightly.
pub fn min_fragment_fill(layout: &mut Layout, c: &Constraints, rng: &mut ChaCha8Rng) {
    const MAX_BONUS: usize = 200;
    const MAX_CONSECUTIVE_MISSES: usize = 40;
    const NO_EXIT_PENALTY: f64 = 100.0;
    const EXIT_POOL: usize = 20;
    const NO_EXIT_POOL: usize = 10;

    let initial_remaining = layout.occ.free_count();
    if initial_remaining == 0 {
        return;
    }
    layout.log(format!(
        "MIN_FRAGMENT Bonus Fill: {initial_remaining} cells remaining..."
    ));

    let mut bonus = 0usize;
    for pass in pass_schedule(c) {
        if bonus >= MAX_BONUS {
            break;
        }
        let limits = pass_limits(c, pass);
        let mut misses = 0usize;

        while misses < MAX_CONSECUTIVE_MISSES && bonus < MAX_BONUS {
            let remaining = layout.occ.free_cells();
            if remaining.is_empty() {
                break;
            }

            let occ = &layout.occ;
            let mut scored: Vec<(N64, bool, Cell)> = remaining
                .into_iter()
                .map(|cell| {
                    let exit = has_any_exit(occ, cell);
                    let penalty = if exit { 0.0 } else { NO_EXIT_PENALTY };
                    let score = occ.free_neighbor_count(cell) as f64 + penalty;
                    (N64::from(score), exit, cell)
                })
                .collect();
            scored.sort_by_key(|&(score, _, _)| score);

            let mut exit_pool: Vec<Cell> = scored
                .iter()
                .filter(|&&(_, exit, _)| exit)
                .map(|&(_, _, cell)| cell)
                .take(EXIT_POOL)
                .collect();
            let no_exit_pool: Vec<Cell> = scored
                .iter()
                .filter(|&&(_, exit, _)| !exit)
                .map(|&(_, _, cell)| cell)
                .take(NO_EXIT_POOL)
                .collect();
            exit_pool.shuffle(rng);

            let mut found = false;
            for start in exit_pool.into_iter().chain(no_exit_pool) {
                if try_place(layout, start, &limits, 0.3, rng) {
                    bonus += 1;
                    misses = 0;
                    found = true;
                    break;
                }
            }
            if !found {
                misses += 1;
            }
        }
    }

    if bonus > 0 {
        let final_remaining = layout.occ.free_count();
        layout.log(format!(
            "MIN_FRAGMENT Bonus Fill Complete: Added {bonus} snakes. {final_remaining} cells remaining."
        ));
    } else {
        layout.log("MIN_FRAGMENT Bonus Fill: No additional snakes could be placed.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::bends_in;
    use rand::SeedableRng;
    use snakeout_grid::{ray_exits, Board};

    fn constraints() -> Constraints {
        Constraints {
            arrow_count: 0,
            min_len: 2,
            max_len: 4,
            min_bends: 0,
            max_bends: 2,
        }
    }

    fn check_level(layout: &Layout) {
        // Re-simulate the placement order: every snake's head must have had
        // a clear exit over the snakes placed before it.
        let board = layout.board;
        let mut replay = Layout::new(board, 0);
        for snake in &layout.snakes {
            let head = snake.head();
            let facing = snake.facing();
            assert!(
                ray_exits(&replay.occ, head, facing, &snake.path),
                "snake head {head} was placed without an exit"
            );
            replay.place(snake.path.clone(), None);
        }
    }

    #[test]
    fn multi_pass_fill_adds_snakes_to_an_empty_board() {
        let board = Board::from_parts(8, 8, None, &[]).unwrap();
        let mut layout = Layout::new(&board, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        multi_pass_fill(&mut layout, &constraints(), &mut rng);
        assert!(!layout.snakes.is_empty());
        for snake in &layout.snakes {
            assert!(snake.len() >= 2 && snake.len() <= 4);
            assert!(bends_in(&snake.path) <= 2);
        }
        check_level(&layout);
    }

    #[test]
    fn min_fragment_fill_packs_and_logs() {
        let board = Board::from_parts(8, 8, None, &[]).unwrap();
        let mut layout = Layout::new(&board, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(37);
        min_fragment_fill(&mut layout, &constraints(), &mut rng);
        assert!(!layout.snakes.is_empty());
        assert!(layout.logs.iter().any(|l| l.starts_with("MIN_FRAGMENT")));
        check_level(&layout);
    }

    #[test]
    fn fill_is_a_no_op_on_a_full_board() {
        let board = Board::from_parts(2, 2, None, &[]).unwrap();
        let mut layout = Layout::new(&board, 1);
        layout.place(
            vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(1, 0),
            ],
            Some(0),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let before = layout.snakes.len();
        multi_pass_fill(&mut layout, &constraints(), &mut rng);
        min_fragment_fill(&mut layout, &constraints(), &mut rng);
        assert_eq!(layout.snakes.len(), before);
    }
}
