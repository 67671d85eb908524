//! The generator driver: run a strategy several times over the same board,
//! score every attempt, and keep the best one.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use snakeout_grid::Board;

use crate::layout::Layout;
use crate::snake::Snake;
use crate::strategies::{run_generation, Strategy, StrategyConfig, StrategyKind};
use crate::validator::validate_paths;

pub const MAX_RETRIES: usize = 20;
/// A solvable attempt covering at least this much of the playable area stops
/// the retry loop early.
const PERFECT_COVERAGE: u32 = 95;

/// Per-snake constraints for one generation request.
#[derive(Debug, Clone, Copy)]
pub struct Constraints {
    pub arrow_count: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub min_bends: usize,
    pub max_bends: usize,
}

/// The best attempt the driver saw, solvable or not.
#[derive(Debug)]
pub struct DriverOutcome {
    pub snakes: Vec<Snake>,
    pub logs: Vec<String>,
    pub is_solvable: bool,
    pub stuck_count: usize,
}

pub fn run(
    board: &Board,
    kind: StrategyKind,
    cfg: &StrategyConfig,
    constraints: &Constraints,
    bonus_fill: bool,
    palette_len: usize,
    rng: &mut ChaCha8Rng,
) -> DriverOutcome {
    struct Best {
        snakes: Vec<Snake>,
        logs: Vec<String>,
        is_solvable: bool,
        stuck_count: usize,
        val_logs: Vec<String>,
    }

    let mut best: Option<Best> = None;
    let mut best_score: i64 = -1;
    let mut stopped_early = false;

    for attempt in 1..=MAX_RETRIES {
        let mut layout = Layout::new(board, palette_len);
        let mut strategy = Strategy::new(kind, cfg.clone());
        run_generation(&mut strategy, &mut layout, constraints, bonus_fill, rng);

        let coverage = layout.coverage_percent();
        let report = validate_paths(
            layout.snakes.iter().map(|s| s.path.as_slice()),
            board.obstacles().keys().copied(),
            board.rows(),
            board.cols(),
        );
        let score = i64::from(report.is_solvable) * 1000 + i64::from(coverage);
        debug!(attempt, coverage, solvable = report.is_solvable, score, "attempt finished");

        if score > best_score {
            best_score = score;
            let mut logs = layout.logs;
            logs.push(format!(
                "Attempt {attempt}/{MAX_RETRIES}: Coverage {coverage}% | Solvable: {}",
                report.is_solvable
            ));
            best = Some(Best {
                snakes: layout.snakes,
                logs,
                is_solvable: report.is_solvable,
                stuck_count: report.remained_count,
                val_logs: report.logs,
            });
        }

        if report.is_solvable && coverage >= PERFECT_COVERAGE {
            stopped_early = true;
            break;
        }
    }

    let mut best = best.expect("at least one attempt always runs");
    if stopped_early {
        best.logs
            .push("Perfect result found. Stopping retries.".to_owned());
    }

    let mut logs = best.logs;
    logs.push("--- Solvability Check ---".to_owned());
    logs.extend(best.val_logs);
    if !best.is_solvable {
        logs.push(format!(
            "WARNING: Level is STUCK. Remained: {}",
            best.stuck_count
        ));
    }

    DriverOutcome {
        snakes: best.snakes,
        logs,
        is_solvable: best.is_solvable,
        stuck_count: best.stuck_count,
    }
}
