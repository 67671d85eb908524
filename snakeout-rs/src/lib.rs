//! Snake-Out level generation engine.
//!
//! The crate exposes four entry points over plain serde types: generate a
//! level from constraints ([`generate_level`]), re-check an existing level
//! ([`validate_level`]), score its difficulty ([`score_difficulty`]), and
//! grow an existing level without breaking it ([`fill_gaps`]). Everything is
//! in-memory and single-threaded per request; all randomness flows from one
//! seedable stream, so a fixed seed reproduces a run bit for bit.

#[macro_use]
extern crate serde_derive;

pub mod difficulty;
pub mod driver;
pub mod encoder;
pub mod layout;
pub mod pathfinder;
pub mod smart_fill;
pub mod snake;
pub mod strategies;
pub mod validator;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{info, warn};

use snakeout_grid::wire::{LevelItem, ObstacleRecord, SnakeRecord};
use snakeout_grid::{Board, Cell, GridError};

pub use difficulty::DifficultyReport;
pub use snake::Snake;
pub use strategies::{StrategyConfig, StrategyKind};
pub use validator::ValidationReport;

use driver::Constraints;

/// Request errors surfaced to the boundary. Everything here is a caller
/// mistake; the engine never retries them.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("arrow_count must be at least 1")]
    BadArrowCount,
    #[error("length range {min}..{max} is invalid (lengths start at 2, max >= min)")]
    BadLengthRange { min: usize, max: usize },
    #[error("bend range {min}..{max} is invalid (max >= min)")]
    BadBendRange { min: usize, max: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

fn check_ranges(
    min_length: usize,
    max_length: usize,
    min_bends: usize,
    max_bends: usize,
) -> Result<(), LevelError> {
    if min_length < 2 || max_length < min_length {
        return Err(LevelError::BadLengthRange {
            min: min_length,
            max: max_length,
        });
    }
    if max_bends < min_bends {
        return Err(LevelError::BadBendRange {
            min: min_bends,
            max: max_bends,
        });
    }
    Ok(())
}

fn default_min_length() -> usize {
    2
}
fn default_max_length() -> usize {
    10
}
fn default_max_bends() -> usize {
    5
}
fn default_strategy() -> String {
    "SMART_DYNAMIC".to_owned()
}

/// Inputs of the generate entry point.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub arrow_count: usize,
    #[serde(default)]
    pub playable_mask: Option<Vec<Vec<bool>>>,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub min_bends: usize,
    #[serde(default = "default_max_bends")]
    pub max_bends: usize,
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default)]
    pub bonus_fill: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub strategy_config: StrategyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateResponse {
    pub level_json: Vec<LevelItem>,
    pub logs: Vec<String>,
    pub is_solvable: bool,
    pub stuck_count: usize,
    /// The seed actually used; echo it back to reproduce the run.
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub rows: i32,
    pub cols: i32,
    #[serde(default)]
    pub snakes: Vec<SnakeRecord>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DifficultyRequest {
    #[serde(default)]
    pub rows: Option<i32>,
    #[serde(default)]
    pub cols: Option<i32>,
    #[serde(default)]
    pub snakes: Vec<SnakeRecord>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FillRequest {
    pub rows: i32,
    pub cols: i32,
    #[serde(default)]
    pub snakes: Vec<SnakeRecord>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleRecord>,
    #[serde(default)]
    pub playable_mask: Option<Vec<Vec<bool>>>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default)]
    pub min_bends: usize,
    #[serde(default = "default_max_bends")]
    pub max_bends: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillResponse {
    pub level_json: Vec<LevelItem>,
    pub logs: Vec<String>,
    pub is_solvable: bool,
    pub stuck_count: usize,
    pub snakes_added: usize,
    pub seed: u64,
}

fn wire_path(record: &SnakeRecord) -> Vec<Cell> {
    record.path.iter().copied().map(Cell::from).collect()
}

/// Generate a level: run the requested strategy up to twenty times over the
/// board and keep the highest-scoring attempt.
#[tracing::instrument(skip_all, fields(arrow_count = request.arrow_count, strategy = %request.strategy))]
pub fn generate_level(request: &GenerateRequest) -> Result<GenerateResponse, LevelError> {
    if request.arrow_count < 1 {
        return Err(LevelError::BadArrowCount);
    }
    check_ranges(
        request.min_length,
        request.max_length,
        request.min_bends,
        request.max_bends,
    )?;

    let board = Board::from_request(request.playable_mask.as_ref(), &request.obstacles)?;

    let mut logs = Vec::new();
    let kind = match StrategyKind::parse(&request.strategy) {
        Some(kind) => kind,
        None => {
            warn!(strategy = %request.strategy, "unknown strategy, falling back");
            logs.push(format!(
                "Warning: Strategy {} not implemented. Fallback to SMART_DYNAMIC.",
                request.strategy
            ));
            StrategyKind::SmartDynamic
        }
    };

    let seed = request.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let constraints = Constraints {
        arrow_count: request.arrow_count,
        min_len: request.min_length,
        max_len: request.max_length,
        min_bends: request.min_bends,
        max_bends: request.max_bends,
    };
    let outcome = driver::run(
        &board,
        kind,
        &request.strategy_config,
        &constraints,
        request.bonus_fill,
        request.colors.len(),
        &mut rng,
    );
    info!(
        snakes = outcome.snakes.len(),
        is_solvable = outcome.is_solvable,
        "generation finished"
    );

    let level_json = encoder::encode_level(&outcome.snakes, &board, &request.colors);
    logs.extend(outcome.logs);

    Ok(GenerateResponse {
        level_json,
        logs,
        is_solvable: outcome.is_solvable,
        stuck_count: outcome.stuck_count,
        seed,
    })
}

/// Simulate removal of an existing level and report whether it solves.
#[tracing::instrument(skip_all, fields(rows = request.rows, cols = request.cols))]
pub fn validate_level(request: &ValidateRequest) -> Result<ValidationReport, LevelError> {
    let obstacle_map = snakeout_grid::board::parse_obstacle_cells(&request.obstacles)?;
    let paths: Vec<Vec<Cell>> = request
        .snakes
        .iter()
        .map(wire_path)
        .filter(|p| !p.is_empty())
        .collect();
    Ok(validator::validate_paths(
        paths.iter().map(|p| p.as_slice()),
        obstacle_map.keys().copied(),
        request.rows,
        request.cols,
    ))
}

/// Score the difficulty of an existing level.
#[tracing::instrument(skip_all)]
pub fn score_difficulty(request: &DifficultyRequest) -> Result<DifficultyReport, LevelError> {
    let paths: Vec<Vec<Cell>> = request.snakes.iter().map(wire_path).collect();
    Ok(difficulty::score_level(
        &paths,
        &request.obstacles,
        request.rows,
        request.cols,
    )?)
}

/// Add snakes to an existing level while provably keeping it solvable.
#[tracing::instrument(skip_all, fields(rows = request.rows, cols = request.cols))]
pub fn fill_gaps(request: &FillRequest) -> Result<FillResponse, LevelError> {
    check_ranges(
        request.min_length,
        request.max_length,
        request.min_bends,
        request.max_bends,
    )?;
    let board = Board::from_parts(
        request.rows,
        request.cols,
        request.playable_mask.as_deref(),
        &request.obstacles,
    )?;

    let existing: Vec<Snake> = request
        .snakes
        .iter()
        .map(|record| {
            let color = record
                .color
                .as_ref()
                .and_then(|hex| request.colors.iter().position(|p| p == hex));
            Snake::new(wire_path(record), color)
        })
        .filter(|snake| !snake.is_empty())
        .collect();

    let seed = request.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let constraints = Constraints {
        arrow_count: 0,
        min_len: request.min_length,
        max_len: request.max_length,
        min_bends: request.min_bends,
        max_bends: request.max_bends,
    };
    let outcome = smart_fill::fill_gaps(
        &board,
        existing,
        &constraints,
        request.colors.len(),
        &mut rng,
    );

    let level_json = encoder::encode_level(&outcome.snakes, &board, &request.colors);
    let mut logs = outcome.logs;
    logs.extend(outcome.report.logs.clone());

    Ok(FillResponse {
        level_json,
        logs,
        is_solvable: outcome.report.is_solvable,
        stuck_count: outcome.report.remained_count,
        snakes_added: outcome.snakes_added,
        seed,
    })
}
