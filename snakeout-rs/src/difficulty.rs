//! Difficulty scoring: three unbounded contributions summed. S measures the
//! snake load, F the friction of actually solving (stuck ratio, board
//! spread, solve depth), O the obstacle cost.

use itertools::{Itertools, MinMaxResult};
use rustc_hash::FxHashSet;

use snakeout_grid::board::parse_obstacle_cells;
use snakeout_grid::wire::ObstacleRecord;
use snakeout_grid::{Cell, GridError};

use crate::snake::bends_in;
use crate::validator::validate_paths;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyBreakdown {
    #[serde(rename = "S")]
    pub snake_load: f64,
    #[serde(rename = "F")]
    pub freedom: f64,
    #[serde(rename = "O")]
    pub obstacles: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBounds {
    pub rows: i32,
    pub cols: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyDetails {
    pub grid_bounds: GridBounds,
    pub total_snakes: usize,
    pub solve_depth: usize,
    pub occupied_cells: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyReport {
    pub difficulty_score: f64,
    pub breakdown: DifficultyBreakdown,
    pub details: DifficultyDetails,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn score_level(
    paths: &[Vec<Cell>],
    obstacles: &[ObstacleRecord],
    rows: Option<i32>,
    cols: Option<i32>,
) -> Result<DifficultyReport, GridError> {
    let obstacle_map = parse_obstacle_cells(obstacles)?;

    if paths.is_empty() {
        return Ok(DifficultyReport {
            difficulty_score: 0.0,
            breakdown: DifficultyBreakdown {
                snake_load: 0.0,
                freedom: 0.0,
                obstacles: 0.0,
            },
            details: DifficultyDetails {
                grid_bounds: GridBounds {
                    rows: rows.unwrap_or(0),
                    cols: cols.unwrap_or(0),
                },
                total_snakes: 0,
                solve_depth: 0,
                occupied_cells: 0,
            },
        });
    }

    // Bounding box over every snake and obstacle cell; also the dimension
    // fallback when the request carries none.
    let all_cells: Vec<Cell> = paths
        .iter()
        .flatten()
        .copied()
        .chain(obstacle_map.keys().copied())
        .collect();
    let bbox_area = match (
        all_cells.iter().map(|c| c.row).minmax(),
        all_cells.iter().map(|c| c.col).minmax(),
    ) {
        (MinMaxResult::NoElements, _) | (_, MinMaxResult::NoElements) => 0,
        (row_span, col_span) => {
            let (min_r, max_r) = row_span.into_option().unwrap();
            let (min_c, max_c) = col_span.into_option().unwrap();
            i64::from(max_r - min_r + 1) * i64::from(max_c - min_c + 1)
        }
    };
    let max_row = all_cells.iter().map(|c| c.row).max().unwrap_or(0);
    let max_col = all_cells.iter().map(|c| c.col).max().unwrap_or(0);
    let grid_rows = rows.unwrap_or(max_row + 1);
    let grid_cols = cols.unwrap_or(max_col + 1);

    // S: snake load.
    let total_snakes = paths.len();
    let avg_length =
        paths.iter().map(Vec::len).sum::<usize>() as f64 / total_snakes as f64;
    let avg_bends =
        paths.iter().map(|p| bends_in(p)).sum::<usize>() as f64 / total_snakes as f64;
    let s = 2.0 * total_snakes as f64 + 0.25 * avg_length + 0.5 * avg_bends;

    // F: freedom / friction, from a full solvability simulation.
    let report = validate_paths(
        paths.iter().map(|p| p.as_slice()),
        obstacle_map.keys().copied(),
        grid_rows,
        grid_cols,
    );
    let f = 5.0 * report.avg_stuck_ratio + bbox_area as f64 / 100.0 + 2.0 * report.steps as f64;

    // O: obstacle cost.
    let mut walls = 0usize;
    let mut holes = 0usize;
    let mut wall_breaks = 0usize;
    let mut iced = 0usize;
    let mut keyed = 0usize;
    let mut tunnel_records = 0usize;
    for record in obstacles {
        match record.kind.as_str() {
            "wall" => walls += record.positions().len().max(1),
            "hole" => holes += 1,
            "tunnel" => tunnel_records += 1,
            "wall_break" => wall_breaks += 1,
            "iced_snake" => iced += 1,
            "key_snake" => keyed += 1,
            _ => {}
        }
    }
    let tunnel_pairs = tunnel_records / 2;
    let o = walls as f64
        + 2.5 * holes as f64
        + 3.0 * tunnel_pairs as f64
        + 3.0 * wall_breaks as f64
        + 5.0 * iced as f64
        + 5.0 * keyed as f64;

    let occupied: FxHashSet<Cell> = all_cells.into_iter().collect();

    Ok(DifficultyReport {
        difficulty_score: round1(s + f + o),
        breakdown: DifficultyBreakdown {
            snake_load: round1(s),
            freedom: round1(f),
            obstacles: round1(o),
        },
        details: DifficultyDetails {
            grid_bounds: GridBounds {
                rows: grid_rows,
                cols: grid_cols,
            },
            total_snakes,
            solve_depth: report.steps,
            occupied_cells: occupied.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(points: &[(i32, i32)]) -> Vec<Cell> {
        points.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    #[test]
    fn lone_straight_snake_scores_by_hand() {
        let paths = vec![cells(&[(0, 0), (0, 1)])];
        let report = score_level(&paths, &[], Some(5), Some(5)).unwrap();
        // S = 2*1 + 0.25*2 + 0 = 2.5
        // F = 5*0 + 2/100 + 2*1 = 2.02 -> 2.0
        assert_eq!(report.breakdown.snake_load, 2.5);
        assert_eq!(report.breakdown.freedom, 2.0);
        assert_eq!(report.breakdown.obstacles, 0.0);
        assert_eq!(report.difficulty_score, 4.5);
        assert_eq!(report.details.total_snakes, 1);
        assert_eq!(report.details.solve_depth, 1);
        assert_eq!(report.details.occupied_cells, 2);
    }

    #[test]
    fn stuck_levels_pay_the_friction_price() {
        let paths = vec![cells(&[(0, 0), (0, 1)]), cells(&[(0, 3), (0, 2)])];
        let report = score_level(&paths, &[], Some(1), Some(4)).unwrap();
        // Deadlocked pair: stuck ratio 1.0, zero steps.
        // S = 4 + 0.5 = 4.5; F = 5 + 4/100 = 5.04 -> 5.0
        assert_eq!(report.breakdown.snake_load, 4.5);
        assert_eq!(report.breakdown.freedom, 5.0);
        assert_eq!(report.difficulty_score, 9.5);
        assert_eq!(report.details.solve_depth, 0);
    }

    #[test]
    fn obstacle_costs_are_weighted() {
        let paths = vec![cells(&[(0, 0), (0, 1)])];
        let obstacles = vec![
            ObstacleRecord {
                kind: "wall".to_owned(),
                cells: vec![Cell::new(3, 3).into(), Cell::new(3, 4).into()],
                ..Default::default()
            },
            ObstacleRecord {
                kind: "tunnel".to_owned(),
                row: Some(4),
                col: Some(0),
                color: Some("red".to_owned()),
                ..Default::default()
            },
            ObstacleRecord {
                kind: "tunnel".to_owned(),
                row: Some(4),
                col: Some(4),
                color: Some("red".to_owned()),
                ..Default::default()
            },
            ObstacleRecord {
                kind: "wall_break".to_owned(),
                row: Some(2),
                col: Some(2),
                count: Some(2),
                ..Default::default()
            },
        ];
        let report = score_level(&paths, &obstacles, Some(6), Some(6)).unwrap();
        // 2 wall cells + 1 tunnel pair * 3 + 1 wall break * 3
        assert_eq!(report.breakdown.obstacles, 8.0);
    }

    #[test]
    fn no_snakes_scores_zero() {
        let report = score_level(&[], &[], Some(5), Some(5)).unwrap();
        assert_eq!(report.difficulty_score, 0.0);
        assert_eq!(report.details.total_snakes, 0);
    }

    #[test]
    fn missing_dims_fall_back_to_the_bounding_box() {
        let paths = vec![cells(&[(2, 2), (2, 3)])];
        let report = score_level(&paths, &[], None, None).unwrap();
        assert_eq!(report.details.grid_bounds, GridBounds { rows: 3, cols: 4 });
        // The head still exits the fallback grid, so the level solves.
        assert_eq!(report.details.solve_depth, 1);
    }
}
