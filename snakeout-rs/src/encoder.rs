//! Level JSON encoding: translate the internal row/col level into the
//! client's center-origin, y-up coordinate space. The origin is the rounded
//! centroid of the bounding box over every snake and obstacle cell.

use itertools::Itertools;

use snakeout_grid::wire::{ClientPosition, ItemValueConfig, LevelItem};
use snakeout_grid::{Board, Cell, Obstacle};

use crate::snake::Snake;

fn centroid(cells: &[Cell], board: &Board) -> (i32, i32) {
    let rows = cells.iter().map(|c| c.row).minmax().into_option();
    let cols = cells.iter().map(|c| c.col).minmax().into_option();
    match (rows, cols) {
        (Some((min_r, max_r)), Some((min_c, max_c))) => (
            ((min_r + max_r) as f64 / 2.0).round() as i32,
            ((min_c + max_c) as f64 / 2.0).round() as i32,
        ),
        _ => (board.rows() / 2, board.cols() / 2),
    }
}

fn to_client(cell: Cell, center: (i32, i32)) -> ClientPosition {
    ClientPosition {
        x: cell.col - center.1,
        y: center.0 - cell.row,
    }
}

pub fn encode_level(snakes: &[Snake], board: &Board, palette: &[String]) -> Vec<LevelItem> {
    let all_cells: Vec<Cell> = snakes
        .iter()
        .flat_map(|s| s.path.iter().copied())
        .chain(board.obstacles().keys().copied())
        .collect();
    let center = centroid(&all_cells, board);

    let mut items = Vec::new();
    let mut item_id = 0u32;
    let mut push = |items: &mut Vec<LevelItem>, item_type: &str, position, color_id, config| {
        items.push(LevelItem {
            item_id,
            item_type: item_type.to_owned(),
            position,
            color_id,
            item_value_config: config,
        });
        item_id += 1;
    };

    // Snakes first, head-first cell order.
    for snake in snakes {
        let position: Vec<ClientPosition> = snake
            .path
            .iter()
            .rev()
            .map(|&cell| to_client(cell, center))
            .collect();
        push(
            &mut items,
            "snake",
            position,
            snake.color.map(|c| c as i32),
            Some(ItemValueConfig::Number(0)),
        );
    }

    // Obstacles in row-major order; tunnels emit once per pair.
    let mut obstacle_cells: Vec<Cell> = board.obstacles().keys().copied().collect();
    obstacle_cells.sort();
    let mut emitted_tunnels: Vec<Cell> = Vec::new();

    for cell in obstacle_cells {
        match board.obstacle_at(cell).expect("cell came from the map") {
            Obstacle::Wall => push(
                &mut items,
                "wall",
                vec![to_client(cell, center)],
                None,
                None,
            ),
            Obstacle::WallBreak { count } => push(
                &mut items,
                "wallBreak",
                vec![to_client(cell, center)],
                None,
                Some(ItemValueConfig::WallBreak { count: *count }),
            ),
            Obstacle::Hole { color } => {
                let color_id = color
                    .as_ref()
                    .and_then(|hex| palette.iter().position(|p| p == hex))
                    .map(|idx| idx as i32);
                push(
                    &mut items,
                    "hole",
                    vec![to_client(cell, center)],
                    color_id,
                    None,
                );
            }
            Obstacle::Tunnel { direction, .. } => {
                if emitted_tunnels.contains(&cell) {
                    continue;
                }
                let partner = board
                    .tunnel_partner(cell)
                    .expect("tunnels are paired at board construction");
                emitted_tunnels.push(partner);
                let (direct_x, direct_y) = direction.client_vector();
                // The client spells it "tunel".
                push(
                    &mut items,
                    "tunel",
                    vec![to_client(cell, center), to_client(partner, center)],
                    None,
                    Some(ItemValueConfig::Tunnel { direct_x, direct_y }),
                );
            }
            Obstacle::IcedSnake | Obstacle::KeySnake => {}
        }
    }

    items
}
