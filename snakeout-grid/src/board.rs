use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cell::{Cell, Direction};
use crate::wire::ObstacleRecord;

/// Input errors raised while building a [`Board`].
#[derive(Debug, Error)]
pub enum GridError {
    #[error("malformed playable mask: {0}")]
    MalformedMask(String),
    #[error("tunnel color {color:?} appears {count} times, expected exactly 2")]
    TunnelPairing { color: String, count: usize },
    #[error("unknown obstacle type {0:?}")]
    UnknownObstacleType(String),
    #[error("unknown tunnel direction {0:?}")]
    UnknownTunnelDirection(String),
}

/// A parsed obstacle occupying one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Obstacle {
    Wall,
    WallBreak { count: u32 },
    Hole { color: Option<String> },
    Tunnel { color: String, direction: Direction },
    IcedSnake,
    KeySnake,
}

impl Obstacle {
    fn parse(record: &ObstacleRecord) -> Result<Obstacle, GridError> {
        match record.kind.as_str() {
            "wall" => Ok(Obstacle::Wall),
            "wall_break" => Ok(Obstacle::WallBreak {
                count: record.count.unwrap_or(3),
            }),
            "hole" => Ok(Obstacle::Hole {
                color: record.color.clone(),
            }),
            "tunnel" => Ok(Obstacle::Tunnel {
                color: record.color.clone().unwrap_or_default(),
                direction: parse_direction(record.direction.as_deref())?,
            }),
            "iced_snake" => Ok(Obstacle::IcedSnake),
            "key_snake" => Ok(Obstacle::KeySnake),
            other => Err(GridError::UnknownObstacleType(other.to_owned())),
        }
    }
}

fn parse_direction(s: Option<&str>) -> Result<Direction, GridError> {
    match s {
        None => Ok(Direction::Right),
        Some("up") => Ok(Direction::Up),
        Some("down") => Ok(Direction::Down),
        Some("left") => Ok(Direction::Left),
        Some("right") => Ok(Direction::Right),
        Some(other) => Err(GridError::UnknownTunnelDirection(other.to_owned())),
    }
}

/// Parse obstacle records into a cell map without bounds filtering or tunnel
/// pairing. Used by the validate and difficulty entry points, which only need
/// to know which cells block.
pub fn parse_obstacle_cells(
    records: &[ObstacleRecord],
) -> Result<FxHashMap<Cell, Obstacle>, GridError> {
    let mut map = FxHashMap::default();
    for record in records {
        let obstacle = Obstacle::parse(record)?;
        for cell in record.positions() {
            map.insert(cell, obstacle.clone());
        }
    }
    Ok(map)
}

/// The immutable board a generation request runs against: dimensions, the
/// playable mask, the obstacle map, and resolved tunnel pairs.
#[derive(Debug, Clone)]
pub struct Board {
    rows: i32,
    cols: i32,
    playable: Vec<bool>,
    obstacles: FxHashMap<Cell, Obstacle>,
    tunnel_partner: FxHashMap<Cell, Cell>,
}

impl Board {
    /// Build a board from explicit dimensions, an optional mask (absent means
    /// all playable), and the obstacle records. Obstacle cells outside the
    /// grid are ignored; tunnel colors must pair up exactly.
    pub fn from_parts(
        rows: i32,
        cols: i32,
        mask: Option<&[Vec<bool>]>,
        obstacles: &[ObstacleRecord],
    ) -> Result<Board, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::MalformedMask(format!(
                "grid dimensions {rows}x{cols} are not positive"
            )));
        }
        let playable = match mask {
            None => vec![true; (rows * cols) as usize],
            Some(mask_rows) => {
                if mask_rows.len() != rows as usize {
                    return Err(GridError::MalformedMask(format!(
                        "mask has {} rows, expected {rows}",
                        mask_rows.len()
                    )));
                }
                let mut playable = Vec::with_capacity((rows * cols) as usize);
                for (r, mask_row) in mask_rows.iter().enumerate() {
                    if mask_row.len() != cols as usize {
                        return Err(GridError::MalformedMask(format!(
                            "mask row {r} has {} columns, expected {cols}",
                            mask_row.len()
                        )));
                    }
                    playable.extend_from_slice(mask_row);
                }
                playable
            }
        };

        let mut board = Board {
            rows,
            cols,
            playable,
            obstacles: FxHashMap::default(),
            tunnel_partner: FxHashMap::default(),
        };

        let mut tunnel_endpoints: FxHashMap<String, Vec<Cell>> = FxHashMap::default();
        for record in obstacles {
            let obstacle = Obstacle::parse(record)?;
            for cell in record.positions() {
                if !board.in_bounds(cell) {
                    continue;
                }
                if let Obstacle::Tunnel { color, .. } = &obstacle {
                    tunnel_endpoints.entry(color.clone()).or_default().push(cell);
                }
                board.obstacles.insert(cell, obstacle.clone());
            }
        }

        let mut colors: Vec<&String> = tunnel_endpoints.keys().collect();
        colors.sort();
        for color in colors {
            let endpoints = &tunnel_endpoints[color];
            if endpoints.len() != 2 {
                return Err(GridError::TunnelPairing {
                    color: color.clone(),
                    count: endpoints.len(),
                });
            }
            board.tunnel_partner.insert(endpoints[0], endpoints[1]);
            board.tunnel_partner.insert(endpoints[1], endpoints[0]);
        }

        Ok(board)
    }

    /// Build a board from a request mask, defaulting to an all-playable
    /// 10x10 grid when the mask is absent.
    pub fn from_request(
        mask: Option<&Vec<Vec<bool>>>,
        obstacles: &[ObstacleRecord],
    ) -> Result<Board, GridError> {
        match mask {
            None => Board::from_parts(10, 10, None, obstacles),
            Some(rows) => {
                if rows.is_empty() || rows[0].is_empty() {
                    return Err(GridError::MalformedMask("mask is empty".to_owned()));
                }
                Board::from_parts(
                    rows.len() as i32,
                    rows[0].len() as i32,
                    Some(rows.as_slice()),
                    obstacles,
                )
            }
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    fn mask_at(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.playable[(cell.row * self.cols + cell.col) as usize]
    }

    /// Whether a snake may occupy this cell: masked playable and obstacle-free.
    pub fn is_playable(&self, cell: Cell) -> bool {
        self.mask_at(cell) && !self.obstacles.contains_key(&cell)
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains_key(&cell)
    }

    pub fn obstacle_at(&self, cell: Cell) -> Option<&Obstacle> {
        self.obstacles.get(&cell)
    }

    pub fn obstacles(&self) -> &FxHashMap<Cell, Obstacle> {
        &self.obstacles
    }

    pub fn tunnel_partner(&self, cell: Cell) -> Option<Cell> {
        self.tunnel_partner.get(&cell).copied()
    }

    /// Playable cells in row-major order.
    pub fn playable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols)
                .map(move |col| Cell::new(row, col))
                .filter(move |&cell| self.is_playable(cell))
        })
    }

    pub fn playable_count(&self) -> usize {
        self.playable_cells().count()
    }
}
