use std::fmt;

/// A row/col step, in grid coordinates (row grows downward).
pub type Delta = (i32, i32);

/// A single grid cell. Rows grow downward, columns grow rightward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// The cell one step away in the given delta.
    pub fn step(self, delta: Delta) -> Cell {
        Cell {
            row: self.row + delta.0,
            col: self.col + delta.1,
        }
    }

    /// The step taken to get here from `prev`.
    pub fn delta_from(self, prev: Cell) -> Delta {
        (self.row - prev.row, self.col - prev.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four orthogonal directions, named from the player's point of view.
///
/// Grid deltas use row/col space (up is `-row`); client vectors use the
/// exported coordinate space where `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn grid_delta(self) -> Delta {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction vector in the exported (y-up) coordinate system.
    pub fn client_vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_and_delta_are_inverses() {
        let a = Cell::new(3, 4);
        let b = a.step((0, 1));
        assert_eq!(b, Cell::new(3, 5));
        assert_eq!(b.delta_from(a), (0, 1));
    }

    #[test]
    fn client_vectors_flip_the_row_axis() {
        assert_eq!(Direction::Up.grid_delta(), (-1, 0));
        assert_eq!(Direction::Up.client_vector(), (0, 1));
        assert_eq!(Direction::Down.client_vector(), (0, -1));
        assert_eq!(Direction::Left.client_vector(), (-1, 0));
        assert_eq!(Direction::Right.client_vector(), (1, 0));
    }

    #[test]
    fn directions_parse_from_lowercase_strings() {
        let d: Direction = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(d, Direction::Right);
    }
}
