use rand::Rng;
use rand_chacha::ChaCha8Rng;

use snakeout_grid::{Board, Cell, Occupancy};

use crate::snake::Snake;

/// The working state of one generation attempt: the board being filled, the
/// occupancy view, the snakes placed so far, and the attempt's log lines.
#[derive(Debug)]
pub struct Layout<'b> {
    pub board: &'b Board,
    pub occ: Occupancy,
    pub snakes: Vec<Snake>,
    pub logs: Vec<String>,
    palette_len: usize,
}

impl<'b> Layout<'b> {
    pub fn new(board: &'b Board, palette_len: usize) -> Layout<'b> {
        Layout {
            board,
            occ: Occupancy::for_board(board),
            snakes: Vec::new(),
            logs: Vec::new(),
            palette_len,
        }
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.push(message.into());
    }

    pub fn pick_color(&self, rng: &mut ChaCha8Rng) -> Option<usize> {
        if self.palette_len == 0 {
            return None;
        }
        Some(rng.gen_range(0..self.palette_len))
    }

    /// Place a freshly found path. The occupancy asserts that no cell is
    /// taken twice.
    pub fn place(&mut self, path: Vec<Cell>, color: Option<usize>) {
        self.occ.occupy_path(&path);
        self.snakes.push(Snake::new(path, color));
    }

    /// Mark cells of a pre-existing snake (fill-gaps input) as occupied
    /// without the double-placement assertion; caller-supplied levels are
    /// taken as-is.
    pub fn adopt(&mut self, snake: Snake) {
        for &cell in &snake.path {
            self.occ.block(cell);
        }
        self.snakes.push(snake);
    }

    pub fn occupied_count(&self) -> usize {
        self.snakes.iter().map(Snake::len).sum()
    }

    pub fn coverage_percent(&self) -> u32 {
        let playable = self.board.playable_count();
        if playable == 0 {
            return 0;
        }
        (self.occupied_count() as f64 / playable as f64 * 100.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn coverage_counts_snake_cells_against_playable() {
        let board = Board::from_parts(5, 5, None, &[]).unwrap();
        let mut layout = Layout::new(&board, 2);
        layout.place(vec![Cell::new(0, 0), Cell::new(0, 1)], Some(0));
        layout.place(vec![Cell::new(4, 4), Cell::new(4, 3), Cell::new(4, 2)], Some(1));
        assert_eq!(layout.occupied_count(), 5);
        assert_eq!(layout.coverage_percent(), 20);
    }

    #[test]
    fn pick_color_stays_inside_the_palette() {
        let board = Board::from_parts(3, 3, None, &[]).unwrap();
        let layout = Layout::new(&board, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..20 {
            assert!(layout.pick_color(&mut rng).unwrap() < 3);
        }
        let bare = Layout::new(&board, 0);
        assert_eq!(bare.pick_color(&mut rng), None);
    }
}
