//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds the
//! color of a locked block. Storage is a flat row-major vector for cache
//! locality; dimensions are fixed at construction.
//!
//! Coordinates: `(x, y)` where x is the column (left to right) and y is the row
//! (top to bottom). Collision treats the floor and both walls as hard bounds
//! while rows above the top edge (`y < 0`) are always free, so a piece may
//! spawn partly above the board.

use crate::piece::Shape;
use crate::types::{Cell, Color};

/// The game board - flat row-major cell storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board.
    ///
    /// Panics on a zero dimension.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero");
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y`, left to right.
    ///
    /// Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether `shape` anchored at `(x, y)` would overlap a wall, the floor, or
    /// a locked block.
    ///
    /// Filled cells on rows above the board are never in collision, but their
    /// columns are still checked against the walls.
    pub fn collides(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.filled().iter().any(|&(i, j)| {
            let px = x + j;
            let py = y + i;
            if px < 0 || px as usize >= self.width || py >= self.height as i32 {
                return true;
            }
            py >= 0 && self.is_occupied(px, py)
        })
    }

    /// Write `color` into every filled cell of `shape` anchored at `(x, y)`.
    ///
    /// Cells outside the board are skipped. Returns true if any filled cell
    /// landed on the top row.
    pub fn lock(&mut self, shape: &Shape, x: i32, y: i32, color: Color) -> bool {
        let mut locked_at_top = false;
        for (i, j) in shape.filled() {
            let py = y + i;
            if py == 0 {
                locked_at_top = true;
            }
            self.set(x + j, py, Some(color));
        }
        locked_at_top
    }

    /// Clear all full rows and return how many were removed.
    ///
    /// Two-pointer compaction from the bottom up: every non-full row moves
    /// down to the next free write position, keeping its relative order, and
    /// the rows left over at the top are emptied. Any number of full rows,
    /// adjacent or not, is handled in a single pass.
    pub fn clear_full_lines(&mut self) -> usize {
        let width = self.width;
        let mut cleared = 0;
        let mut write_y = self.height;

        for read_y in (0..self.height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::base_shape;
    use crate::types::PieceKind;

    fn fill_row(board: &mut Board, y: i32) {
        for x in 0..board.width() as i32 {
            board.set(x, y, Some(Color::RED));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new(10, 20);
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_collides_top_is_soft() {
        let board = Board::new(10, 20);
        let i = base_shape(PieceKind::I).rotated_clockwise();

        // Vertical I sticking three rows above the board.
        assert!(!board.collides(&i, 0, -3));
        // Still bound by the walls above the board.
        assert!(board.collides(&i, -1, -3));
        assert!(board.collides(&i, 10, -3));
    }

    #[test]
    fn test_lock_reports_top_row() {
        let mut board = Board::new(10, 20);
        let o = base_shape(PieceKind::O);

        assert!(!board.lock(&o, 0, 18, Color::YELLOW));
        assert!(board.lock(&o, 4, 0, Color::YELLOW));
        // Partly above the board: only the visible row is written.
        assert!(board.lock(&o, 8, -1, Color::YELLOW));
        assert!(board.is_occupied(8, 0));
        assert_eq!(board.filled_count(), 4 + 4 + 2);
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut board = Board::new(4, 6);
        fill_row(&mut board, 5);
        board.set(1, 4, Some(Color::BLUE));
        fill_row(&mut board, 3);
        board.set(2, 2, Some(Color::GREEN));

        assert_eq!(board.clear_full_lines(), 2);

        assert_eq!(board.get(1, 5), Some(Some(Color::BLUE)));
        assert_eq!(board.get(2, 4), Some(Some(Color::GREEN)));
        assert_eq!(board.filled_count(), 2);
        assert!(board.row(0).iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_rows_iterator() {
        let mut board = Board::new(3, 2);
        board.set(2, 1, Some(Color::CYAN));
        let rows: Vec<&[Cell]> = board.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[None, None, Some(Color::CYAN)]);
    }

    #[test]
    fn test_reset_empties_everything() {
        let mut board = Board::new(5, 5);
        fill_row(&mut board, 4);
        board.reset();
        assert_eq!(board.filled_count(), 0);
    }
}
