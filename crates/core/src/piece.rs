//! Piece module - occupancy shapes and the falling piece
//!
//! A [`Shape`] is a small rectangular occupancy matrix (at most 4x4). Rows are
//! indexed top to bottom, columns left to right. An [`ActivePiece`] anchors a
//! shape on the board by its top-left corner; the anchor row may be negative
//! while the piece is still entering from above.

use arrayvec::ArrayVec;

use crate::catalog::base_piece;
use crate::types::{Color, PieceKind, MAX_SHAPE_EXTENT};

const N: usize = MAX_SHAPE_EXTENT;

/// Filled cells of a shape, as `(row, col)` pairs
pub type ShapeCells = ArrayVec<(i32, i32), { N * N }>;

/// Rectangular occupancy matrix of a piece in one rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; N]; N],
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    ///
    /// Panics if the matrix is empty, ragged, larger than 4x4, or has a
    /// bounding-box row or column without a filled cell.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= N, "shape height out of range");
        let cols = rows[0].len();
        assert!(cols > 0 && cols <= N, "shape width out of range");

        let mut cells = [[false; N]; N];
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "shape rows must have equal width");
            for (j, &v) in row.iter().enumerate() {
                cells[i][j] = v != 0;
            }
        }

        let shape = Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            cells,
        };
        assert!(shape.is_tight(), "shape has an empty bounding-box row or column");
        shape
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows as usize
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cols as usize
    }

    /// Whether the cell at `(row, col)` is filled; false outside the shape
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.cells[row][col]
    }

    /// Filled cells as `(row, col)` pairs, row-major
    pub fn filled(&self) -> ShapeCells {
        let mut out = ArrayVec::new();
        for i in 0..self.height() {
            for j in 0..self.width() {
                if self.cells[i][j] {
                    out.push((i as i32, j as i32));
                }
            }
        }
        out
    }

    /// The shape turned 90° clockwise about its bounding box.
    ///
    /// For an `H x W` input the output is `W x H` with
    /// `out[j][H - 1 - i] = in[i][j]`.
    pub fn rotated_clockwise(&self) -> Self {
        let h = self.height();
        let w = self.width();
        let mut cells = [[false; N]; N];
        for i in 0..h {
            for j in 0..w {
                cells[j][h - 1 - i] = self.cells[i][j];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Rows rendered as `0`/`1` strings, top to bottom
    pub fn row_strings(&self) -> Vec<String> {
        (0..self.height())
            .map(|i| {
                (0..self.width())
                    .map(|j| if self.cells[i][j] { '1' } else { '0' })
                    .collect()
            })
            .collect()
    }

    fn is_tight(&self) -> bool {
        let rows_ok = (0..self.height()).all(|i| (0..self.width()).any(|j| self.cells[i][j]));
        let cols_ok = (0..self.width()).all(|j| (0..self.height()).any(|i| self.cells[i][j]));
        rows_ok && cols_ok
    }
}

/// The piece currently falling through the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

impl ActivePiece {
    /// Create a piece of `kind` in its base rotation, anchored at `(x, y)`
    pub fn spawn(kind: PieceKind, x: i32, y: i32) -> Self {
        let (shape, color) = base_piece(kind);
        Self {
            kind,
            shape,
            x,
            y,
            color,
        }
    }

    /// Rotate the shape 90° clockwise in place.
    ///
    /// No collision check: the caller re-checks against the board and
    /// restores the previous shape when the rotation does not fit.
    pub fn rotate_clockwise(&mut self) {
        self.shape = self.shape.rotated_clockwise();
    }

    /// Shift the anchor; bounds are the board's concern.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Absolute `(x, y)` board coordinates of every filled cell
    pub fn cells(&self) -> ShapeCells {
        self.shape
            .filled()
            .into_iter()
            .map(|(i, j)| (self.x + j, self.y + i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_t_shape() {
        let t = Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]);
        let r = t.rotated_clockwise();

        assert_eq!(r.height(), 3);
        assert_eq!(r.width(), 2);
        assert_eq!(r, Shape::from_rows(&[&[1, 0], &[1, 1], &[1, 0]]));
    }

    #[test]
    fn test_rotate_i_shape_swaps_dimensions() {
        let i = Shape::from_rows(&[&[1, 1, 1, 1]]);
        let r = i.rotated_clockwise();
        assert_eq!((r.height(), r.width()), (4, 1));
        assert_eq!(r.filled().as_slice(), &[(0, 0), (1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_is_filled_out_of_range() {
        let o = Shape::from_rows(&[&[1, 1], &[1, 1]]);
        assert!(o.is_filled(1, 1));
        assert!(!o.is_filled(2, 0));
        assert!(!o.is_filled(0, 2));
    }

    #[test]
    #[should_panic]
    fn test_shape_rejects_empty_row() {
        Shape::from_rows(&[&[1, 1], &[0, 0]]);
    }

    #[test]
    #[should_panic]
    fn test_shape_rejects_ragged_rows() {
        Shape::from_rows(&[&[1, 1], &[1]]);
    }

    #[test]
    fn test_active_piece_cells_follow_anchor() {
        let mut piece = ActivePiece::spawn(PieceKind::S, 3, -1);
        assert_eq!(
            piece.cells().as_slice(),
            &[(4, -1), (5, -1), (3, 0), (4, 0)]
        );

        piece.translate(1, 2);
        assert_eq!((piece.x, piece.y), (4, 1));
        assert_eq!(piece.cells().as_slice(), &[(5, 1), (6, 1), (4, 2), (5, 2)]);
    }

    #[test]
    fn test_row_strings() {
        let j = Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]);
        assert_eq!(j.row_strings(), vec!["100".to_string(), "111".to_string()]);
    }
}
