//! Piece catalog - canonical shapes and colors of the seven kinds
//!
//! ```text
//! I: ####   O: ##   T: .#.   S: .##   Z: ##.   J: #..   L: ..#
//!               ##      ###      ##.      .##      ###      ###
//! ```

use crate::piece::Shape;
use crate::types::{Color, PieceKind};

/// Canonical (unrotated) shape and display color for `kind`
pub fn base_piece(kind: PieceKind) -> (Shape, Color) {
    (base_shape(kind), kind.color())
}

/// Canonical (unrotated) shape for `kind`
pub fn base_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
        PieceKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
        PieceKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
        PieceKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        PieceKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        PieceKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
        PieceKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_cells() {
        for kind in PieceKind::ALL {
            let (shape, _) = base_piece(kind);
            assert_eq!(shape.filled().len(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_base_dimensions() {
        let dims = |k| {
            let s = base_shape(k);
            (s.height(), s.width())
        };
        assert_eq!(dims(PieceKind::I), (1, 4));
        assert_eq!(dims(PieceKind::O), (2, 2));
        for k in [PieceKind::T, PieceKind::S, PieceKind::Z, PieceKind::J, PieceKind::L] {
            assert_eq!(dims(k), (2, 3));
        }
    }

    #[test]
    fn test_colors_match_kind_lookup() {
        assert_eq!(base_piece(PieceKind::I).1, Color::CYAN);
        assert_eq!(base_piece(PieceKind::L).1, Color::ORANGE);
        for kind in PieceKind::ALL {
            assert_eq!(base_piece(kind).1, kind.color());
        }
    }
}
