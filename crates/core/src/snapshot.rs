use crate::piece::{ActivePiece, Shape};
use crate::types::{Cell, Color, Phase, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
            color: value.color,
        }
    }
}

/// Read-only copy of everything a renderer or protocol layer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major, `height * width` cells
    pub cells: Vec<Cell>,
    /// None once the game is over
    pub active: Option<ActiveSnapshot>,
    pub phase: Phase,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub fast_drop: bool,
    pub episode_id: u32,
    pub piece_id: u32,
}

impl GameSnapshot {
    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn playable(&self) -> bool {
        self.phase.is_running()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            active: None,
            phase: Phase::NotStarted,
            score: 0,
            level: 0,
            lines: 0,
            drop_interval_ms: 0,
            fast_drop: false,
            episode_id: 0,
            piece_id: 0,
        }
    }
}
