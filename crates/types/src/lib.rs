//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, host adapters, JSON protocol).
//!
//! # Board Dimensions
//!
//! Board size is configuration, not a constant. Two layouts are in common use:
//!
//! - **Classic**: 10 columns x 20 rows, pieces spawn at column 3
//! - **Wide**: 15 columns x 30 rows, pieces spawn at column 6
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Drop interval at level 1 |
//! | `DROP_INTERVAL_MIN_MS` | 100 | Drop interval floor |
//! | `FAST_DROP_MS` | 100 | Fast drop cadence while held |
//!
//! # Drop Intervals by Level
//!
//! `interval = max(100, 1000 / level)`:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 500ms |
//! | 3 | 333ms |
//! | 4 | 250ms |
//! | 5 | 200ms |
//! | 10 | 100ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, Phase, Color};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! let action = GameAction::from_str("moveLeft").unwrap();
//! assert_eq!(action, GameAction::MoveLeft);
//!
//! assert_eq!(Phase::Running.as_str(), "running");
//! assert_eq!(Color::ORANGE.to_hex(), "#ffa500");
//! ```

use std::fmt;

/// Classic board width (10 columns)
pub const CLASSIC_WIDTH: u8 = 10;

/// Classic board height (20 rows)
pub const CLASSIC_HEIGHT: u8 = 20;

/// Spawn column on the classic board
pub const CLASSIC_SPAWN_COLUMN: u8 = 3;

/// Wide board width (15 columns)
pub const WIDE_WIDTH: u8 = 15;

/// Wide board height (30 rows)
pub const WIDE_HEIGHT: u8 = 30;

/// Spawn column on the wide board
pub const WIDE_SPAWN_COLUMN: u8 = 6;

/// Largest shape extent in either direction (the I piece is 4 long)
pub const MAX_SHAPE_EXTENT: usize = 4;

/// Base drop interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Absolute minimum drop interval (100ms)
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Fast drop cadence while the player holds fast drop (100ms)
pub const FAST_DROP_MS: u32 = 100;

/// Level a new game starts at
pub const START_LEVEL: u32 = 1;

/// Level cap
pub const MAX_LEVEL: u32 = 10;

/// Points per cleared line
pub const POINTS_PER_LINE: u32 = 100;

/// Player name used when none is configured
pub const DEFAULT_PLAYER_NAME: &str = "playerOne";


/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Fixed display color of this kind.
    ///
    /// This is the only place a kind is mapped to a color; spawn and lock
    /// both go through it.
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::CYAN,
            PieceKind::O => Color::YELLOW,
            PieceKind::T => Color::MAGENTA,
            PieceKind::S => Color::GREEN,
            PieceKind::Z => Color::RED,
            PieceKind::J => Color::BLUE,
            PieceKind::L => Color::ORANGE,
        }
    }
}

/// Opaque RGB color token carried by pieces and locked cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form used by the JSON protocol
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell holding a locked block of that color
pub type Cell = Option<Color>;

/// Session lifecycle phase
///
/// `NotStarted -> Running <-> Paused`, `Running -> GameOver`, and `reset`
/// leaves `GameOver` (or any other phase) for a fresh game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

impl Phase {
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, Phase::GameOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not_started",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::GameOver => "game_over",
        }
    }
}

/// Game actions that can be applied to a session
///
/// These are the commands a host (touch layer, keyboard layer, protocol
/// client) issues. Each action maps to one session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Begin a not-yet-started game
    Start,
    /// Pause a running game
    Pause,
    /// Resume a paused game
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Advance piece one row (locks when it cannot fall)
    MoveDown,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Start holding fast drop
    FastDropOn,
    /// Release fast drop
    FastDropOff,
    /// Start a fresh game
    Reset,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase names)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("fastDropOff"), Some(GameAction::FastDropOff));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameAction::Start),
            "pause" => Some(GameAction::Pause),
            "resume" => Some(GameAction::Resume),
            "togglepause" => Some(GameAction::TogglePause),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "movedown" | "softdrop" => Some(GameAction::MoveDown),
            "rotate" | "rotatecw" => Some(GameAction::Rotate),
            "fastdropon" => Some(GameAction::FastDropOn),
            "fastdropoff" => Some(GameAction::FastDropOff),
            "reset" | "restart" => Some(GameAction::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase string for the protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::Pause => "pause",
            GameAction::Resume => "resume",
            GameAction::TogglePause => "togglePause",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveDown => "moveDown",
            GameAction::Rotate => "rotate",
            GameAction::FastDropOn => "fastDropOn",
            GameAction::FastDropOff => "fastDropOff",
            GameAction::Reset => "reset",
        }
    }
}

/// The two independently cancellable periodic timers a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Level-paced gravity
    Drop,
    /// Fixed-cadence drop while fast drop is held
    FastDrop,
}

impl Timer {
    pub const ALL: [Timer; 2] = [Timer::Drop, Timer::FastDrop];

    /// Stable index for per-timer bookkeeping arrays
    pub fn index(&self) -> usize {
        match self {
            Timer::Drop => 0,
            Timer::FastDrop => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timer::Drop => "drop",
            Timer::FastDrop => "fast_drop",
        }
    }
}

/// Identifies one arming of a timer.
///
/// Every post of a timer gets a fresh generation; a firing whose generation
/// no longer matches the session's current one was cancelled or superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub timer: Timer,
    pub generation: u64,
}

/// Core-side event emitted after a piece locks.
///
/// Hosts take it with `GameSession::take_last_event` to drive sounds,
/// flashes or protocol `last_event` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleEvent {
    pub lines_cleared: u32,
    pub score_delta: u32,
    /// Level after the settle
    pub level: u32,
    /// The piece locked with a cell on the top row; the game ended on this settle
    pub locked_at_top: bool,
}
