//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the game rules, state management, and simulation logic
//! of the falling-block game. It has **no dependencies** on UI, audio, networking,
//! or wall-clock time, making it:
//!
//! - **Deterministic**: Same seed and same command/timer sequence produce identical games
//! - **Testable**: Ticks are driven through an injected [`Scheduler`]; tests use
//!   [`ManualScheduler`] and a virtual clock
//! - **Portable**: Any host (terminal, GUI, headless protocol) can drive it
//!
//! # Module Structure
//!
//! - [`catalog`]: canonical shapes and colors of the seven piece kinds
//! - [`piece`]: occupancy [`Shape`] and the falling [`ActivePiece`]
//! - [`board`]: parameterized grid with collision, locking and line clearing
//! - [`scoring`]: points, leveling and drop-interval rules
//! - [`rng`]: seeded piece sources (uniform, 7-bag, scripted)
//! - [`scheduler`]: the cancellable timer contract and a manual implementation
//! - [`sink`]: final-score hand-off contract
//! - [`config`]: session configuration and presets
//! - [`session`]: the game session state machine
//! - [`snapshot`]: read-only copies of session state for hosts
//!
//! # Game Rules
//!
//! - A piece falls one row per drop tick; when it cannot fall it locks
//! - A piece locking with a cell on the top row ends the game
//! - Each cleared line scores 100 points and raises the level by one (max 10)
//! - The drop interval is `max(100, 1000 / level)` milliseconds
//! - Holding fast drop adds a 100ms drop cadence on top of the normal one
//! - A freshly spawned piece that overlaps the stack ends the game
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameSession, ManualScheduler, NullSink, SessionConfig};
//! use blockfall_types::{GameAction, Phase};
//!
//! let mut game = GameSession::new(SessionConfig::classic(), ManualScheduler::new(), NullSink);
//! game.start();
//! assert_eq!(game.phase(), Phase::Running);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//!
//! // One drop interval later the piece has fallen one row.
//! let y = game.active().y;
//! game.advance_clock(1000);
//! assert_eq!(game.active().y, y + 1);
//! ```

pub mod board;
pub mod catalog;
pub mod config;
pub mod piece;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod sink;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use catalog::base_piece;
pub use config::{Randomizer, ResetPolicy, SessionConfig};
pub use piece::{ActivePiece, Shape};
pub use rng::{BagSource, PieceSource, ScriptedSource, SimpleRng, UniformSource};
pub use scheduler::{ManualScheduler, Scheduler};
pub use scoring::{drop_interval_ms, line_clear_score, next_level};
pub use session::GameSession;
pub use sink::{FinalScore, NullSink, ScoreSink};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
