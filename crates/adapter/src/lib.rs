//! Adapter module - headless host for a game session
//!
//! This crate runs a [`core::GameSession`] on tokio and speaks a
//! line-delimited JSON protocol, so any process that can write lines to a pipe
//! can play, observe or test the game.
//!
//! # Pieces
//!
//! - [`scheduler::TokioScheduler`]: the session's timers as sleeping tokio tasks
//! - [`leaderboard`]: a task ranking final scores; its handle is the session's score sink
//! - [`protocol`]: inbound command parsing and outbound message types
//! - [`runtime::Driver`]: the select loop tying timers, commands and output together
//! - [`config::RunConfig`]: defaults, environment and flags
//!
//! # Example Session
//!
//! ```text
//! stdin:  start
//! stdout: {"type":"observation","seq":1,"phase":"running","playable":true,...}
//! stdin:  moveLeft rotate
//! stdout: {"type":"observation","seq":2,...,"active":{"kind":"t","x":2,"y":0,"color":"#ff00ff","shape":["10","11","10"]},...}
//! stdin:  {"type":"command","actions":["fastDropOn"]}
//! stdin:  leaderboard
//! stdout: {"type":"leaderboard","seq":9,"entries":[{"player":"playerOne","score":300,"level":4,"lines":3}]}
//! stdin:  warp
//! stdout: {"type":"error","seq":10,"code":"invalid_command","message":"unknown action: warp"}
//! ```
//!
//! Logs go to stderr with a bracketed component prefix (`[Driver]`,
//! `[Session]`, `[Leaderboard]`); stdout carries protocol lines only.

pub mod config;
pub mod leaderboard;
pub mod protocol;
pub mod runtime;
pub mod scheduler;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::RunConfig;
pub use leaderboard::{
    spawn_leaderboard, Leaderboard, LeaderboardEntry, LeaderboardHandle, LEADERBOARD_SIZE,
};
pub use protocol::*;
pub use runtime::{Driver, DriverSession};
pub use scheduler::TokioScheduler;
