//! Protocol module - line-delimited JSON messages of the headless driver
//!
//! Every outbound message is one JSON object on its own line with a `type`
//! tag and a monotonically increasing `seq`:
//!
//! - **observation**: full session state after a change
//! - **leaderboard**: answer to a `leaderboard` query
//! - **error**: an input line that could not be understood
//!
//! Inbound lines are either plain text (one or more whitespace-separated
//! action names, or `quit` / `leaderboard`) or a JSON object:
//!
//! ```text
//! {"type":"command","actions":["moveLeft","rotate","fastDropOn"]}
//! {"type":"leaderboard"}
//! {"type":"quit"}
//! ```

use anyhow::{anyhow, bail, Result};
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{ActiveSnapshot, GameSnapshot};
use crate::leaderboard::LeaderboardEntry;
use crate::types::{GameAction, Phase, PieceKind, SettleEvent};

/// Most actions accepted on one input line
pub const MAX_ACTIONS_PER_LINE: usize = 32;

// ============== Host -> Driver ==============

/// Actions of one command line, in order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionList(pub ArrayVec<GameAction, MAX_ACTIONS_PER_LINE>);

impl ActionList {
    fn push_name(&mut self, name: &str) -> Result<()> {
        let action =
            GameAction::from_str(name).ok_or_else(|| anyhow!("unknown action: {}", name))?;
        self.0
            .try_push(action)
            .map_err(|_| anyhow!("too many actions (max {})", MAX_ACTIONS_PER_LINE))
    }
}

impl<'de> Deserialize<'de> for ActionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = ActionList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of action names")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut out = ActionList::default();
                while let Some(name) = seq.next_element::<String>()? {
                    out.push_name(&name)
                        .map_err(<A::Error as serde::de::Error>::custom)?;
                }
                Ok(out)
            }
        }

        deserializer.deserialize_seq(V)
    }
}

/// JSON command object
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(default)]
    pub seq: Option<u64>,
    pub actions: ActionList,
}

/// What one input line asks the driver to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Actions(ActionList),
    Leaderboard,
    Quit,
}

/// Parse one non-empty input line
pub fn parse_input_line(line: &str) -> Result<InputLine> {
    let line = line.trim();
    if line.is_empty() {
        bail!("empty command");
    }

    if line.starts_with('{') {
        #[derive(Debug, Deserialize)]
        #[serde(tag = "type")]
        enum Inbound {
            #[serde(rename = "command")]
            Command(CommandMessage),
            #[serde(rename = "leaderboard")]
            Leaderboard,
            #[serde(rename = "quit")]
            Quit,
        }

        return match serde_json::from_str::<Inbound>(line)? {
            Inbound::Command(cmd) => Ok(InputLine::Actions(cmd.actions)),
            Inbound::Leaderboard => Ok(InputLine::Leaderboard),
            Inbound::Quit => Ok(InputLine::Quit),
        };
    }

    match line.to_lowercase().as_str() {
        "quit" | "exit" => return Ok(InputLine::Quit),
        "leaderboard" | "scores" => return Ok(InputLine::Leaderboard),
        _ => {}
    }

    let mut actions = ActionList::default();
    for name in line.split_whitespace() {
        actions.push_name(name)?;
    }
    Ok(InputLine::Actions(actions))
}

// ============== Driver -> Host ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaderboardType {
    #[serde(rename = "leaderboard")]
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseLower {
    #[serde(rename = "not_started")]
    NotStarted,
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "paused")]
    Paused,
    #[serde(rename = "game_over")]
    GameOver,
}

impl From<Phase> for PhaseLower {
    fn from(value: Phase) -> Self {
        match value {
            Phase::NotStarted => Self::NotStarted,
            Phase::Running => Self::Running,
            Phase::Paused => Self::Paused,
            Phase::GameOver => Self::GameOver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKindLower {
    #[serde(rename = "i")]
    I,
    #[serde(rename = "o")]
    O,
    #[serde(rename = "t")]
    T,
    #[serde(rename = "s")]
    S,
    #[serde(rename = "z")]
    Z,
    #[serde(rename = "j")]
    J,
    #[serde(rename = "l")]
    L,
}

impl From<PieceKind> for PieceKindLower {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::I => Self::I,
            PieceKind::O => Self::O,
            PieceKind::T => Self::T,
            PieceKind::S => Self::S,
            PieceKind::Z => Self::Z,
            PieceKind::J => Self::J,
            PieceKind::L => Self::L,
        }
    }
}

/// Board grid; each cell is a `#rrggbb` color or null
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePieceSnapshot {
    pub kind: PieceKindLower,
    pub x: i32,
    pub y: i32,
    pub color: String,
    /// Occupancy rows top to bottom, e.g. `["010", "111"]`
    pub shape: Vec<String>,
}

impl From<ActiveSnapshot> for ActivePieceSnapshot {
    fn from(value: ActiveSnapshot) -> Self {
        Self {
            kind: value.kind.into(),
            x: value.x,
            y: value.y,
            color: value.color.to_hex(),
            shape: value.shape.row_strings(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastEvent {
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub level: u32,
    pub locked_at_top: bool,
}

impl From<SettleEvent> for LastEvent {
    fn from(value: SettleEvent) -> Self {
        Self {
            lines_cleared: value.lines_cleared,
            score_delta: value.score_delta,
            level: value.level,
            locked_at_top: value.locked_at_top,
        }
    }
}

/// Session state observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub phase: PhaseLower,
    pub playable: bool,
    pub episode_id: u32,
    pub piece_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub fast_drop: bool,
    pub board: BoardSnapshot,
    pub active: Option<ActivePieceSnapshot>,
    pub last_event: Option<LastEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardMessage {
    #[serde(rename = "type")]
    pub msg_type: LeaderboardType,
    pub seq: u64,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Build an observation from a snapshot and the settle event that came with it
pub fn build_observation(
    snap: &GameSnapshot,
    seq: u64,
    last_event: Option<SettleEvent>,
) -> ObservationMessage {
    let cells = snap
        .rows()
        .map(|row| row.iter().map(|c| c.map(|color| color.to_hex())).collect())
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        phase: snap.phase.into(),
        playable: snap.playable(),
        episode_id: snap.episode_id,
        piece_id: snap.piece_id,
        score: snap.score,
        level: snap.level,
        lines: snap.lines,
        drop_interval_ms: snap.drop_interval_ms,
        fast_drop: snap.fast_drop,
        board: BoardSnapshot {
            width: snap.width,
            height: snap.height,
            cells,
        },
        active: snap.active.map(ActivePieceSnapshot::from),
        last_event: last_event.map(LastEvent::from),
    }
}

pub fn create_leaderboard(seq: u64, entries: Vec<LeaderboardEntry>) -> LeaderboardMessage {
    LeaderboardMessage {
        msg_type: LeaderboardType::Leaderboard,
        seq,
        entries,
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}
