//! Leaderboard task - receives final scores and answers top-N queries
//!
//! The session only ever sees a [`LeaderboardHandle`] through the
//! [`ScoreSink`] trait: submitting is a channel send that never waits and
//! ignores a stopped task. Ranking lives in [`Leaderboard`], owned by a
//! single spawned task.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::{FinalScore, ScoreSink};

/// Number of entries a default leaderboard keeps
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl From<FinalScore> for LeaderboardEntry {
    fn from(value: FinalScore) -> Self {
        Self {
            player: value.player,
            score: value.score,
            level: value.level,
            lines: value.lines,
        }
    }
}

/// Best scores, highest first; equal scores keep submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    capacity: usize,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert `entry`, returning its 1-based rank, or None if it did not
    /// make the board.
    pub fn record(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        if pos >= self.capacity {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(self.capacity);
        Some(pos + 1)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
enum Request {
    Submit(FinalScore),
    Top(oneshot::Sender<Vec<LeaderboardEntry>>),
}

/// Cloneable handle to the leaderboard task
#[derive(Debug, Clone)]
pub struct LeaderboardHandle {
    tx: mpsc::UnboundedSender<Request>,
}

impl LeaderboardHandle {
    /// Current standings, best first
    pub async fn top(&self) -> Result<Vec<LeaderboardEntry>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Top(reply_tx))
            .map_err(|_| anyhow!("leaderboard task has stopped"))?;
        reply_rx
            .await
            .context("leaderboard task dropped the query")
    }
}

impl ScoreSink for LeaderboardHandle {
    fn submit(&mut self, result: FinalScore) {
        let _ = self.tx.send(Request::Submit(result));
    }
}

/// Spawn the leaderboard task on the current runtime.
///
/// The task ends once every handle is dropped and yields the final standings.
pub fn spawn_leaderboard(capacity: usize) -> (LeaderboardHandle, JoinHandle<Leaderboard>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Request>();

    let task = tokio::spawn(async move {
        let mut board = Leaderboard::new(capacity);
        while let Some(req) = rx.recv().await {
            match req {
                Request::Submit(result) => {
                    let player = result.player.clone();
                    let score = result.score;
                    match board.record(result.into()) {
                        Some(rank) => {
                            eprintln!("[Leaderboard] {} scored {} (rank {})", player, score, rank)
                        }
                        None => eprintln!("[Leaderboard] {} scored {} (not ranked)", player, score),
                    }
                }
                Request::Top(reply) => {
                    let _ = reply.send(board.entries().to_vec());
                }
            }
        }
        board
    });

    (LeaderboardHandle { tx }, task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            player: player.to_string(),
            score,
            level: 1,
            lines: score / 100,
        }
    }

    #[test]
    fn keeps_best_five_descending() {
        let mut board = Leaderboard::new(LEADERBOARD_SIZE);
        for (i, score) in [300, 100, 700, 500, 200, 600, 0].into_iter().enumerate() {
            board.record(entry(&format!("p{}", i), score));
        }

        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![700, 600, 500, 300, 200]);
    }

    #[test]
    fn ties_keep_submission_order() {
        let mut board = Leaderboard::new(3);
        assert_eq!(board.record(entry("first", 400)), Some(1));
        assert_eq!(board.record(entry("second", 400)), Some(2));
        assert_eq!(board.record(entry("third", 400)), Some(3));
        assert_eq!(board.record(entry("fourth", 400)), None);

        let names: Vec<&str> = board.entries().iter().map(|e| e.player.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn zero_capacity_ranks_nothing() {
        let mut board = Leaderboard::new(0);
        assert_eq!(board.record(entry("a", 100)), None);
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn handle_submits_and_queries() {
        let (mut handle, task) = spawn_leaderboard(LEADERBOARD_SIZE);
        handle.submit(FinalScore {
            player: "playerOne".to_string(),
            score: 200,
            level: 3,
            lines: 2,
        });
        handle.submit(FinalScore {
            player: "playerTwo".to_string(),
            score: 500,
            level: 6,
            lines: 5,
        });

        let top = handle.top().await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player, "playerTwo");

        drop(handle);
        let board = task.await.unwrap();
        assert_eq!(board.len(), 2);
    }

    #[tokio::test]
    async fn submit_after_stop_is_ignored() {
        let (mut handle, task) = spawn_leaderboard(1);
        task.abort();
        let _ = task.await;

        handle.submit(FinalScore {
            player: "late".to_string(),
            score: 1,
            level: 1,
            lines: 0,
        });
        assert!(handle.top().await.is_err());
    }
}
