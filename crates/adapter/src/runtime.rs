//! Driver runtime - hosts one session on a tokio task
//!
//! Timer firings from the [`TokioScheduler`] and host command lines are
//! multiplexed with `tokio::select!` onto the driver's task, so the session is
//! only ever mutated from one place. Output lines go to an unbounded channel;
//! the binary forwards them to stdout.

use anyhow::Result;
use tokio::sync::mpsc;

use crate::config::RunConfig;
use crate::core::{GameSession, GameSnapshot, PieceSource};
use crate::leaderboard::LeaderboardHandle;
use crate::protocol::{
    build_observation, create_error, create_leaderboard, parse_input_line, ErrorCode, InputLine,
};
use crate::scheduler::TokioScheduler;
use crate::types::{Phase, SettleEvent, TimerToken};

pub type DriverSession = GameSession<TokioScheduler, LeaderboardHandle>;

enum Event {
    Timer(TimerToken),
    Line(Option<String>),
}

pub struct Driver {
    session: DriverSession,
    timers: mpsc::UnboundedReceiver<TimerToken>,
    leaderboard: LeaderboardHandle,
    out: mpsc::UnboundedSender<String>,
    auto_start: bool,
    observe_every_tick: bool,
    seq: u64,
    last_phase: Phase,
    snapshot: GameSnapshot,
}

impl Driver {
    /// Build a driver on the current tokio runtime.
    ///
    /// `config` must already be validated.
    pub fn new(
        config: &RunConfig,
        leaderboard: LeaderboardHandle,
        out: mpsc::UnboundedSender<String>,
    ) -> Self {
        let (scheduler, timers) = TokioScheduler::current();
        let session = GameSession::new(config.session.clone(), scheduler, leaderboard.clone());
        let last_phase = session.phase();

        Self {
            session,
            timers,
            leaderboard,
            out,
            auto_start: config.auto_start,
            observe_every_tick: config.observe_every_tick,
            seq: 0,
            last_phase,
            snapshot: GameSnapshot::default(),
        }
    }

    /// Replace the piece source before the driver runs
    pub fn with_source(mut self, source: Box<dyn PieceSource + Send>) -> Self {
        self.session = self.session.with_source(source);
        self
    }

    pub fn session(&self) -> &DriverSession {
        &self.session
    }

    /// Serve `commands` until it closes or a `quit` line arrives.
    ///
    /// Returns the final session state.
    pub async fn run(mut self, mut commands: mpsc::Receiver<String>) -> Result<GameSnapshot> {
        let config = self.session.config();
        eprintln!(
            "[Driver] {}x{} board, spawn column {}, player {}, {} pieces (seed {})",
            config.width,
            config.height,
            config.spawn_column,
            config.player_name,
            config.randomizer.as_str(),
            config.seed
        );

        if self.auto_start {
            self.session.start();
            self.note_phase();
        }
        self.emit_observation(None);

        loop {
            let event = tokio::select! {
                Some(token) = self.timers.recv() => Event::Timer(token),
                line = commands.recv() => Event::Line(line),
            };

            match event {
                Event::Timer(token) => self.handle_timer(token),
                Event::Line(Some(line)) => {
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
                Event::Line(None) => {
                    eprintln!("[Driver] input closed");
                    break;
                }
            }
        }

        self.session.snapshot_into(&mut self.snapshot);
        eprintln!(
            "[Driver] stopped: phase={} score={} level={} lines={}",
            self.snapshot.phase.as_str(),
            self.snapshot.score,
            self.snapshot.level,
            self.snapshot.lines
        );
        Ok(self.snapshot)
    }

    fn handle_timer(&mut self, token: TimerToken) {
        if !self.session.on_timer(token) {
            return;
        }
        let event = self.session.take_last_event();
        let changed = self.note_phase();
        if self.observe_every_tick || event.is_some() || changed {
            self.emit_observation(event);
        }
    }

    /// Returns false when the driver should stop.
    async fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }

        match parse_input_line(line) {
            Ok(InputLine::Actions(actions)) => {
                // One observation per settle, plus one for the final state.
                let mut up_to_date = false;
                for action in actions.0 {
                    let changed = self.session.apply_action(action);
                    match self.session.take_last_event() {
                        Some(event) => {
                            self.note_phase();
                            self.emit_observation(Some(event));
                            up_to_date = true;
                        }
                        None if changed => up_to_date = false,
                        None => {}
                    }
                }
                if !up_to_date {
                    self.note_phase();
                    self.emit_observation(None);
                }
            }
            Ok(InputLine::Leaderboard) => match self.leaderboard.top().await {
                Ok(entries) => {
                    let msg = create_leaderboard(self.next_seq(), entries);
                    self.emit(&msg);
                }
                Err(e) => {
                    let msg = create_error(self.next_seq(), ErrorCode::Unavailable, &e.to_string());
                    self.emit(&msg);
                }
            },
            Ok(InputLine::Quit) => {
                eprintln!("[Driver] quit requested");
                return false;
            }
            Err(e) => {
                let msg = create_error(self.next_seq(), ErrorCode::InvalidCommand, &e.to_string());
                self.emit(&msg);
            }
        }
        true
    }

    /// Log a phase transition since the last call; returns whether one happened.
    fn note_phase(&mut self) -> bool {
        let phase = self.session.phase();
        if phase == self.last_phase {
            return false;
        }

        if phase.is_over() {
            let result = self.session.final_score();
            eprintln!(
                "[Session] game over: player={} score={} level={} lines={}",
                result.player, result.score, result.level, result.lines
            );
        } else {
            eprintln!(
                "[Session] {} -> {} (episode {})",
                self.last_phase.as_str(),
                phase.as_str(),
                self.session.episode_id()
            );
        }
        self.last_phase = phase;
        true
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn emit_observation(&mut self, event: Option<SettleEvent>) {
        self.session.snapshot_into(&mut self.snapshot);
        let seq = self.next_seq();
        let obs = build_observation(&self.snapshot, seq, event);
        self.emit(&obs);
    }

    fn emit<T: serde::Serialize>(&self, msg: &T) {
        match serde_json::to_string(msg) {
            Ok(line) => {
                let _ = self.out.send(line);
            }
            Err(e) => eprintln!("[Driver] failed to encode message: {}", e),
        }
    }
}
