//! Game session module - the state machine tying board, piece and timers together
//!
//! A [`GameSession`] owns the board, the falling piece, score/level bookkeeping
//! and the lifecycle phase. It never reads a clock: gravity and fast drop are
//! one-shot timers posted to an injected [`Scheduler`], whose firings come back
//! through [`GameSession::on_timer`]. Each firing re-posts its timer at the
//! interval current at that moment, so a level change takes effect on the next
//! drop without any extra bookkeeping.
//!
//! Every arming of a timer carries a fresh generation. A firing whose timer was
//! cancelled (pause, game over, reset) or re-armed since it was posted no
//! longer matches and is dropped.

use crate::board::Board;
use crate::config::{ResetPolicy, SessionConfig};
use crate::piece::ActivePiece;
use crate::rng::PieceSource;
use crate::scheduler::{ManualScheduler, Scheduler};
use crate::scoring::{drop_interval_ms, line_clear_score, next_level};
use crate::sink::{FinalScore, NullSink, ScoreSink};
use crate::snapshot::GameSnapshot;
use crate::types::{
    GameAction, Phase, SettleEvent, Timer, TimerToken, FAST_DROP_MS, START_LEVEL,
};

/// One game of falling blocks, from first spawn to game over and beyond `reset`
pub struct GameSession<S: Scheduler, K: ScoreSink = NullSink> {
    config: SessionConfig,
    board: Board,
    active: ActivePiece,
    source: Box<dyn PieceSource + Send>,
    scheduler: S,
    sink: K,
    phase: Phase,
    score: u32,
    level: u32,
    lines: u32,
    drop_interval_ms: u32,
    fast_drop: bool,
    /// Current generation per timer, indexed by `Timer::index`
    generations: [u64; 2],
    /// Whether a firing of the current generation is outstanding
    armed: [bool; 2],
    /// Monotonic episode id (increments on reset)
    episode_id: u32,
    /// Monotonic count of spawned pieces, exported as `piece_id`
    pieces_spawned: u32,
    /// Last lock/line-clear event (consumed by observers)
    last_event: Option<SettleEvent>,
}

impl<S: Scheduler, K: ScoreSink> GameSession<S, K> {
    /// Create a session in `NotStarted` with its first piece already spawned.
    ///
    /// Panics if `config` fails [`SessionConfig::validation_error`].
    pub fn new(config: SessionConfig, scheduler: S, sink: K) -> Self {
        if let Some(err) = config.validation_error() {
            panic!("invalid session config: {}", err);
        }

        let board = Board::new(config.width as usize, config.height as usize);
        let mut source = config.randomizer.build(config.seed);
        let active = ActivePiece::spawn(source.next_kind(), config.spawn_column as i32, 0);

        Self {
            config,
            board,
            active,
            source,
            scheduler,
            sink,
            phase: Phase::NotStarted,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            drop_interval_ms: drop_interval_ms(START_LEVEL),
            fast_drop: false,
            generations: [0; 2],
            armed: [false; 2],
            episode_id: 0,
            pieces_spawned: 1,
            last_event: None,
        }
    }

    /// Replace the piece source; the current piece is redrawn from it.
    pub fn with_source(mut self, source: Box<dyn PieceSource + Send>) -> Self {
        self.source = source;
        self.active = ActivePiece::spawn(
            self.source.next_kind(),
            self.config.spawn_column as i32,
            0,
        );
        self
    }

    /// Start from a prepared board.
    ///
    /// Panics if the dimensions differ from the configuration. A first piece
    /// that overlaps the board content ends the game on `start`.
    pub fn with_board(mut self, board: Board) -> Self {
        assert_eq!(
            (board.width(), board.height()),
            (self.board.width(), self.board.height()),
            "board dimensions must match the session config"
        );
        self.board = board;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The falling piece. After game over this is the piece that ended it.
    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn fast_drop(&self) -> bool {
        self.fast_drop
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    /// Whether `timer` currently has an outstanding firing
    pub fn is_timer_armed(&self, timer: Timer) -> bool {
        self.armed[timer.index()]
    }

    /// Result handed to the score sink when this game ends
    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            player: self.config.player_name.clone(),
            score: self.score,
            level: self.level,
            lines: self.lines,
        }
    }

    /// Take the last settle event, leaving None behind
    pub fn take_last_event(&mut self) -> Option<SettleEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.cells.clear();
        out.cells.extend_from_slice(self.board.cells());
        out.active = if self.phase.is_over() {
            None
        } else {
            Some(self.active.into())
        };
        out.phase = self.phase;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms;
        out.fast_drop = self.fast_drop;
        out.episode_id = self.episode_id;
        out.piece_id = self.pieces_spawned;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// `NotStarted -> Running`; arms the drop timer.
    ///
    /// A first piece that does not fit ends the game at once.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running;
        if self.spawn_fits() {
            self.arm(Timer::Drop, self.drop_interval_ms);
        }
        true
    }

    /// `Running -> Paused`; cancels both timers, keeps the fast drop flag
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        self.cancel_timer(Timer::Drop);
        self.cancel_timer(Timer::FastDrop);
        true
    }

    /// `Paused -> Running`; re-arms the drop timer. A fast drop still held
    /// steps once at once and then resumes its cadence.
    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        self.arm(Timer::Drop, self.drop_interval_ms);
        if self.fast_drop {
            self.move_down();
            if self.phase.is_running() && self.fast_drop {
                self.arm(Timer::FastDrop, FAST_DROP_MS);
            }
        }
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// One gravity step; does nothing unless running
    pub fn tick(&mut self) {
        if self.phase.is_running() {
            self.move_down();
        }
    }

    /// Advance the piece one row, or settle it when it cannot fall.
    ///
    /// Returns true only if the piece moved.
    pub fn move_down(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        if self.try_translate(0, 1) {
            return true;
        }
        self.settle();
        false
    }

    pub fn move_left(&mut self) -> bool {
        self.phase.is_running() && self.try_translate(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.phase.is_running() && self.try_translate(1, 0)
    }

    /// Rotate clockwise in place; reverted when the result collides
    pub fn rotate(&mut self) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        let previous = self.active.shape;
        self.active.rotate_clockwise();
        if self.collides_now() {
            self.active.shape = previous;
            return false;
        }
        true
    }

    /// Hold or release fast drop.
    ///
    /// While running, holding advances the piece at once and then every
    /// `FAST_DROP_MS` alongside the normal drop timer; releasing cancels only
    /// the fast-drop timer. While paused only the flag is recorded, to be
    /// honoured on resume.
    pub fn set_fast_drop(&mut self, active: bool) -> bool {
        if self.fast_drop == active {
            return false;
        }
        match self.phase {
            Phase::Running => {
                self.fast_drop = active;
                if active {
                    self.move_down();
                    if self.phase.is_running() && self.fast_drop {
                        self.arm(Timer::FastDrop, FAST_DROP_MS);
                    }
                } else {
                    self.cancel_timer(Timer::FastDrop);
                }
                true
            }
            Phase::Paused => {
                self.fast_drop = active;
                true
            }
            Phase::NotStarted | Phase::GameOver => false,
        }
    }

    /// Start a fresh game from any phase.
    ///
    /// The phase afterwards follows the configured [`ResetPolicy`].
    pub fn reset(&mut self) -> bool {
        self.cancel_timer(Timer::Drop);
        self.cancel_timer(Timer::FastDrop);

        self.board.reset();
        self.score = 0;
        self.level = START_LEVEL;
        self.lines = 0;
        self.drop_interval_ms = drop_interval_ms(self.level);
        self.fast_drop = false;
        self.last_event = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.phase = match self.config.reset_policy {
            ResetPolicy::Running => Phase::Running,
            ResetPolicy::NotStarted => Phase::NotStarted,
        };

        if self.spawn_next() && self.phase.is_running() {
            self.arm(Timer::Drop, self.drop_interval_ms);
        }
        true
    }

    /// Scheduler entry point.
    ///
    /// Returns false for a stale token (cancelled or superseded since it was
    /// posted); otherwise performs the timer's work and re-arms it while the
    /// game keeps running.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        let idx = token.timer.index();
        if !self.armed[idx] || self.generations[idx] != token.generation {
            return false;
        }
        self.armed[idx] = false;

        match token.timer {
            Timer::Drop => {
                self.tick();
                if self.phase.is_running() {
                    self.arm(Timer::Drop, self.drop_interval_ms);
                }
            }
            Timer::FastDrop => {
                if self.phase.is_running() && self.fast_drop {
                    self.move_down();
                }
                if self.phase.is_running() && self.fast_drop {
                    self.arm(Timer::FastDrop, FAST_DROP_MS);
                }
            }
        }
        true
    }

    /// Apply a host command. Returns whether the session changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Start => self.start(),
            GameAction::Pause => self.pause(),
            GameAction::Resume => self.resume(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::MoveDown => {
                if !self.phase.is_running() {
                    return false;
                }
                self.move_down();
                true
            }
            GameAction::Rotate => self.rotate(),
            GameAction::FastDropOn => self.set_fast_drop(true),
            GameAction::FastDropOff => self.set_fast_drop(false),
            GameAction::Reset => self.reset(),
        }
    }

    fn collides_now(&self) -> bool {
        self.board
            .collides(&self.active.shape, self.active.x, self.active.y)
    }

    fn try_translate(&mut self, dx: i32, dy: i32) -> bool {
        if self
            .board
            .collides(&self.active.shape, self.active.x + dx, self.active.y + dy)
        {
            return false;
        }
        self.active.translate(dx, dy);
        true
    }

    /// Lock the piece, then either end the game or clear lines and spawn.
    fn settle(&mut self) {
        let piece = self.active;
        let locked_at_top = self
            .board
            .lock(&piece.shape, piece.x, piece.y, piece.kind.color());

        if locked_at_top {
            self.last_event = Some(SettleEvent {
                lines_cleared: 0,
                score_delta: 0,
                level: self.level,
                locked_at_top: true,
            });
            self.enter_game_over();
            return;
        }

        let cleared = self.board.clear_full_lines() as u32;
        let score_delta = line_clear_score(cleared);
        if cleared > 0 {
            self.score = self.score.saturating_add(score_delta);
            self.lines = self.lines.saturating_add(cleared);
            self.level = next_level(self.level, cleared);
            self.drop_interval_ms = drop_interval_ms(self.level);
        }

        self.last_event = Some(SettleEvent {
            lines_cleared: cleared,
            score_delta,
            level: self.level,
            locked_at_top: false,
        });

        self.spawn_next();
    }

    /// Draw and place the next piece. Returns false if the spawn ended the game.
    fn spawn_next(&mut self) -> bool {
        let kind = self.source.next_kind();
        self.active = ActivePiece::spawn(kind, self.config.spawn_column as i32, 0);
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        self.spawn_fits()
    }

    /// End the game if the current piece cannot be placed. Returns whether it fits.
    fn spawn_fits(&mut self) -> bool {
        if self.spawn_blocked() {
            self.enter_game_over();
            return false;
        }
        true
    }

    /// The current piece overlaps the stack or pokes out above the board
    fn spawn_blocked(&self) -> bool {
        self.collides_now() || self.active.cells().iter().any(|&(_, y)| y < 0)
    }

    fn enter_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.cancel_timer(Timer::Drop);
        self.cancel_timer(Timer::FastDrop);
        self.fast_drop = false;
        let result = self.final_score();
        self.sink.submit(result);
    }

    fn arm(&mut self, timer: Timer, delay_ms: u32) {
        let idx = timer.index();
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.armed[idx] = true;
        self.scheduler.post(
            TimerToken {
                timer,
                generation: self.generations[idx],
            },
            delay_ms,
        );
    }

    fn cancel_timer(&mut self, timer: Timer) {
        let idx = timer.index();
        if self.armed[idx] {
            self.armed[idx] = false;
            self.scheduler.cancel(timer);
        }
    }
}

impl<K: ScoreSink> GameSession<ManualScheduler, K> {
    /// Move the virtual clock forward by `ms`, delivering every timer that
    /// comes due in order. Returns the number of firings the session acted on.
    pub fn advance_clock(&mut self, ms: u64) -> usize {
        let until = self.scheduler.now_ms() + ms;
        let mut fired = 0;
        while let Some(token) = self.scheduler.pop_due(until) {
            if self.on_timer(token) {
                fired += 1;
            }
        }
        self.scheduler.set_now(until);
        fired
    }
}
