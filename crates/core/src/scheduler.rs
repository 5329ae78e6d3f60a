//! Scheduler contract - cancellable one-shot timers
//!
//! The session never sleeps or reads a clock. It asks its [`Scheduler`] to
//! post a [`TimerToken`] after a delay and hands every firing back through
//! `GameSession::on_timer`. Periodic behavior comes from the session
//! re-posting a timer each time it fires, at whatever interval is current.
//!
//! [`ManualScheduler`] keeps pending timers against a virtual millisecond
//! clock so tests and simulations can drive ticks without real delays.

use crate::types::{Timer, TimerToken};

/// Timed-callback mechanism a session depends on
pub trait Scheduler {
    /// Deliver `token` back to the session after `delay_ms`.
    ///
    /// A later post of the same timer replaces the earlier one.
    fn post(&mut self, token: TimerToken, delay_ms: u32);

    /// Drop any pending firing of `timer`.
    fn cancel(&mut self, timer: Timer);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: TimerToken,
    due_ms: u64,
    /// Post order, breaks ties between timers due at the same instant
    order: u64,
}

/// Scheduler driven by an explicit virtual clock
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    pending: Vec<Pending>,
    posts: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Whether `timer` has a pending firing
    pub fn is_pending(&self, timer: Timer) -> bool {
        self.pending.iter().any(|p| p.token.timer == timer)
    }

    /// Virtual time at which `timer` fires, if pending
    pub fn due_at(&self, timer: Timer) -> Option<u64> {
        self.pending
            .iter()
            .find(|p| p.token.timer == timer)
            .map(|p| p.due_ms)
    }

    /// Number of pending firings
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return the earliest firing due no later than `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerToken> {
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.order))?;

        let pending = self.pending.swap_remove(idx);
        self.now_ms = self.now_ms.max(pending.due_ms);
        Some(pending.token)
    }

    /// Move the clock forward without firing anything.
    ///
    /// The clock never runs backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Scheduler for ManualScheduler {
    fn post(&mut self, token: TimerToken, delay_ms: u32) {
        self.cancel(token.timer);
        self.posts += 1;
        self.pending.push(Pending {
            token,
            due_ms: self.now_ms + u64::from(delay_ms),
            order: self.posts,
        });
    }

    fn cancel(&mut self, timer: Timer) {
        self.pending.retain(|p| p.token.timer != timer);
    }
}
