//! Tokio-backed timer scheduler
//!
//! Each armed timer is a spawned task that sleeps for the delay and then sends
//! its token over an unbounded channel. The driver multiplexes that channel
//! with host commands, so every firing is handled on the session's own task.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::Scheduler;
use crate::types::{Timer, TimerToken};

pub struct TokioScheduler {
    handle: Handle,
    tx: mpsc::UnboundedSender<TimerToken>,
    /// Sleeping task per timer, indexed by `Timer::index`
    tasks: [Option<JoinHandle<()>>; 2],
}

impl TokioScheduler {
    /// Scheduler spawning onto `handle`, plus the receiver its firings arrive on
    pub fn new(handle: Handle) -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                handle,
                tx,
                tasks: [None, None],
            },
            rx,
        )
    }

    /// Scheduler on the current runtime.
    ///
    /// Panics outside a tokio runtime.
    pub fn current() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        Self::new(Handle::current())
    }

    /// Whether a sleeping task for `timer` is still outstanding
    pub fn is_pending(&self, timer: Timer) -> bool {
        self.tasks[timer.index()]
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }
}

impl Scheduler for TokioScheduler {
    fn post(&mut self, token: TimerToken, delay_ms: u32) {
        self.cancel(token.timer);

        let tx = self.tx.clone();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
            let _ = tx.send(token);
        });
        self.tasks[token.timer.index()] = Some(task);
    }

    fn cancel(&mut self, timer: Timer) {
        if let Some(task) = self.tasks[timer.index()].take() {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for timer in Timer::ALL {
            self.cancel(timer);
        }
    }
}
