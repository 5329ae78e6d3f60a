//! Final-score hand-off at game over.
//!
//! The session calls [`ScoreSink::submit`] exactly once per finished game and
//! never waits on, inspects, or retries the result.

/// Immutable result of one finished game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalScore {
    pub player: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

/// Receives final scores; implementations must not block
pub trait ScoreSink {
    fn submit(&mut self, result: FinalScore);
}

/// Discards every result
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn submit(&mut self, _result: FinalScore) {}
}

/// Records results in submission order
impl ScoreSink for Vec<FinalScore> {
    fn submit(&mut self, result: FinalScore) {
        self.push(result);
    }
}
