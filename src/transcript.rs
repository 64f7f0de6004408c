//! Bounded conversation history.

use crate::observability::TRANSCRIPT_EVICTIONS;
use crate::types::Turn;

/// Default number of turns kept in a transcript.
pub const MAX_HISTORY: usize = 30;

/// The ordered, bounded history of turns in the current conversation.
///
/// After every [`push`](Transcript::push) the transcript holds at most
/// `max_history` turns; the oldest turns are evicted first and the rest keep
/// their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
    max_history: usize,
}

impl Transcript {
    /// Creates an empty transcript holding at most `max_history` turns.
    ///
    /// A bound of zero is raised to one so the turn just pushed is always sent.
    pub fn new(max_history: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Appends a turn, evicting from the front to stay within bound.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        if self.turns.len() > self.max_history {
            let excess = self.turns.len() - self.max_history;
            self.turns.drain(..excess);
            TRANSCRIPT_EVICTIONS.count(excess as u64);
        }
    }

    /// The turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// A copy of the turns for building a request.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Number of turns held.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true when no turns are held.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The configured bound.
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Drops every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}
