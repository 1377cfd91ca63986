//! Stable display ordering for conversation snapshots.
//!
//! Streaming updates and tool dispatch can surface messages to
//! observers out of arrival order. [`MessageOrder`] assigns each message
//! id a sequence number the first time it is seen and never reassigns
//! it, so a sorted view stays stable no matter how later snapshots are
//! shuffled.

use std::collections::HashMap;

use crate::chat::ChatMessage;

/// Assigns first-seen monotonic sequence numbers to message ids.
#[derive(Debug, Default)]
pub struct MessageOrder {
    seq: HashMap<String, u64>,
    next: u64,
}

impl MessageOrder {
    /// Creates an empty order tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every unseen message id, assigning each the next
    /// sequence number. Ids seen before keep their original number.
    pub fn observe(&mut self, messages: &[ChatMessage]) {
        for msg in messages {
            if !self.seq.contains_key(&msg.id) {
                self.seq.insert(msg.id.clone(), self.next);
                self.next += 1;
            }
        }
    }

    /// Returns the sequence number assigned to `id`, if it has been seen.
    pub fn sequence_of(&self, id: &str) -> Option<u64> {
        self.seq.get(id).copied()
    }

    /// Observes `messages` and returns them sorted by assigned sequence.
    ///
    /// Sorting is idempotent: re-sorting any permutation of the same
    /// messages yields the same order, because sequence numbers are
    /// fixed at first sight.
    pub fn sorted(&mut self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        self.observe(messages);
        let mut view: Vec<ChatMessage> = messages.to_vec();
        // Every id has a sequence after observe; 0 is unreachable filler.
        view.sort_by_key(|m| self.seq.get(&m.id).copied().unwrap_or(0));
        view
    }
}
