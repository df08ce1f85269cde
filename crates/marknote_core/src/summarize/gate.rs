//! Per-note sequencing of summary requests.
//!
//! Several requests for one note may be in flight at once. Only the most
//! recently issued one is allowed to deliver its result; older ones are
//! dropped when they resolve, whatever order they finish in.

use crate::model::note::NoteId;
use log::debug;
use std::collections::HashMap;

use super::SummaryResult;

/// Handle for one issued summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTicket {
    note_id: NoteId,
    sequence: u64,
}

impl SummaryTicket {
    pub fn note_id(&self) -> &str {
        &self.note_id
    }
}

#[derive(Debug, Default)]
pub struct SummaryGate {
    latest: HashMap<NoteId, u64>,
    next_sequence: u64,
}

impl SummaryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new request for `note_id`, superseding earlier ones.
    pub fn begin(&mut self, note_id: &str) -> SummaryTicket {
        self.next_sequence += 1;
        self.latest.insert(note_id.to_string(), self.next_sequence);
        SummaryTicket {
            note_id: note_id.to_string(),
            sequence: self.next_sequence,
        }
    }

    pub fn is_current(&self, ticket: &SummaryTicket) -> bool {
        self.latest.get(&ticket.note_id) == Some(&ticket.sequence)
    }

    pub fn in_flight(&self, note_id: &str) -> bool {
        self.latest.contains_key(note_id)
    }

    /// Returns `result` if `ticket` is still the latest for its note.
    pub fn finish(
        &mut self,
        ticket: SummaryTicket,
        result: SummaryResult,
    ) -> Option<SummaryResult> {
        if !self.is_current(&ticket) {
            debug!(
                "event=summary_gate module=summarize status=stale note_id={} sequence={}",
                ticket.note_id, ticket.sequence
            );
            return None;
        }
        self.latest.remove(&ticket.note_id);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryGate;
    use crate::summarize::SummaryResult;

    #[test]
    fn stale_ticket_is_dropped_even_if_it_resolves_last() {
        let mut gate = SummaryGate::new();
        let first = gate.begin("n1");
        let second = gate.begin("n1");

        let delivered = gate.finish(second, SummaryResult::success("new"));
        assert_eq!(delivered.unwrap().summary, "new");
        assert!(gate.finish(first, SummaryResult::success("old")).is_none());
        assert!(!gate.in_flight("n1"));
    }

    #[test]
    fn tickets_for_different_notes_are_independent() {
        let mut gate = SummaryGate::new();
        let a = gate.begin("a");
        let b = gate.begin("b");
        assert!(gate.is_current(&a));
        assert!(gate.is_current(&b));
        assert_eq!(a.note_id(), "a");
        assert!(gate.finish(a, SummaryResult::success("sa")).is_some());
        assert!(gate.in_flight("b"));
    }
}
