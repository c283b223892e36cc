use std::collections::VecDeque;

/// Events carry a stable name for traceability.
pub trait NamedEvent {
    fn name(&self) -> &'static str;
}

/// Record of a dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord {
    pub seq: u64,
    pub kind: &'static str,
}

/// Single-threaded FIFO of pending events.
///
/// Events are handed out strictly in submission order; every event popped is
/// recorded in the dispatch history with its sequence number.
#[derive(Debug)]
pub struct EventBus<E> {
    pending: VecDeque<(u64, E)>,
    next_seq: u64,
    history: Vec<DispatchRecord>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
            next_seq: 0,
            history: Vec::new(),
        }
    }
}

impl<E: NamedEvent> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event`; returns its sequence number.
    pub fn emit(&mut self, event: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push_back((seq, event));
        seq
    }

    /// Takes the oldest pending event.
    pub fn next_event(&mut self) -> Option<E> {
        let (seq, event) = self.pending.pop_front()?;
        self.history.push(DispatchRecord {
            seq,
            kind: event.name(),
        });
        Some(event)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn history(&self) -> &[DispatchRecord] {
        &self.history
    }

    pub fn drain_history(&mut self) -> Vec<DispatchRecord> {
        std::mem::take(&mut self.history)
    }
}
