use std::collections::{BTreeMap, HashMap};

use crate::clock::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Delayed callbacks, fired in deadline order. Timers sharing a deadline
/// fire in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_seq: u64,
    pending: BTreeMap<(Millis, u64), T>,
    deadlines: HashMap<TimerId, Millis>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Millis, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert((at, seq), payload);
        let id = TimerId(seq);
        self.deadlines.insert(id, at);
        id
    }

    /// Returns the payload if the timer had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let at = self.deadlines.remove(&id)?;
        self.pending.remove(&(at, id.0))
    }

    /// Pop the earliest timer due at or before `now`, with its deadline
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, Millis, T)> {
        let (&(at, seq), _) = self.pending.iter().next()?;
        if at > now {
            return None;
        }
        let payload = self.pending.remove(&(at, seq))?;
        let id = TimerId(seq);
        self.deadlines.remove(&id);
        Some((id, at, payload))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(300, "c");
        q.schedule(100, "a");
        q.schedule(200, "b");

        assert_eq!(q.pop_due(1_000).map(|(_, _, p)| p), Some("a"));
        assert_eq!(q.pop_due(1_000).map(|(_, _, p)| p), Some("b"));
        assert_eq!(q.pop_due(1_000).map(|(_, _, p)| p), Some("c"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(100, 1);
        q.schedule(100, 2);

        assert_eq!(q.pop_due(100).map(|(_, _, p)| p), Some(1));
        assert_eq!(q.pop_due(100).map(|(_, _, p)| p), Some(2));
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(500, ());

        assert!(q.pop_due(499).is_none());
        assert_eq!(q.len(), 1);
        let (_, at, _) = q.pop_due(900).unwrap();
        assert_eq!(at, 500);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut q = TimerQueue::new();
        let id = q.schedule(100, "x");

        assert_eq!(q.cancel(id), Some("x"));
        assert!(q.is_empty());
        assert!(q.pop_due(1_000).is_none());
        // second cancel is a no-op
        assert_eq!(q.cancel(id), None);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10, 1);
        q.pop_due(10);

        assert_eq!(q.cancel(id), None);
    }
}
