//! Virtual-time scheduler for delayed transitions
//!
//! Nothing here reads a real clock. The host reports elapsed time and the
//! timeline hands back whatever came due, in due order. Entries due at the
//! same instant come back in the order they were scheduled.

use std::collections::BTreeMap;

/// Milliseconds on the host's clock
pub type Millis = u64;

/// Handle for cancelling a scheduled entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
pub struct Timeline<T> {
    now: Millis,
    next_id: u64,
    queue: BTreeMap<(Millis, TimerId), T>,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self { now: 0, next_id: 0, queue: BTreeMap::new() }
    }

    /// Current time: the latest instant reached by `pop_due` or `advance_to`
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Queue `item` to come due `delay` ms after now
    pub fn schedule(&mut self, delay: Millis, item: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now.saturating_add(delay), id), item);
        id
    }

    /// Returns false if the entry already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.queue.keys().find(|(_, t)| *t == id).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    /// Drop every pending entry, returning how many there were
    pub fn cancel_all(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }

    /// Remove the earliest entry due at or before `until`, moving the clock to
    /// its due time so anything it schedules is measured from that instant.
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, T)> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let ((due, _), item) = self.queue.pop_first()?;
        self.now = self.now.max(due);
        Some((due, item))
    }

    /// Move the clock forward; never backwards
    pub fn advance_to(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(due, _)| *due)
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(tl: &mut Timeline<&'static str>, until: Millis) -> Vec<(Millis, &'static str)> {
        std::iter::from_fn(|| tl.pop_due(until)).collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut tl = Timeline::new();
        tl.schedule(300, "c");
        tl.schedule(100, "a");
        tl.schedule(200, "b");
        assert_eq!(tl.next_due(), Some(100));
        assert_eq!(drain(&mut tl, 250), vec![(100, "a"), (200, "b")]);
        assert_eq!(tl.now(), 200);
        assert_eq!(tl.pending(), 1);
    }

    #[test]
    fn test_same_instant_keeps_schedule_order() {
        let mut tl = Timeline::new();
        tl.schedule(0, "first");
        tl.schedule(0, "second");
        tl.schedule(0, "third");
        let order: Vec<_> = drain(&mut tl, 0).into_iter().map(|(_, s)| s).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut tl = Timeline::new();
        tl.schedule(1000, "x");
        assert!(tl.pop_due(999).is_none());
        assert_eq!(tl.now(), 0);
        assert_eq!(tl.pop_due(1000), Some((1000, "x")));
    }

    #[test]
    fn test_delays_are_relative_to_firing_instant() {
        let mut tl = Timeline::new();
        tl.schedule(2000, "settle");
        let (due, _) = tl.pop_due(10_000).unwrap();
        assert_eq!(due, 2000);
        tl.schedule(2000, "clear");
        assert_eq!(tl.next_due(), Some(4000));
    }

    #[test]
    fn test_cancel() {
        let mut tl = Timeline::new();
        let a = tl.schedule(10, "a");
        let b = tl.schedule(20, "b");
        assert!(tl.cancel(a));
        assert!(!tl.cancel(a));
        assert_eq!(drain(&mut tl, 100), vec![(20, "b")]);
        assert!(!tl.cancel(b));
    }

    #[test]
    fn test_cancel_all() {
        let mut tl = Timeline::new();
        tl.schedule(10, "a");
        tl.schedule(20, "b");
        assert_eq!(tl.cancel_all(), 2);
        assert!(drain(&mut tl, 100).is_empty());
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut tl: Timeline<()> = Timeline::new();
        tl.advance_to(500);
        tl.advance_to(100);
        assert_eq!(tl.now(), 500);
    }
}
