use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

pub use self::clock::{Clock, ManualClock, SystemClock};

/// One-shot timers, fired in deadline order by whoever owns the queue.
///
/// Timers with equal deadlines fire in the order they were scheduled.
pub struct TimerQueue<T> {
    next_seq: u64,
    timers: BinaryHeap<Reverse<TimerData<T>>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            timers: BinaryHeap::new(),
        }
    }

    pub fn schedule(&mut self, deadline: Instant, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.timers.push(Reverse(TimerData {
            deadline,
            seq,
            payload,
        }));
    }

    /// Removes and returns the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        let due = self.timers.peek().map_or(false, |t| t.0.deadline <= now);
        if due {
            self.timers.pop().map(|t| t.0.payload)
        } else {
            None
        }
    }

    pub fn get_next_deadline(&self) -> Option<Instant> {
        self.timers.peek().map(|t| t.0.deadline)
    }

    /// Time left until the next deadline, zero if one is already due.
    pub fn get_sleep_time(&self, now: Instant) -> Option<Duration> {
        self.get_next_deadline().map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.timers.len())
            .field("next_deadline", &self.get_next_deadline())
            .finish()
    }
}

struct TimerData<T> {
    deadline: Instant,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for TimerData<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for TimerData<T> { }

impl<T> PartialOrd for TimerData<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TimerData<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline.cmp(&other.deadline).then(self.seq.cmp(&other.seq))
    }
}

mod clock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_before_deadline() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(start + Duration::from_millis(100), "late");

        assert_eq!(queue.pop_due(start), None);
        assert_eq!(queue.pop_due(start + Duration::from_millis(99)), None);
        assert_eq!(queue.pop_due(start + Duration::from_millis(100)), Some("late"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(start + Duration::from_millis(300), 3);
        queue.schedule(start + Duration::from_millis(100), 1);
        queue.schedule(start + Duration::from_millis(200), 2);

        let later = start + Duration::from_secs(1);
        let fired = std::iter::from_fn(|| queue.pop_due(later)).collect::<Vec<_>>();

        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_deadlines_keep_schedule_order() {
        let deadline = Instant::now();
        let mut queue = TimerQueue::new();
        for i in 0..5 {
            queue.schedule(deadline, i);
        }

        let fired = std::iter::from_fn(|| queue.pop_due(deadline)).collect::<Vec<_>>();

        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_sleep_time() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        assert_eq!(queue.get_sleep_time(start), None);

        queue.schedule(start + Duration::from_millis(50), ());

        assert_eq!(queue.get_sleep_time(start), Some(Duration::from_millis(50)));
        assert_eq!(queue.get_sleep_time(start + Duration::from_secs(1)), Some(Duration::from_secs(0)));
    }
}
