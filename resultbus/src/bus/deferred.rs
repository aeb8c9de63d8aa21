use std::collections::{HashMap, VecDeque};

use crate::screen::ScreenId;

/// Per-screen FIFO of work waiting for the screen to come back to the foreground.
///
/// The queue itself never runs anything: the owner pops one action at a time
/// so that actions enqueued while it is draining are picked up by the same
/// drain.
#[derive(Debug)]
pub struct DeferredActionQueue<A> {
    queues: HashMap<ScreenId, VecDeque<A>>,
}

impl<A> DeferredActionQueue<A> {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }

    pub fn enqueue(&mut self, screen: ScreenId, action: A) {
        self.queues.entry(screen).or_insert_with(VecDeque::new).push_back(action);
    }

    pub fn pop(&mut self, screen: ScreenId) -> Option<A> {
        let queue = self.queues.get_mut(&screen)?;
        let action = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(&screen);
        }
        action
    }

    pub fn len(&self, screen: ScreenId) -> usize {
        self.queues.get(&screen).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, screen: ScreenId) -> bool {
        self.len(screen) == 0
    }

    /// Drops everything queued for `screen`, handing it back so the caller
    /// decides when the actions are dropped.
    pub fn evict(&mut self, screen: ScreenId) -> VecDeque<A> {
        self.queues.remove(&screen).unwrap_or_default()
    }
}

impl<A> Default for DeferredActionQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_per_screen() {
        let mut queue = DeferredActionQueue::new();
        let a = ScreenId::next();
        let b = ScreenId::next();

        queue.enqueue(a, "a1");
        queue.enqueue(b, "b1");
        queue.enqueue(a, "a2");

        assert_eq!(queue.len(a), 2);
        assert_eq!(queue.pop(a), Some("a1"));
        assert_eq!(queue.pop(a), Some("a2"));
        assert_eq!(queue.pop(a), None);
        assert_eq!(queue.pop(b), Some("b1"));
        assert!(queue.is_empty(b));
    }

    #[test]
    fn test_growth_while_popping() {
        let mut queue = DeferredActionQueue::new();
        let screen = ScreenId::next();
        queue.enqueue(screen, 0);

        let mut seen = Vec::new();
        while let Some(n) = queue.pop(screen) {
            seen.push(n);
            if n < 3 {
                queue.enqueue(screen, n + 1);
            }
        }

        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert!(queue.is_empty(screen));
    }

    #[test]
    fn test_evict() {
        let mut queue = DeferredActionQueue::new();
        let screen = ScreenId::next();
        queue.enqueue(screen, 1);
        queue.enqueue(screen, 2);

        assert_eq!(queue.evict(screen).len(), 2);
        assert!(queue.is_empty(screen));
        assert!(queue.evict(screen).is_empty());
    }
}
