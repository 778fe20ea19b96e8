/// Deferred-work queue for the sphere tree.
///
/// Nodes waiting for integration or recompute are pushed here and drained
/// by `SphereTree::process`. Every push returns a ticket the node keeps so
/// the entry can be cancelled in O(1) if the node is unlinked or freed
/// before the queue reaches it. Cancelled entries stay in place as holes
/// and are skipped on pop; holes at either end are trimmed eagerly.

use std::collections::VecDeque;

/// Position of an entry in a WorkQueue, stable until the entry is popped.
pub type QueueTicket = u64;

pub struct WorkQueue {
    entries: VecDeque<Option<u32>>,
    /// Ticket of `entries[0]`
    head: QueueTicket,
    live: usize,
}

impl WorkQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            head: 0,
            live: 0,
        }
    }

    /// Append a node index, returning its cancellation ticket
    pub fn push(&mut self, node: u32) -> QueueTicket {
        let ticket = self.head + self.entries.len() as QueueTicket;
        self.entries.push_back(Some(node));
        self.live += 1;
        ticket
    }

    /// Remove the oldest pending node, skipping cancelled entries
    pub fn pop(&mut self) -> Option<u32> {
        while let Some(entry) = self.entries.pop_front() {
            self.head += 1;
            if let Some(node) = entry {
                self.live -= 1;
                return Some(node);
            }
        }
        None
    }

    /// Cancel the entry behind `ticket`. Returns false if it was already
    /// popped or cancelled.
    pub fn cancel(&mut self, ticket: QueueTicket) -> bool {
        let Some(offset) = ticket.checked_sub(self.head) else {
            return false;
        };
        let cancelled = match self.entries.get_mut(offset as usize) {
            Some(entry) => entry.take().is_some(),
            None => false,
        };
        if cancelled {
            self.live -= 1;
            self.trim();
        }
        cancelled
    }

    fn trim(&mut self) {
        while matches!(self.entries.back(), Some(None)) {
            self.entries.pop_back();
        }
        while matches!(self.entries.front(), Some(None)) {
            self.entries.pop_front();
            self.head += 1;
        }
    }

    /// Number of pending (non-cancelled) entries
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = WorkQueue::with_capacity(4);
        queue.push(3);
        queue.push(1);
        queue.push(2);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_middle_entry_is_skipped() {
        let mut queue = WorkQueue::with_capacity(4);
        queue.push(10);
        let middle = queue.push(11);
        queue.push(12);

        assert!(queue.cancel(middle));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(10));
        assert_eq!(queue.pop(), Some(12));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_cancel_twice_or_after_pop() {
        let mut queue = WorkQueue::with_capacity(2);
        let first = queue.push(1);
        let second = queue.push(2);

        assert_eq!(queue.pop(), Some(1));
        assert!(!queue.cancel(first));
        assert!(queue.cancel(second));
        assert!(!queue.cancel(second));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tickets_stay_valid_after_trim() {
        let mut queue = WorkQueue::with_capacity(4);
        let a = queue.push(1);
        let b = queue.push(2);
        let c = queue.push(3);

        // Cancelling the head trims it; later tickets must still resolve
        assert!(queue.cancel(a));
        assert!(queue.cancel(c));
        assert_eq!(queue.len(), 1);
        assert!(queue.cancel(b));
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_repeated_push_cancel_does_not_accumulate() {
        let mut queue = WorkQueue::with_capacity(2);
        queue.push(0);
        for i in 1..1000 {
            let ticket = queue.push(i);
            queue.cancel(ticket);
        }
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.entries.len(), 1);
    }
}
