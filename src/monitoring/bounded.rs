//! Bounded collection utilities for result history

use std::collections::VecDeque;

/// Helper trait for bounded VecDeque operations
pub(super) trait BoundedPush<T> {
    fn push_bounded(&mut self, value: T, max_size: usize);
}

impl<T> BoundedPush<T> for VecDeque<T> {
    /// Push a value, evicting from the front until at most `max_size` remain
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: usize) {
        while self.len() >= max_size.max(1) {
            self.pop_front();
        }
        self.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_bounded_evicts_oldest() {
        let mut queue = VecDeque::new();
        for i in 0..5 {
            queue.push_bounded(i, 3);
        }
        assert_eq!(queue, VecDeque::from(vec![2, 3, 4]));
    }

    #[test]
    fn test_push_bounded_shrinks_after_capacity_change() {
        let mut queue: VecDeque<_> = (0..10).collect();
        queue.push_bounded(10, 4);
        assert_eq!(queue, VecDeque::from(vec![7, 8, 9, 10]));
    }
}
