use std::collections::VecDeque;

use serde::{Serialize, Serializer};

use super::model::Position;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Sliding window of recent positions, most recent last.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Position>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the history with `position` at the tail, the oldest entry
    /// dropped first when full.
    pub fn append(mut self, position: Position) -> Self {
        self.push(position);
        self
    }

    pub fn push(&mut self, position: Position) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(position);
    }

    /// The last `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> Vec<Position> {
        let skip = self.samples.len().saturating_sub(count);
        self.samples.iter().skip(skip).copied().collect()
    }

    pub fn latest(&self) -> Option<&Position> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for History {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.samples.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(n: i64) -> Position {
        Position::new(n as f64 * 0.0001, 0.0, n)
    }

    #[test]
    fn test_append_keeps_order() {
        let history = History::new().append(sample(1)).append(sample(2));
        let stamps: Vec<i64> = history.iter().map(|p| p.captured_at_millis).collect();
        assert_eq!(stamps, vec![1, 2]);
        assert_eq!(history.latest().unwrap().captured_at_millis, 2);
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut history = History::new();
        for n in 1..=51 {
            history.push(sample(n));
        }

        assert_eq!(history.len(), 50);
        let stamps: Vec<i64> = history.iter().map(|p| p.captured_at_millis).collect();
        let expected: Vec<i64> = (2..=51).collect();
        assert_eq!(stamps, expected);
    }

    #[test]
    fn test_recent_window() {
        let mut history = History::with_capacity(10);
        for n in 1..=8 {
            history.push(sample(n));
        }
        let recent: Vec<i64> = history.recent(5).iter().map(|p| p.captured_at_millis).collect();
        assert_eq!(recent, vec![4, 5, 6, 7, 8]);

        let short = History::new().append(sample(1)).append(sample(2));
        assert_eq!(short.recent(5).len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let history = History::with_capacity(0).append(sample(1)).append(sample(2));
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().captured_at_millis, 2);
    }
}
