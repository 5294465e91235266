//! Per-check bounded result history

use dashmap::DashMap;
use std::collections::VecDeque;

use super::bounded::BoundedPush;
use super::types::EvaluationResult;
use crate::config::default_history_capacity;

/// Bounded, oldest-evicted history of evaluation results keyed by check id
///
/// Each id's history is only touched under that id's shard lock, so a timer
/// tick and a manual execution of the same check never interleave a write.
#[derive(Debug)]
pub struct ResultStore {
    histories: DashMap<String, VecDeque<EvaluationResult>>,
    capacity: usize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            histories: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start tracking an id; existing history is kept
    pub fn create(&self, id: &str) {
        self.histories
            .entry(id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
    }

    /// Stop tracking an id and drop its history
    pub fn remove(&self, id: &str) -> bool {
        self.histories.remove(id).is_some()
    }

    /// Append a result, trimming to capacity.
    ///
    /// Returns `false` when the id is not tracked and the result was dropped.
    pub fn record(&self, id: &str, result: EvaluationResult) -> bool {
        match self.histories.get_mut(id) {
            Some(mut history) => {
                history.push_bounded(result, self.capacity);
                true
            }
            None => false,
        }
    }

    /// Most recent result
    pub fn latest(&self, id: &str) -> Option<EvaluationResult> {
        self.histories
            .get(id)
            .and_then(|history| history.back().cloned())
    }

    /// Stored results, oldest first; `limit` keeps only the most recent ones
    pub fn history(&self, id: &str, limit: Option<usize>) -> Option<Vec<EvaluationResult>> {
        self.histories.get(id).map(|history| {
            let skip = limit.map_or(0, |limit| history.len().saturating_sub(limit));
            history.iter().skip(skip).cloned().collect()
        })
    }

    pub fn len(&self, id: &str) -> usize {
        self.histories.get(id).map_or(0, |history| history.len())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.histories.contains_key(id)
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(default_history_capacity())
    }
}
