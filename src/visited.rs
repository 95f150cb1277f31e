//! Component D from spec.md §4.D: a deduplication set guarded by a
//! single exclusive lock. Reads and writes are both short, so one
//! `Mutex` beats sharding or a lock-free structure here — per spec.md's
//! own rationale.

use std::collections::HashSet;
use std::sync::Mutex;

pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashSet::new()),
        }
    }

    /// Returns whether `key` has already been recorded.
    pub fn seen(&self, key: &str) -> bool {
        self.inner.lock().unwrap().contains(key)
    }

    /// Records `key` as visited.
    pub fn set(&self, key: impl Into<String>) {
        self.inner.lock().unwrap().insert(key.into());
    }

    /// Atomically checks and records `key` in a single critical section.
    /// Returns `true` if `key` was already present (the caller should
    /// skip), `false` if this call just marked it for the first time.
    ///
    /// `seen` followed by a separate `set` would race: two workers
    /// discovering the same child from different parent pages could both
    /// observe `seen == false` and both enqueue it. Folding the check and
    /// the mark into one lock acquisition is what makes step 5 of the
    /// racer's callback ("if seen, skip; otherwise create and enqueue")
    /// actually exclusive.
    pub fn check_and_mark(&self, key: &str) -> bool {
        let mut guard = self.inner.lock().unwrap();
        if guard.contains(key) {
            true
        } else {
            guard.insert(key.to_string());
            false
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new()
    }
}
