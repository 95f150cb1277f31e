use crate::PendingRequest;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Min-priority wrapper: `BinaryHeap` is a max-heap, so we invert the
/// comparison on `priority` and break ties by insertion sequence (earlier
/// insertions pop first among equal priorities, matching spec.md §4.B's
/// "any order is acceptable, typically insertion order").
struct Entry {
    priority: i64,
    sequence: u64,
    request: PendingRequest,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}
impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

struct Inner {
    heap: BinaryHeap<Entry>,
    next_sequence: u64,
}

/// Thread-safe min-priority queue of pending requests. Unbounded per
/// spec.md §5's reference design — enqueue never blocks.
pub(crate) struct PriorityQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl PriorityQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                heap: BinaryHeap::new(),
                next_sequence: 0,
            }),
            notify: Notify::new(),
        }
    }

    pub(crate) fn push(&self, request: PendingRequest) {
        let mut inner = self.inner.lock().unwrap();
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.heap.push(Entry {
            priority: request.priority,
            sequence,
            request,
        });
        drop(inner);
        self.notify.notify_one();
    }

    /// Current number of entries waiting to be dispatched. For
    /// diagnostics only; not synchronized with `drain_batch`.
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap().heap.len()
    }

    /// Waits for at least one entry, then drains up to `max` entries in
    /// priority order (lowest depth first).
    pub(crate) async fn drain_batch(&self, max: usize) -> Vec<PendingRequest> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if !inner.heap.is_empty() {
                    let mut batch = Vec::with_capacity(max.min(inner.heap.len()));
                    while batch.len() < max {
                        match inner.heap.pop() {
                            Some(entry) => batch.push(entry.request),
                            None => break,
                        }
                    }
                    return batch;
                }
            }
            self.notify.notified().await;
        }
    }
}
