//! Mark-sweep garbage collector
//!
//! Collections only happen at request depth 0, so no native frame can hold
//! an unrooted handle while the heap is swept.

use std::any::Any;
use std::rc::Rc;
use std::time::{Duration, Instant};

use leafbind_sdk::{ClassId, JsValue};

use crate::heap::{CellData, Heap, ObjectKind};

/// Garbage collector statistics
#[derive(Debug, Clone, Default)]
pub struct GcStats {
    /// Total number of collections
    pub collections: usize,

    /// Total cells freed
    pub objects_freed: usize,

    /// Total instance payloads handed to finalizers
    pub payloads_finalized: usize,

    /// Total pause time across all collections
    pub total_pause_time: Duration,

    /// Last collection duration
    pub last_pause_time: Duration,

    /// Maximum pause time
    pub max_pause_time: Duration,

    /// Cells marked in last collection
    pub last_marked_count: usize,

    /// Cells freed in last collection
    pub last_freed_count: usize,

    /// Live cells after last collection
    pub live_objects: usize,
}

impl GcStats {
    /// Update statistics after a collection
    fn update(&mut self, pause_time: Duration, marked: usize, freed: usize, orphans: usize, live: usize) {
        self.collections += 1;
        self.objects_freed += freed;
        self.payloads_finalized += orphans;
        self.total_pause_time += pause_time;
        self.last_pause_time = pause_time;
        if pause_time > self.max_pause_time {
            self.max_pause_time = pause_time;
        }
        self.last_marked_count = marked;
        self.last_freed_count = freed;
        self.live_objects = live;
    }

    /// Average pause time
    pub fn avg_pause_time(&self) -> Duration {
        if self.collections == 0 {
            return Duration::ZERO;
        }
        self.total_pause_time / self.collections as u32
    }
}

/// Payload of a swept instance, waiting for its class finalizer
pub struct Orphan {
    /// Class of the swept instance
    pub class: ClassId,
    /// The payload, moved out of the instance
    pub payload: Rc<dyn Any>,
}

/// Mark-sweep garbage collector
pub struct GarbageCollector {
    /// Live cell count that triggers the next automatic collection
    threshold: usize,

    /// Configured floor for `threshold`
    base_threshold: usize,

    /// Statistics
    stats: GcStats,
}

impl GarbageCollector {
    /// Create a collector triggering above `threshold` live cells
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            base_threshold: threshold,
            stats: GcStats::default(),
        }
    }

    /// Check if we should collect
    pub fn should_collect(&self, heap: &Heap) -> bool {
        heap.len() > self.threshold
    }

    /// Run a collection from `roots`, returning the payloads of swept
    /// instances
    pub fn collect(&mut self, heap: &mut Heap, roots: impl Iterator<Item = JsValue>) -> Vec<Orphan> {
        let start = Instant::now();

        let marked = self.mark(heap, roots);
        let (freed, orphans) = self.sweep(heap);

        let live = heap.len();
        self.stats
            .update(start.elapsed(), marked, freed, orphans.len(), live);

        // Grow by 2x current usage
        self.threshold = (live * 2).max(self.base_threshold);

        orphans
    }

    /// Mark phase: mark all reachable cells
    /// Returns number of cells marked
    fn mark(&mut self, heap: &mut Heap, roots: impl Iterator<Item = JsValue>) -> usize {
        for cell in heap.cells_mut() {
            cell.marked = false;
        }

        let mut marked = 0;
        let mut worklist: Vec<JsValue> = roots.collect();
        while let Some(value) = worklist.pop() {
            let raw = match (value.as_object(), value.as_string()) {
                (Some(obj), _) => obj.raw(),
                (None, Some(s)) => s.raw(),
                _ => continue,
            };
            let Some(cell) = heap.cell_mut(raw) else {
                continue;
            };
            if cell.marked {
                continue;
            }
            cell.marked = true;
            marked += 1;

            if let CellData::Object(data) = &cell.data {
                worklist.extend(data.references());
            }
        }
        marked
    }

    /// Sweep phase: free unmarked cells
    /// Returns (freed_count, orphaned payloads)
    fn sweep(&mut self, heap: &mut Heap) -> (usize, Vec<Orphan>) {
        let dead = heap.sweep_unmarked();
        let freed = dead.len();

        let orphans = dead
            .into_iter()
            .filter_map(|cell| match cell.data {
                CellData::Object(data) => match data.kind {
                    ObjectKind::Instance {
                        class,
                        private: Some(payload),
                    } => Some(Orphan { class, payload }),
                    _ => None,
                },
                CellData::String(_) => None,
            })
            .collect();

        (freed, orphans)
    }

    /// Get GC statistics
    pub fn stats(&self) -> &GcStats {
        &self.stats
    }

    /// Current trigger threshold
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
