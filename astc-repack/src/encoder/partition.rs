//! Splitting one image's block rows across a fixed set of workers.

use std::ops::Range;

/// Contiguous assignment of block rows to workers.
///
/// Rows are spread as evenly as possible; the first `rows % workers`
/// workers take one extra row. Workers beyond the row count receive an
/// empty range but are still part of the partition.
///
/// # Example
///
/// ```
/// use astc_repack::encoder::WorkPartition;
///
/// let partition = WorkPartition::new(10, 4);
/// let ranges: Vec<_> = partition.ranges().collect();
///
/// assert_eq!(ranges, vec![0..3, 3..6, 6..8, 8..10]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkPartition {
    rows: u32,
    workers: usize,
}

/// One worker's share of the output buffer.
#[derive(Debug)]
pub struct WorkerSlice<'a> {
    /// Worker index in `0..workers`.
    pub worker: usize,
    /// Block rows assigned to this worker.
    pub rows: Range<u32>,
    /// Output bytes for exactly those rows.
    pub out: &'a mut [u8],
}

impl WorkPartition {
    /// Partition `rows` block rows across `workers` workers.
    ///
    /// `workers` must be at least 1.
    pub fn new(rows: u32, workers: usize) -> Self {
        Self {
            rows,
            workers: workers.max(1),
        }
    }

    /// Number of workers, including those with no rows.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Row range for a single worker.
    pub fn range(&self, worker: usize) -> Range<u32> {
        let workers = self.workers as u64;
        let worker = worker.min(self.workers) as u64;
        let rows = self.rows as u64;
        let base = rows / workers;
        let extra = rows % workers;

        let start = worker * base + worker.min(extra);
        let len = if worker < workers {
            base + u64::from(worker < extra)
        } else {
            0
        };
        start as u32..(start + len) as u32
    }

    /// Row ranges for every worker, in worker order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<u32>> + '_ {
        (0..self.workers).map(move |worker| self.range(worker))
    }

    /// Split `payload` into one disjoint slice per worker.
    ///
    /// `row_bytes` is the encoded size of one block row; `payload` must hold
    /// exactly `rows * row_bytes` bytes.
    pub fn split_mut<'a>(&self, payload: &'a mut [u8], row_bytes: usize) -> Vec<WorkerSlice<'a>> {
        let mut rest = payload;
        let mut slices = Vec::with_capacity(self.workers);

        for (worker, rows) in self.ranges().enumerate() {
            let len = (rows.end - rows.start) as usize * row_bytes;
            let (out, tail) = std::mem::take(&mut rest).split_at_mut(len);
            rest = tail;
            slices.push(WorkerSlice { worker, rows, out });
        }

        slices
    }
}
