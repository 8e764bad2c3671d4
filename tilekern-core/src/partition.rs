//! Splitting a 1-D buffer across workers, and each worker's share into tiles
//! that fit one scratch region.
//!
//! Worker 0 absorbs the whole division remainder, so the split is not load
//! balanced: when `remainder` is large relative to `per_worker`, worker 0
//! does up to `task_num - 1` extra elements of work.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::{config::ScratchConfig, dtypes::DtypeKind, error::Error};

/// How one core's fast memory is divided into scratch regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchLayout {
    pub dtype: DtypeKind,
    pub regions: usize,
    /// Size of every region in bytes, a multiple of the configured alignment.
    pub region_bytes: usize,
    /// Number of elements of `dtype` in one region.
    pub tile_elems: NonZeroUsize,
}

impl ScratchLayout {
    pub fn new(nram_size: usize, dtype: DtypeKind, cfg: &ScratchConfig) -> Result<Self, Error> {
        if cfg.regions < 2 || !cfg.align_bytes.is_power_of_two() {
            return Err(Error::InvalidScratchConfig);
        }
        let usable = nram_size.saturating_sub(cfg.reserved_bytes) / cfg.regions;
        let region_bytes = usable / cfg.align_bytes * cfg.align_bytes;
        let tile_elems =
            NonZeroUsize::new(region_bytes / dtype.size_of()).ok_or(Error::ScratchTooSmall {
                nram_size,
                reserved_bytes: cfg.reserved_bytes,
                regions: cfg.regions,
            })?;
        Ok(Self {
            dtype,
            regions: cfg.regions,
            region_bytes,
            tile_elems,
        })
    }

    /// Byte offset of `region` from the start of fast memory.
    pub fn offset(&self, region: usize) -> usize {
        region * self.region_bytes
    }

    /// Bytes of fast memory covered by all regions.
    pub fn total_bytes(&self) -> usize {
        self.regions * self.region_bytes
    }
}

/// One copy-in/compute/copy-out iteration of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub index: usize,
    /// Position of the first element in the global buffer.
    pub start: usize,
    pub len: usize,
    pub is_last: bool,
}

/// The share of the buffer owned by a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPlan {
    pub index: usize,
    pub base: usize,
    pub len: usize,
    pub tile_elems: NonZeroUsize,
    /// Number of tiles. Zero only when the worker owns no elements.
    pub loop_count: usize,
    /// Length of the last tile. Equal to `tile_elems` when `len` divides evenly.
    pub tail_elems: usize,
}

impl WorkerPlan {
    fn new(index: usize, base: usize, len: usize, tile_elems: NonZeroUsize) -> Self {
        let loop_count = len.div_ceil(tile_elems.get());
        let tail_elems = match loop_count {
            0 => 0,
            n => len - (n - 1) * tile_elems.get(),
        };
        Self {
            index,
            base,
            len,
            tile_elems,
            loop_count,
            tail_elems,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.base..self.base + self.len
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let tile = self.tile_elems.get();
        (0..self.loop_count).map(move |i| {
            let is_last = i + 1 == self.loop_count;
            Tile {
                index: i,
                start: self.base + i * tile,
                len: if is_last { self.tail_elems } else { tile },
                is_last,
            }
        })
    }
}

/// The partition of one launch, derived once from the runtime length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    pub data_total: usize,
    pub per_worker: usize,
    pub remainder: usize,
    pub tile_elems: NonZeroUsize,
    pub workers: Vec<WorkerPlan>,
}

impl PartitionPlan {
    pub fn new(data_total: usize, task_num: NonZeroUsize, tile_elems: NonZeroUsize) -> Self {
        let task_num = task_num.get();
        let per_worker = data_total / task_num;
        let remainder = data_total % task_num;
        if is_unbalanced(per_worker, remainder) {
            tracing::warn!(
                data_total,
                task_num,
                per_worker,
                remainder,
                "worker 0 takes the whole remainder, load is unbalanced"
            );
        } else if per_worker == 0 && remainder > 0 {
            tracing::debug!(data_total, task_num, "fewer elements than workers, worker 0 takes all");
        }

        let workers = (0..task_num)
            .map(|w| {
                let (base, len) = if w == 0 {
                    (0, per_worker + remainder)
                } else {
                    (remainder + w * per_worker, per_worker)
                };
                let plan = WorkerPlan::new(w, base, len, tile_elems);
                tracing::trace!(
                    worker = w,
                    base,
                    len,
                    loop_count = plan.loop_count,
                    tail_elems = plan.tail_elems,
                    "planned worker"
                );
                plan
            })
            .collect();

        Self {
            data_total,
            per_worker,
            remainder,
            tile_elems,
            workers,
        }
    }

    pub fn worker_ranges(&self) -> Vec<Range<usize>> {
        self.workers.iter().map(WorkerPlan::range).collect()
    }

    /// Whether worker 0 carries more than twice the share of the others.
    pub fn is_unbalanced(&self) -> bool {
        is_unbalanced(self.per_worker, self.remainder)
    }
}

// Inputs shorter than the worker count are routine and not worth a warning.
fn is_unbalanced(per_worker: usize, remainder: usize) -> bool {
    per_worker > 0 && remainder > per_worker
}
