//! The per-worker tile loop: copy a tile from global memory into scratch,
//! run the compute pipeline on the whole scratch region, copy the result out.

use crate::{
    compute::ElementwiseKernel,
    dtypes::Dtype,
    partition::{ScratchLayout, WorkerPlan},
};

/// The coarse synchronization blocks of one tile iteration, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    CopyIn,
    Compute,
    CopyOut,
}

/// Scheduling annotation for the tile loop body.
///
/// `stages` is how many iterations the device may overlap. It is a hint for
/// instruction scheduling only and never changes results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopHints {
    pub stages: usize,
}

impl Default for LoopHints {
    fn default() -> Self {
        Self { stages: 1 }
    }
}

/// Counts of the operations a launch performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchStats {
    pub copies_in: usize,
    pub computes: usize,
    pub copies_out: usize,
    pub elems_in: usize,
    pub elems_out: usize,
}

impl std::ops::AddAssign for LaunchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.copies_in += rhs.copies_in;
        self.computes += rhs.computes;
        self.copies_out += rhs.copies_out;
        self.elems_in += rhs.elems_in;
        self.elems_out += rhs.elems_out;
    }
}

impl std::iter::Sum for LaunchStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}

/// A worker's private fast memory: the I/O region and the temp region,
/// each `layout.tile_elems` elements, in one zeroed allocation.
///
/// The layout may budget more regions than these two (the default reserves
/// a third for staging); only the two the pipeline touches are allocated.
///
/// Regions are reused by every tile. Nothing is cleared between tiles, so
/// past the end of a short tail tile the I/O region still holds the previous
/// tile's data.
#[derive(Debug, Clone)]
pub struct Scratch<E> {
    data: Vec<E>,
    region_elems: usize,
}

impl<E: Dtype> Scratch<E> {
    pub fn new(layout: &ScratchLayout) -> Self {
        debug_assert_eq!(E::KIND, layout.dtype);
        let region_elems = layout.tile_elems.get();
        Self {
            data: vec![E::zero(); 2 * region_elems],
            region_elems,
        }
    }

    pub fn region_elems(&self) -> usize {
        self.region_elems
    }

    /// The I/O region and the temp region, borrowed together.
    pub fn io_and_temp(&mut self) -> (&mut [E], &mut [E]) {
        let (io, rest) = self.data.split_at_mut(self.region_elems);
        (io, &mut rest[..self.region_elems])
    }
}

/// Runs every tile of one worker. `input` and `output` are the worker's own
/// slices of the global buffers, both `plan.len` long.
pub fn run_worker<E: Dtype, K: ElementwiseKernel<E>>(
    plan: &WorkerPlan,
    input: &[E],
    output: &mut [E],
    scratch: &mut Scratch<E>,
    op: &K,
) -> LaunchStats {
    debug_assert_eq!(input.len(), plan.len);
    debug_assert_eq!(output.len(), plan.len);
    debug_assert_eq!(scratch.region_elems(), plan.tile_elems.get());

    let mut stats = LaunchStats::default();
    for tile in plan.tiles() {
        let lo = tile.start - plan.base;
        let hi = lo + tile.len;
        let (io, temp) = scratch.io_and_temp();

        tracing::trace!(worker = plan.index, tile = tile.index, state = ?TileState::CopyIn, len = tile.len);
        io[..tile.len].copy_from_slice(&input[lo..hi]);
        stats.copies_in += 1;
        stats.elems_in += tile.len;

        tracing::trace!(worker = plan.index, tile = tile.index, state = ?TileState::Compute, len = io.len());
        op.compute(io, temp);
        stats.computes += 1;

        tracing::trace!(worker = plan.index, tile = tile.index, state = ?TileState::CopyOut, last = tile.is_last);
        output[lo..hi].copy_from_slice(&io[..tile.len]);
        stats.copies_out += 1;
        stats.elems_out += tile.len;
    }
    stats
}
