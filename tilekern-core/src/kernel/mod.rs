//! Built kernels and the host side of a launch.
//!
//! A [CompiledKernel] fixes everything that is known before the buffer
//! length: dtype, target, worker count and scratch layout. [CompiledKernel::launch]
//! plans the partition for the runtime length and runs every worker.

mod hard_sigmoid;

pub use hard_sigmoid::{build_hard_sigmoid, DTYPES, KERNEL_NAME, TARGET_LIST};

use std::num::NonZeroUsize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    compute::{ElementwiseKernel, HardSigmoidKernelOp},
    dtypes::{Dtype, DtypeKind},
    error::Error,
    partition::{PartitionPlan, ScratchLayout, WorkerPlan},
    pipeline::{run_worker, LaunchStats, LoopHints, Scratch},
    target::Target,
};

/// The compute pipeline a kernel runs on each tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelOp {
    HardSigmoid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledKernel {
    pub name: &'static str,
    pub op: KernelOp,
    pub dtype: DtypeKind,
    pub target: Target,
    pub task_num: NonZeroUsize,
    pub layout: ScratchLayout,
    pub hints: LoopHints,
}

impl CompiledKernel {
    /// Plans the partition this kernel would use for `len` elements.
    pub fn plan(&self, len: usize) -> PartitionPlan {
        PartitionPlan::new(len, self.task_num, self.layout.tile_elems)
    }

    /// Runs the kernel over `input`, writing `output`.
    ///
    /// Workers own disjoint slices of `output` and run concurrently when the
    /// `parallel` feature is enabled. Workers with nothing to do are skipped.
    pub fn launch<E: Dtype>(&self, input: &[E], output: &mut [E]) -> Result<LaunchStats, Error> {
        if E::KIND != self.dtype {
            return Err(Error::DtypeMismatch {
                expected: self.dtype,
                found: E::KIND,
            });
        }
        if input.len() != output.len() {
            return Err(Error::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }

        let plan = self.plan(input.len());
        tracing::debug!(
            kernel = self.name,
            target = self.target.name,
            len = input.len(),
            task_num = self.task_num.get(),
            stages = self.hints.stages,
            "launching"
        );
        let stats = match self.op {
            KernelOp::HardSigmoid => {
                launch_workers(&plan, &self.layout, input, output, &HardSigmoidKernelOp)
            }
        };
        Ok(stats)
    }
}

fn launch_workers<E: Dtype, K: ElementwiseKernel<E>>(
    plan: &PartitionPlan,
    layout: &ScratchLayout,
    input: &[E],
    output: &mut [E],
    op: &K,
) -> LaunchStats {
    let mut rest = output;
    let mut jobs: Vec<(&WorkerPlan, &[E], &mut [E])> = Vec::with_capacity(plan.workers.len());
    for w in plan.workers.iter() {
        let (out, tail) = std::mem::take(&mut rest).split_at_mut(w.len);
        rest = tail;
        if w.len > 0 {
            jobs.push((w, &input[w.range()], out));
        }
    }
    debug_assert!(rest.is_empty());

    let run = |(w, inp, out): (&WorkerPlan, &[E], &mut [E])| {
        let mut scratch = Scratch::new(layout);
        run_worker(w, inp, out, &mut scratch, op)
    };

    #[cfg(feature = "parallel")]
    let stats = jobs.into_par_iter().map(run).sum();

    #[cfg(not(feature = "parallel"))]
    let stats = jobs.into_iter().map(run).sum();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LaunchConfig, config::ScratchConfig, target::MLU290, tests::*};

    fn small_kernel(task_num: usize, tile: usize) -> CompiledKernel {
        // reserved + 3 regions of exactly `tile` elements
        let cfg = LaunchConfig::default().with_task_num(task_num).with_scratch(
            ScratchConfig::default()
                .with_reserved_bytes(0)
                .with_align_bytes(1),
        );
        let target = Target {
            nram_size: 3 * tile * TestDtype::KIND.size_of(),
            ..MLU290
        };
        build_hard_sigmoid(TestDtype::KIND, &target, &cfg).unwrap()
    }

    #[test]
    fn test_launch_end_to_end() {
        let kernel = small_kernel(4, 2);
        let plan = kernel.plan(10);
        let lens: Vec<usize> = plan.workers.iter().map(|w| w.len).collect();
        assert_eq!(lens, [4, 2, 2, 2]);

        let input = literal(&[-10.0, -3.0, -1.0, 0.0, 1.0, 3.0, 10.0, 6.0, -6.0, 1.5]);
        let mut output = vec![TestDtype::zero(); 10];
        let stats = kernel.launch(&input, &mut output).unwrap();
        assert_close_to_literal!(
            output,
            [0.0, 0.0, 0.33333334, 0.5, 0.6666667, 1.0, 1.0, 1.0, 0.0, 0.75]
        );
        // worker 0 runs 2 tiles of 2, the others 1 tile each
        assert_eq!(stats.computes, 5);
        assert_eq!(stats.elems_out, 10);
    }

    #[test]
    fn test_launch_empty() {
        let kernel = small_kernel(4, 8);
        let stats = kernel.launch::<TestDtype>(&[], &mut []).unwrap();
        assert_eq!(stats, LaunchStats::default());
    }

    #[test]
    fn test_launch_rejects_length_mismatch() {
        let kernel = small_kernel(4, 8);
        let input = vec![TestDtype::zero(); 5];
        let mut output = vec![TestDtype::zero(); 4];
        assert_eq!(
            kernel.launch(&input, &mut output),
            Err(Error::LengthMismatch {
                input: 5,
                output: 4
            })
        );
    }

    #[cfg(feature = "f16")]
    #[test]
    fn test_launch_rejects_dtype_mismatch() {
        let kernel =
            build_hard_sigmoid(DtypeKind::F16, &MLU290, &LaunchConfig::default()).unwrap();
        let input = vec![0.0f32; 4];
        let mut output = vec![0.0f32; 4];
        assert_eq!(
            kernel.launch(&input, &mut output),
            Err(Error::DtypeMismatch {
                expected: DtypeKind::F16,
                found: DtypeKind::F32,
            })
        );
    }

    #[test]
    fn test_launch_matches_reference_on_random_input() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(1);
        for (task_num, tile) in [(4, 3), (8, 16), (64, 5), (4, 1)] {
            let kernel = small_kernel(task_num, tile);
            for len in [0, 1, 3, 4, 63, 64, 65, 1000] {
                let input: Vec<TestDtype> = (0..len)
                    .map(|_| from_f64(rng.gen_range(-8.0..8.0)))
                    .collect();
                let mut output = vec![TestDtype::nan(); len];
                let stats = kernel.launch(&input, &mut output).unwrap();
                let expected: Vec<TestDtype> = input
                    .iter()
                    .map(|&x| crate::compute::hard_sigmoid_scalar(x))
                    .collect();
                assert_eq!(output, expected);
                assert_eq!(stats.elems_in, len);
                assert_eq!(stats.copies_in, stats.copies_out);
            }
        }
    }
}
