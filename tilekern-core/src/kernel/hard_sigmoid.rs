use std::num::NonZeroUsize;

use super::{CompiledKernel, KernelOp};
use crate::{
    config::LaunchConfig, dtypes::DtypeKind, error::Error, partition::ScratchLayout,
    pipeline::LoopHints, target::Target,
};

pub const KERNEL_NAME: &str = "hard_sigmoid";

pub const DTYPES: &[DtypeKind] = &[DtypeKind::F16, DtypeKind::F32];

pub const TARGET_LIST: &[&str] = &["mlu270", "mlu290", "mlu370"];

/// Builds the hard-sigmoid kernel for `dtype` on `target`.
///
/// Fails if the worker count does not fit the device topology or if a
/// scratch region cannot hold a single element.
pub fn build_hard_sigmoid(
    dtype: DtypeKind,
    target: &Target,
    cfg: &LaunchConfig,
) -> Result<CompiledKernel, Error> {
    let task_num = cfg.task_num.unwrap_or(target.task_num());
    target.validate_task_num(task_num)?;
    let task_num = NonZeroUsize::new(task_num).ok_or(Error::InvalidTopology {
        task_num,
        cluster_num: target.cluster_num,
        core_num: target.core_num,
    })?;
    let layout = ScratchLayout::new(target.nram_size, dtype, &cfg.scratch)?;

    tracing::debug!(
        kernel = KERNEL_NAME,
        target = target.name,
        %dtype,
        task_num = task_num.get(),
        tile_elems = layout.tile_elems.get(),
        region_bytes = layout.region_bytes,
        "built kernel"
    );

    Ok(CompiledKernel {
        name: KERNEL_NAME,
        op: KernelOp::HardSigmoid,
        dtype,
        target: *target,
        task_num,
        layout,
        hints: LoopHints::default(),
    })
}
