//! Static descriptors of the devices a kernel can be built for.
//!
//! A device is a grid of `cluster_num` clusters, each with `core_num` cores.
//! Every core owns `nram_size` bytes of fast on-chip memory.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub name: &'static str,
    pub cluster_num: usize,
    pub core_num: usize,
    /// Fast memory per core, in bytes.
    pub nram_size: usize,
}

const KIB: usize = 1024;

pub const MLU220: Target = Target {
    name: "mlu220",
    cluster_num: 1,
    core_num: 4,
    nram_size: 512 * KIB,
};

pub const MLU270: Target = Target {
    name: "mlu270",
    cluster_num: 4,
    core_num: 4,
    nram_size: 512 * KIB,
};

pub const MLU290: Target = Target {
    name: "mlu290",
    cluster_num: 16,
    core_num: 4,
    nram_size: 512 * KIB,
};

pub const MLU370: Target = Target {
    name: "mlu370",
    cluster_num: 8,
    core_num: 4,
    nram_size: 768 * KIB,
};

/// Every target this crate knows the topology of.
pub const TARGETS: [Target; 4] = [MLU220, MLU270, MLU290, MLU370];

impl Target {
    pub fn lookup(name: &str) -> Result<Self, Error> {
        TARGETS
            .iter()
            .find(|t| t.name == name)
            .copied()
            .ok_or_else(|| Error::UnsupportedTarget(name.to_string()))
    }

    /// Number of workers when the whole device is used.
    pub const fn task_num(&self) -> usize {
        self.cluster_num * self.core_num
    }

    /// Tasks are launched in whole clusters, so `task_num` must be a
    /// positive multiple of `core_num` and need no more clusters than exist.
    pub fn validate_task_num(&self, task_num: usize) -> Result<(), Error> {
        let fits = task_num > 0
            && task_num % self.core_num == 0
            && task_num / self.core_num <= self.cluster_num;
        if fits {
            Ok(())
        } else {
            Err(Error::InvalidTopology {
                task_num,
                cluster_num: self.cluster_num,
                core_num: self.core_num,
            })
        }
    }
}
