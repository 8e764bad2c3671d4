//! Runtime knobs for building a kernel. Compile time behaviour is selected
//! with cargo features instead, see [crate::feature_flags].

/// How a core's fast memory is carved into scratch regions.
///
/// The defaults reserve 1 KiB of headroom and split the rest three ways:
/// two regions for staging I/O and one for compute temporaries. Both numbers
/// are tunables, not hardware requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchConfig {
    /// Bytes held back from the allocator before splitting.
    pub reserved_bytes: usize,
    /// Number of equally sized regions. The first is the I/O buffer, the
    /// second the compute temporary; at least two are required.
    pub regions: usize,
    /// Every region size (and so every region offset) is a multiple of this.
    pub align_bytes: usize,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            reserved_bytes: 1024,
            regions: 3,
            align_bytes: 128,
        }
    }
}

impl ScratchConfig {
    pub fn with_reserved_bytes(mut self, reserved_bytes: usize) -> Self {
        self.reserved_bytes = reserved_bytes;
        self
    }

    pub fn with_regions(mut self, regions: usize) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_align_bytes(mut self, align_bytes: usize) -> Self {
        self.align_bytes = align_bytes;
        self
    }
}

/// Parameters a kernel is built with besides its dtype and target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Number of workers. `None` launches on every core of the target.
    pub task_num: Option<usize>,
    pub scratch: ScratchConfig,
}

impl LaunchConfig {
    pub fn with_task_num(mut self, task_num: usize) -> Self {
        self.task_num = Some(task_num);
        self
    }

    pub fn with_scratch(mut self, scratch: ScratchConfig) -> Self {
        self.scratch = scratch;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = LaunchConfig::default();
        assert_eq!(cfg.task_num, None);
        assert_eq!(cfg.scratch.reserved_bytes, 1024);
        assert_eq!(cfg.scratch.regions, 3);
        assert_eq!(cfg.scratch.align_bytes, 128);
    }

    #[test]
    fn test_builders() {
        let cfg = LaunchConfig::default()
            .with_task_num(8)
            .with_scratch(ScratchConfig::default().with_regions(2).with_align_bytes(64));
        assert_eq!(cfg.task_num, Some(8));
        assert_eq!(cfg.scratch.regions, 2);
        assert_eq!(cfg.scratch.align_bytes, 64);
        assert_eq!(cfg.scratch.reserved_bytes, 1024);
    }
}
