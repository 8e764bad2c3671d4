use crate::dtypes::DtypeKind;

/// Represents the errors that can occur while building or launching a kernel.
///
/// Everything except [Error::DtypeMismatch] and [Error::LengthMismatch] is a
/// build-time configuration error: the kernel refuses to build rather than
/// produce a plan that could read or write out of range.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The dtype name is unknown, or the kernel was not registered for it.
    UnsupportedDtype(String),
    /// The target name is unknown, or the kernel was not registered for it.
    UnsupportedTarget(String),
    /// No kernel with this name exists in the registry.
    UnknownKernel(String),
    /// The requested worker count does not factor into whole clusters of the device.
    InvalidTopology {
        task_num: usize,
        cluster_num: usize,
        core_num: usize,
    },
    /// Not a single element fits in a scratch region after headroom and alignment.
    ScratchTooSmall {
        nram_size: usize,
        reserved_bytes: usize,
        regions: usize,
    },
    /// Fewer than two scratch regions, or an alignment that is not a power of two.
    InvalidScratchConfig,
    /// The buffers passed to a launch do not have the dtype the kernel was built for.
    DtypeMismatch {
        expected: DtypeKind,
        found: DtypeKind,
    },
    /// Input and output buffers must have the same length.
    LengthMismatch { input: usize, output: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedDtype(name) => write!(f, "unsupported dtype `{name}`"),
            Self::UnsupportedTarget(name) => write!(f, "unsupported target `{name}`"),
            Self::UnknownKernel(name) => write!(f, "no kernel named `{name}` is registered"),
            Self::InvalidTopology {
                task_num,
                cluster_num,
                core_num,
            } => write!(
                f,
                "{task_num} tasks do not fit {cluster_num} clusters of {core_num} cores"
            ),
            Self::ScratchTooSmall {
                nram_size,
                reserved_bytes,
                regions,
            } => write!(
                f,
                "{nram_size} bytes of nram minus {reserved_bytes} reserved cannot hold {regions} regions of one element"
            ),
            _ => write!(f, "{self:?}"),
        }
    }
}

impl std::error::Error for Error {}
