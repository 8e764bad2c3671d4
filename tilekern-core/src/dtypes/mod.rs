//! Module for the element types a kernel can be built for. Contains [Dtype] and [DtypeKind].
//!
//! When the `f16` feature is enabled, this exports the [f16] type.

#[cfg(feature = "f16")]
pub use half::f16;

use crate::error::Error;

/// The runtime name of a [Dtype]. This is what the registry dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DtypeKind {
    F16,
    F32,
}

impl DtypeKind {
    /// Number of bytes occupied by one element.
    pub const fn size_of(&self) -> usize {
        match self {
            Self::F16 => 2,
            Self::F32 => 4,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::F16 => "float16",
            Self::F32 => "float32",
        }
    }
}

impl std::fmt::Display for DtypeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for DtypeKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float16" => Ok(Self::F16),
            "float32" => Ok(Self::F32),
            _ => Err(Error::UnsupportedDtype(s.to_string())),
        }
    }
}

/// Represents a floating point element that can live in a global buffer
/// and be staged through scratch memory.
pub trait Dtype:
    'static
    + Copy
    + Clone
    + Default
    + std::fmt::Debug
    + PartialOrd
    + Send
    + Sync
    + num_traits::Float
    + num_traits::FromPrimitive
{
    const KIND: DtypeKind;
}

impl Dtype for f32 {
    const KIND: DtypeKind = DtypeKind::F32;
}

#[cfg(feature = "f16")]
impl Dtype for f16 {
    const KIND: DtypeKind = DtypeKind::F16;
}
