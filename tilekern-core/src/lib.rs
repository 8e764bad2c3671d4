//! # tilekern
//!
//! Tiled, multi-core elementwise kernels for many-core accelerators, and the
//! host side machinery that plans and runs them.
//!
//! A device is a grid of cores, each with a small fast scratch memory. A
//! kernel launch splits a 1-D buffer across every core ([partition]), then
//! each core loops over tiles that fit one scratch region: copy in, compute,
//! copy out ([pipeline]). The compute step is a short fused chain of vector
//! primitives ([compute]).
//!
//! See [feature_flags] for details on feature flags.
//!
//! # Building and launching
//!
//! Kernels are looked up by name, dtype and target in the [registry]:
//!
//! ```rust
//! # use tilekern_core::prelude::*;
//! let kernel = registry::global()
//!     .build("hard_sigmoid", DtypeKind::F32, "mlu290", &LaunchConfig::default())
//!     .unwrap();
//! let input = [-3.0f32, 0.0, 3.0];
//! let mut output = [0.0f32; 3];
//! kernel.launch(&input, &mut output).unwrap();
//! assert_eq!(output, [0.0, 0.5, 1.0]);
//! ```
//!
//! Build time problems (unknown dtype or target, a worker count that does not
//! fit the device, scratch memory too small for one element) are reported by
//! `build` as an [error::Error]. A built kernel never reads or writes outside
//! the buffers it is given.

pub mod compute;
pub mod config;
pub mod dtypes;
pub mod error;
pub mod feature_flags;
pub mod kernel;
pub mod partition;
pub mod pipeline;
pub mod registry;
pub mod target;

/// Contains subset of all public exports.
pub mod prelude {
    pub use crate::compute::{hard_sigmoid_scalar, ElementwiseKernel, HardSigmoidKernelOp};
    pub use crate::config::{LaunchConfig, ScratchConfig};
    pub use crate::dtypes::{Dtype, DtypeKind};
    pub use crate::error::Error;
    pub use crate::kernel::{build_hard_sigmoid, CompiledKernel, KernelOp};
    pub use crate::partition::{PartitionPlan, ScratchLayout, Tile, WorkerPlan};
    pub use crate::pipeline::{LaunchStats, LoopHints};
    pub use crate::registry::{self, KernelRegistry, KernelSpec};
    pub use crate::target::Target;
}

#[cfg(test)]
pub(crate) mod tests {
    pub use num_traits::{Float, FromPrimitive, One, ToPrimitive, Zero};

    #[cfg(not(feature = "test-f16"))]
    pub type TestDtype = f32;

    #[cfg(feature = "test-f16")]
    pub type TestDtype = half::f16;

    // `half::f16` has inherent `from_f64`/`to_f64` that shadow the
    // num_traits ones, so tests convert through these.
    pub fn from_f64(x: f64) -> TestDtype {
        <TestDtype as FromPrimitive>::from_f64(x).unwrap()
    }

    pub fn to_f64(x: TestDtype) -> f64 {
        <TestDtype as ToPrimitive>::to_f64(&x).unwrap()
    }

    pub fn literal(xs: &[f64]) -> Vec<TestDtype> {
        xs.iter().map(|&x| from_f64(x)).collect()
    }

    pub trait AssertClose {
        type Elem: std::fmt::Display + std::fmt::Debug + Copy;
        const DEFAULT_TOLERANCE: Self::Elem;
        fn get_default_tol(&self) -> Self::Elem {
            Self::DEFAULT_TOLERANCE
        }
        fn get_far_pair(
            &self,
            rhs: &Self,
            tolerance: Self::Elem,
        ) -> Option<(Self::Elem, Self::Elem)>;
    }

    #[cfg(feature = "f16")]
    impl AssertClose for half::f16 {
        type Elem = Self;
        const DEFAULT_TOLERANCE: Self::Elem = half::f16::from_f32_const(1e-2);
        fn get_far_pair(&self, rhs: &Self, tolerance: Self) -> Option<(Self, Self)> {
            if Float::abs(*self - *rhs) > tolerance {
                Some((*self, *rhs))
            } else {
                None
            }
        }
    }

    impl AssertClose for f32 {
        type Elem = f32;
        const DEFAULT_TOLERANCE: Self::Elem = 1e-6;
        fn get_far_pair(&self, rhs: &Self, tolerance: f32) -> Option<(f32, f32)> {
            if (self - rhs).abs() > tolerance {
                Some((*self, *rhs))
            } else {
                None
            }
        }
    }

    impl<T: AssertClose> AssertClose for [T] {
        type Elem = T::Elem;
        const DEFAULT_TOLERANCE: Self::Elem = T::DEFAULT_TOLERANCE;
        fn get_far_pair(
            &self,
            rhs: &Self,
            tolerance: Self::Elem,
        ) -> Option<(Self::Elem, Self::Elem)> {
            assert_eq!(self.len(), rhs.len(), "lengths differ");
            for (l, r) in self.iter().zip(rhs.iter()) {
                if let Some(pair) = l.get_far_pair(r, tolerance) {
                    return Some(pair);
                }
            }
            None
        }
    }

    macro_rules! assert_close {
        ($Lhs:expr, $Rhs:expr) => {{
            let lhs: &[_] = &$Lhs;
            let rhs: &[_] = &$Rhs;
            let tol = AssertClose::get_default_tol(lhs);
            if let Some((l, r)) = AssertClose::get_far_pair(lhs, rhs, tol) {
                panic!("lhs != rhs | {l} != {r}\n\n{lhs:?}\n\n{rhs:?}");
            }
        }};
    }
    pub(crate) use assert_close;

    macro_rules! assert_close_to_literal {
        ($Lhs:expr, $Rhs:expr) => {{
            let rhs: Vec<TestDtype> = $Rhs
                .iter()
                .map(|&x: &f64| num_traits::FromPrimitive::from_f64(x).unwrap())
                .collect();
            assert_close!($Lhs, rhs);
        }};
    }
    pub(crate) use assert_close_to_literal;

    #[test]
    fn test_conversion_helpers() {
        assert_eq!(to_f64(from_f64(0.5)), 0.5);
        assert_eq!(to_f64(from_f64(-3.0)), -3.0);
        assert_close_to_literal!(literal(&[1.0, 0.25]), [1.0, 0.25]);
    }
}
