//! # tilekern
//!
//! Tiled, multi-core elementwise kernels for many-core accelerators.
//!
//! This crate re-exports [tilekern_core]; see its documentation for how a
//! launch is partitioned across workers and tiles.
//!
//! ```rust
//! # use tilekern::prelude::*;
//! let kernel = build_hard_sigmoid(DtypeKind::F32, &tilekern::target::MLU290, &Default::default())
//!     .unwrap();
//! let plan = kernel.plan(1 << 20);
//! assert_eq!(plan.workers.len(), 64);
//! ```

pub use tilekern_core::*;

pub mod prelude {
    pub use tilekern_core::prelude::*;
}
