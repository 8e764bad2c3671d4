//! Information about the available feature flags
//!
//! # "parallel"
//!
//! **Enabled by default**
//!
//! Runs the workers of a launch on the [rayon](https://docs.rs/rayon) thread pool.
//! Without it workers run one after another on the calling thread. Results are
//! identical either way since workers never share a scratch region or an output element.
//!
//! # "f16"
//!
//! Enables `half::f16` as a [crate::dtypes::Dtype], so float16 kernels can be launched.
//!
//! Example:
//! ```toml
//! tilekern-core = { version = "...", features = ["f16"] }
//! ```
//!
//! # "test-f16"
//!
//! Runs the unit tests with `f16` as the element type instead of `f32`.

#[cfg(feature = "parallel")]
/// Whether workers run concurrently. Configure with crate features.
pub const PARALLEL: bool = true;

#[cfg(not(feature = "parallel"))]
/// Whether workers run concurrently. Configure with crate features.
pub const PARALLEL: bool = false;
